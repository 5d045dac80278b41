use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, validate_reporting_date, BUTTON_CLASS};
use crate::api::use_request_scope;
use crate::app::PageProps;
use crate::components::line_item_form::LineItemForm;
use crate::components::{error_banner, page_shell, section, success_banner, StatCard};
use crate::format::format_currency;
use crate::line_items::{usd_exposure_catalog, LineItem, LineValues};
use crate::ratios::{submission_payload, usd_exposure, UsdExposure};

#[function_component(UsdExposurePage)]
pub fn usd_exposure_page(props: &PageProps) -> Html {
    let scope = use_request_scope();
    let reporting_date = use_state(String::new);
    let items = use_state(usd_exposure_catalog);
    let result = use_state(|| None::<(String, UsdExposure)>);
    let is_submitting = use_state(|| false);
    let submit_error = use_state(|| None::<String>);
    let saved_message = use_state(|| None::<String>);

    let on_items = {
        let items = items.clone();
        Callback::from(move |next: Vec<LineItem>| items.set(next))
    };

    let on_submit = {
        let client = props.app.client.clone();
        let scope = scope.clone();
        let reporting_date = reporting_date.clone();
        let items = items.clone();
        let result = result.clone();
        let is_submitting = is_submitting.clone();
        let submit_error = submit_error.clone();
        let saved_message = saved_message.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submit_error.set(None);
            saved_message.set(None);

            let date = (*reporting_date).clone();
            if let Err(err) = validate_reporting_date(&date) {
                submit_error.set(Some(err.to_string()));
                return;
            }

            result.set(Some((date.clone(), usd_exposure(&LineValues::from_items(&items)))));
            let payload = submission_payload(&date, &items);

            is_submitting.set(true);
            let api = client.scoped(&scope);
            let scope = scope.clone();
            let is_submitting = is_submitting.clone();
            let submit_error = submit_error.clone();
            let saved_message = saved_message.clone();
            spawn_local(async move {
                let Some(outcome) = scope.settle(api.save_usd_exposure(&payload).await) else {
                    return;
                };
                match outcome {
                    Ok(record) => {
                        log::info!("saved USD exposure {} for {}", record.id, record.reporting_date);
                        saved_message.set(Some(format!(
                            "USD exposure saved for {}.",
                            record.reporting_date
                        )));
                    }
                    Err(err) => submit_error.set(Some(err.user_message())),
                }
                is_submitting.set(false);
            });
        })
    };

    let result_view = match &*result {
        Some((date, exposure)) => section(
            "Calculated USD Exposure",
            html! {
                <>
                    <p class="text-sm text-muted-foreground">
                        {"For Reporting Date: "}<span class="font-semibold">{ date.clone() }</span>
                    </p>
                    <StatCard
                        title="USD Exposure"
                        value={format_currency(exposure.amount, "USD")}
                        caption={exposure.position.label()}
                    />
                </>
            },
        ),
        None => html! {},
    };

    page_shell(
        "USD Exposure",
        html! {},
        html! {
            <>
                { section("USD Exposure Data Input", html! {
                    <form class="space-y-6" onsubmit={on_submit}>
                        <div class="space-y-1">
                            <label for="reportingDate" class="text-sm font-medium text-foreground">{"Date"}</label>
                            <input
                                id="reportingDate"
                                type="date"
                                class="block w-full max-w-xs px-3 py-2 bg-input border border-input rounded-lg"
                                value={(*reporting_date).clone()}
                                oninput={bind_input(&reporting_date)}
                            />
                        </div>
                        <LineItemForm items={(*items).clone()} on_change={on_items} disabled={*is_submitting} />
                        <button type="submit" class={BUTTON_CLASS} disabled={*is_submitting}>
                            { if *is_submitting { "Saving..." } else { "Calculate USD Exposure" } }
                        </button>
                    </form>
                }) }
                { error_banner((*submit_error).as_ref()) }
                { success_banner((*saved_message).as_ref()) }
                { result_view }
            </>
        },
    )
}
