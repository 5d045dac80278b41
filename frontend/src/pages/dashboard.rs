use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::{BUTTON_CLASS, INPUT_CLASS, SECONDARY_BUTTON_CLASS};
use crate::api::use_request_scope;
use crate::app::{Page, PageProps};
use crate::bulk_upload::upload_batch;
use crate::components::icons::{icon_trending_up, icon_upload};
use crate::components::{error_banner, page_shell, section, success_banner};
use crate::error::ValidationError;
use crate::models::Currency;

/// Daily `.041` files always carry CAD summaries.
const DAILY_CURRENCY: Currency = Currency::Cad;
/// Forecast generation is CAD-only for now.
const FORECAST_CURRENCY: Currency = Currency::Cad;

fn validate_bulk(file_count: usize, currency: Option<Currency>) -> Result<Currency, ValidationError> {
    match currency {
        Some(currency) if file_count > 0 => Ok(currency),
        _ => Err(ValidationError::IncompleteBulkUpload),
    }
}

fn validate_anchor_date(date: &str) -> Result<(), ValidationError> {
    if date.trim().is_empty() {
        Err(ValidationError::MissingAnchorDate)
    } else {
        Ok(())
    }
}

fn selected_files(input: &HtmlInputElement) -> Vec<File> {
    input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default()
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &PageProps) -> Html {
    let scope = use_request_scope();

    let selected_file = use_state(|| None::<File>);
    let is_uploading = use_state(|| false);
    let upload_message = use_state(|| None::<String>);
    let upload_error = use_state(|| None::<String>);
    let file_input = use_node_ref();

    let bulk_files = use_state(Vec::<File>::new);
    let bulk_currency = use_state(|| None::<Currency>);
    let bulk_open = use_state(|| true);
    let is_bulk_uploading = use_state(|| false);
    let bulk_progress = use_state(|| None::<String>);
    let bulk_message = use_state(|| None::<String>);
    let bulk_error = use_state(|| None::<String>);
    let bulk_input = use_node_ref();

    let anchor_date = use_state(String::new);
    let is_forecasting = use_state(|| false);
    let forecast_message = use_state(|| None::<String>);
    let forecast_error = use_state(|| None::<String>);

    let on_file_change = {
        let selected_file = selected_file.clone();
        let upload_message = upload_message.clone();
        let upload_error = upload_error.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            selected_file.set(selected_files(&input).into_iter().next());
            upload_message.set(None);
            upload_error.set(None);
        })
    };

    let on_upload = {
        let client = props.app.client.clone();
        let scope = scope.clone();
        let selected_file = selected_file.clone();
        let is_uploading = is_uploading.clone();
        let upload_message = upload_message.clone();
        let upload_error = upload_error.clone();
        let file_input = file_input.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(file) = (*selected_file).clone() else {
                upload_error.set(Some(ValidationError::NoFileSelected.to_string()));
                return;
            };

            is_uploading.set(true);
            upload_message.set(None);
            upload_error.set(None);

            let api = client.scoped(&scope);
            let scope = scope.clone();
            let selected_file = selected_file.clone();
            let is_uploading = is_uploading.clone();
            let upload_message = upload_message.clone();
            let upload_error = upload_error.clone();
            let file_input = file_input.clone();
            spawn_local(async move {
                let Some(result) = scope.settle(api.upload_file(&file, DAILY_CURRENCY).await) else {
                    return;
                };
                match result {
                    Ok(resp) => {
                        log::info!("uploaded {} as {}", file.name(), resp.file_id);
                        upload_message.set(Some(format!(
                            "File '{}' uploaded successfully. Processing queued. File ID: {}",
                            file.name(),
                            resp.file_id
                        )));
                        selected_file.set(None);
                        if let Some(input) = file_input.cast::<HtmlInputElement>() {
                            input.set_value("");
                        }
                    }
                    Err(err) => upload_error.set(Some(err.user_message())),
                }
                is_uploading.set(false);
            });
        })
    };

    let on_bulk_files = {
        let bulk_files = bulk_files.clone();
        let bulk_message = bulk_message.clone();
        let bulk_error = bulk_error.clone();
        let bulk_progress = bulk_progress.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            bulk_files.set(selected_files(&input));
            bulk_message.set(None);
            bulk_error.set(None);
            bulk_progress.set(None);
        })
    };

    let on_bulk_currency = {
        let bulk_currency = bulk_currency.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            bulk_currency.set(Currency::parse(&select.value()));
        })
    };

    let on_bulk_upload = {
        let client = props.app.client.clone();
        let scope = scope.clone();
        let bulk_files = bulk_files.clone();
        let bulk_currency = bulk_currency.clone();
        let is_bulk_uploading = is_bulk_uploading.clone();
        let bulk_progress = bulk_progress.clone();
        let bulk_message = bulk_message.clone();
        let bulk_error = bulk_error.clone();
        let bulk_input = bulk_input.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let currency = match validate_bulk(bulk_files.len(), *bulk_currency) {
                Ok(currency) => currency,
                Err(err) => {
                    bulk_error.set(Some(err.to_string()));
                    return;
                }
            };

            is_bulk_uploading.set(true);
            bulk_message.set(Some("Starting bulk upload...".to_string()));
            bulk_error.set(None);

            let files = (*bulk_files).clone();
            let api = client.scoped(&scope);
            let scope = scope.clone();
            let bulk_files = bulk_files.clone();
            let is_bulk_uploading = is_bulk_uploading.clone();
            let bulk_progress = bulk_progress.clone();
            let bulk_message = bulk_message.clone();
            let bulk_input = bulk_input.clone();
            spawn_local(async move {
                let progress = bulk_progress.clone();
                let summary = upload_batch(
                    files,
                    |file| file.name(),
                    |file| {
                        let api = api.clone();
                        async move { api.upload_file(&file, currency).await.map(|_| ()) }
                    },
                    move |msg| progress.set(Some(msg)),
                )
                .await;

                if !scope.is_alive() || summary.interrupted {
                    return;
                }
                bulk_message.set(Some(summary.to_string()));
                bulk_progress.set(None);
                is_bulk_uploading.set(false);
                bulk_files.set(Vec::new());
                if let Some(input) = bulk_input.cast::<HtmlInputElement>() {
                    input.set_value("");
                }
            });
        })
    };

    let on_forecast = {
        let client = props.app.client.clone();
        let scope = scope.clone();
        let anchor_date = anchor_date.clone();
        let is_forecasting = is_forecasting.clone();
        let forecast_message = forecast_message.clone();
        let forecast_error = forecast_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let date = (*anchor_date).clone();
            if let Err(err) = validate_anchor_date(&date) {
                forecast_error.set(Some(err.to_string()));
                return;
            }

            is_forecasting.set(true);
            forecast_message.set(None);
            forecast_error.set(None);

            let api = client.scoped(&scope);
            let scope = scope.clone();
            let anchor_date = anchor_date.clone();
            let is_forecasting = is_forecasting.clone();
            let forecast_message = forecast_message.clone();
            let forecast_error = forecast_error.clone();
            spawn_local(async move {
                let result = api.generate_forecast(FORECAST_CURRENCY, &date).await;
                let Some(result) = scope.settle(result) else {
                    return;
                };
                match result {
                    Ok(resp) => {
                        forecast_message.set(Some(resp.message.unwrap_or_else(|| {
                            format!("Forecast generation started for {}.", FORECAST_CURRENCY)
                        })));
                        anchor_date.set(String::new());
                    }
                    Err(err) => forecast_error.set(Some(err.user_message())),
                }
                is_forecasting.set(false);
            });
        })
    };

    let toggle_bulk = {
        let bulk_open = bulk_open.clone();
        Callback::from(move |_| bulk_open.set(!*bulk_open))
    };

    let view_forecast = {
        let navigate = props.app.navigate.clone();
        Callback::from(move |_| navigate.emit(Page::Forecast(FORECAST_CURRENCY)))
    };

    page_shell(
        "Forecast Dashboard",
        html! {
            <button class={SECONDARY_BUTTON_CLASS} onclick={view_forecast}>
                { icon_trending_up() }
                <span>{"Latest Forecast"}</span>
            </button>
        },
        html! {
            <>
                { section("Upload Daily BAI2 File (.041)", html! {
                    <form class="space-y-4" onsubmit={on_upload}>
                        <input
                            id="fileUpload"
                            ref={file_input}
                            type="file"
                            accept=".041,.txt"
                            class={INPUT_CLASS}
                            onchange={on_file_change}
                            disabled={*is_uploading}
                        />
                        <button type="submit" class={BUTTON_CLASS} disabled={*is_uploading || selected_file.is_none()}>
                            { if *is_uploading { "Uploading..." } else { "Upload File" } }
                        </button>
                        { success_banner((*upload_message).as_ref()) }
                        { error_banner((*upload_error).as_ref()) }
                    </form>
                }) }

                <div class="bg-card rounded-lg border border-border p-6 space-y-4">
                    <button type="button" class="w-full flex items-center justify-between text-lg font-bold text-foreground" onclick={toggle_bulk}>
                        <span>{"Bulk Historical Upload"}</span>
                        <span class="text-sm text-muted-foreground">{ if *bulk_open { "Hide" } else { "Show" } }</span>
                    </button>
                    if *bulk_open {
                        <form class="space-y-4" onsubmit={on_bulk_upload}>
                            <div class="space-y-1">
                                <label class="text-sm font-medium text-foreground">{"Currency"}</label>
                                <select class={INPUT_CLASS} onchange={on_bulk_currency} disabled={*is_bulk_uploading}>
                                    <option value="" selected={bulk_currency.is_none()}>{"Select currency"}</option>
                                    { for Currency::ALL.iter().map(|c| html! {
                                        <option value={c.code()} selected={*bulk_currency == Some(*c)}>{ c.code() }</option>
                                    }) }
                                </select>
                            </div>
                            <div class="space-y-1">
                                <label class="text-sm font-medium text-foreground">{"Files (.041 / .txt)"}</label>
                                <input
                                    id="bulkFileUpload"
                                    ref={bulk_input}
                                    type="file"
                                    multiple={true}
                                    accept=".041,.txt"
                                    class={INPUT_CLASS}
                                    onchange={on_bulk_files}
                                    disabled={*is_bulk_uploading}
                                />
                                if !bulk_files.is_empty() {
                                    <p class="text-xs text-muted-foreground">{ format!("{} file(s) selected", bulk_files.len()) }</p>
                                }
                            </div>
                            <button type="submit" class={format!("flex items-center gap-2 {}", BUTTON_CLASS)} disabled={*is_bulk_uploading}>
                                { icon_upload() }
                                <span>{ if *is_bulk_uploading { "Uploading..." } else { "Start Bulk Upload" } }</span>
                            </button>
                            if let Some(progress) = &*bulk_progress {
                                <p class="text-sm text-muted-foreground">{ progress.clone() }</p>
                            }
                            { success_banner((*bulk_message).as_ref()) }
                            { error_banner((*bulk_error).as_ref()) }
                        </form>
                    }
                </div>

                { section("Generate CAD Forecast", html! {
                    <form class="space-y-4" onsubmit={on_forecast}>
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-foreground">{"Forecast anchor date"}</label>
                            <input
                                type="date"
                                class={INPUT_CLASS}
                                value={(*anchor_date).clone()}
                                oninput={super::bind_input(&anchor_date)}
                                disabled={*is_forecasting}
                            />
                        </div>
                        <button type="submit" class={BUTTON_CLASS} disabled={*is_forecasting}>
                            { if *is_forecasting { "Starting..." } else { "Start Forecast" } }
                        </button>
                        { success_banner((*forecast_message).as_ref()) }
                        { error_banner((*forecast_error).as_ref()) }
                    </form>
                }) }
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_upload_needs_files_and_currency() {
        assert_eq!(validate_bulk(0, Some(Currency::Usd)), Err(ValidationError::IncompleteBulkUpload));
        assert_eq!(validate_bulk(4, None), Err(ValidationError::IncompleteBulkUpload));
        assert_eq!(validate_bulk(4, Some(Currency::Usd)), Ok(Currency::Usd));
    }

    #[test]
    fn anchor_date_is_required() {
        assert_eq!(validate_anchor_date(""), Err(ValidationError::MissingAnchorDate));
        assert_eq!(validate_anchor_date("2024-06-30"), Ok(()));
    }
}
