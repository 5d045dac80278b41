use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::SECONDARY_BUTTON_CLASS;
use crate::api::use_request_scope;
use crate::app::{Page, PageProps};
use crate::components::{error_banner, loading_row, page_shell};
use crate::format::format_timestamp;
use crate::models::{sort_newest_first, Currency, ProcessingStatus, UploadedFileRecord};

fn status_badge_class(status: ProcessingStatus) -> &'static str {
    match status {
        ProcessingStatus::Completed => "bg-green-100 text-green-700",
        ProcessingStatus::Failed => "bg-red-100 text-red-700",
        ProcessingStatus::Processing => "bg-blue-100 text-blue-700",
        ProcessingStatus::Pending | ProcessingStatus::Unknown => "bg-slate-100 text-slate-600",
    }
}

/// Only finished summary uploads have a forecast worth opening.
fn forecast_target(record: &UploadedFileRecord) -> Option<Currency> {
    let is_summary = matches!(
        record.file_type.as_deref(),
        Some("CAD_SUMMARY_RAW") | Some("USD_SUMMARY_RAW")
    );
    if record.status() == ProcessingStatus::Completed && is_summary {
        record.currency()
    } else {
        None
    }
}

#[function_component(HistoryPage)]
pub fn history_page(props: &PageProps) -> Html {
    let scope = use_request_scope();
    let records = use_state(Vec::<UploadedFileRecord>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let reload = use_state(|| 0u32);

    {
        let api = props.app.client.scoped(&scope);
        let records = records.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                loading.set(true);
                error.set(None);
                spawn_local(async move {
                    let Some(result) = scope.settle(api.file_history().await) else {
                        return;
                    };
                    match result {
                        Ok(mut list) => {
                            sort_newest_first(&mut list);
                            records.set(list);
                        }
                        Err(err) => error.set(Some(err.user_message())),
                    }
                    loading.set(false);
                });
                || ()
            },
            *reload,
        );
    }

    let on_refresh = {
        let reload = reload.clone();
        Callback::from(move |_| reload.set(*reload + 1))
    };

    let rows = records.iter().map(|record| {
        let status = record.status();
        let action = match forecast_target(record) {
            Some(currency) => {
                let navigate = props.app.navigate.clone();
                html! {
                    <button class="text-sky-700 underline font-medium" onclick={Callback::from(move |_| navigate.emit(Page::Forecast(currency)))}>
                        {"View Forecast"}
                    </button>
                }
            }
            None => match (&record.processing_message, status) {
                (Some(message), ProcessingStatus::Failed) => html! {
                    <span class="text-red-600 cursor-help" title={message.clone()}>{"Error (hover)"}</span>
                },
                _ => html! {},
            },
        };

        html! {
            <tr class="text-sm hover:bg-muted/30 transition-colors">
                <td class="px-6 py-3 text-foreground">{ record.original_filename.clone() }</td>
                <td class="px-6 py-3 text-muted-foreground">{ record.currency.clone().unwrap_or_else(|| "N/A".to_string()) }</td>
                <td class="px-6 py-3 text-muted-foreground">{ format_timestamp(&record.upload_timestamp) }</td>
                <td class="px-6 py-3">
                    <span class={format!("px-2 py-1 rounded-full text-xs font-semibold {}", status_badge_class(status))}>
                        { status.label() }
                    </span>
                </td>
                <td class="px-6 py-3 text-muted-foreground">
                    { record.forecast_date.as_deref().map(format_timestamp).unwrap_or_else(|| "N/A".to_string()) }
                </td>
                <td class="px-6 py-3">{ action }</td>
            </tr>
        }
    });

    page_shell(
        "Upload History",
        html! {
            <button class={SECONDARY_BUTTON_CLASS} onclick={on_refresh} disabled={*loading}>
                { if *loading { "Refreshing..." } else { "Refresh" } }
            </button>
        },
        html! {
            <>
                { error_banner((*error).as_ref()) }
                <div class="bg-card rounded-lg border border-border overflow-x-auto">
                    <table class="w-full text-left border-collapse">
                        <thead class="bg-secondary border-b border-border">
                            <tr>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Filename"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Currency"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Upload Time"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Status"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Forecast Date"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { if *loading && records.is_empty() {
                                loading_row(6, "Loading history...")
                            } else if records.is_empty() {
                                loading_row(6, "No file upload history found.")
                            } else {
                                html! { <>{ for rows }</> }
                            }}
                        </tbody>
                    </table>
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str, file_type: Option<&str>, currency: Option<&str>) -> UploadedFileRecord {
        UploadedFileRecord {
            id: "f-1".to_string(),
            original_filename: "2024-06-28.041".to_string(),
            file_type: file_type.map(str::to_string),
            currency: currency.map(str::to_string),
            file_size_bytes: Some(2048),
            upload_timestamp: "2024-06-28T09:15:00Z".to_string(),
            processing_status: Some(status.to_string()),
            processing_message: None,
            forecast_date: None,
        }
    }

    #[test]
    fn completed_summary_links_to_its_currency() {
        let r = record("completed", Some("USD_SUMMARY_RAW"), Some("usd"));
        assert_eq!(forecast_target(&r), Some(Currency::Usd));
    }

    #[test]
    fn unfinished_or_other_uploads_have_no_link() {
        assert_eq!(forecast_target(&record("processing", Some("CAD_SUMMARY_RAW"), Some("CAD"))), None);
        assert_eq!(forecast_target(&record("completed", Some("TRANSACTIONS"), Some("CAD"))), None);
        assert_eq!(forecast_target(&record("completed", Some("CAD_SUMMARY_RAW"), None)), None);
    }

    #[test]
    fn badges_follow_status() {
        assert!(status_badge_class(ProcessingStatus::Failed).contains("red"));
        assert_eq!(
            status_badge_class(ProcessingStatus::Unknown),
            status_badge_class(ProcessingStatus::Pending)
        );
    }
}
