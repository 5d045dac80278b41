use chrono::NaiveDate;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::SECONDARY_BUTTON_CLASS;
use crate::api::use_request_scope;
use crate::app::PageProps;
use crate::components::line_chart::{LineChart, Series};
use crate::components::{error_banner, page_shell, section};
use crate::config::SUMMARY_ROWS_PER_LOAD;
use crate::format::{format_date, format_optional_amount};
use crate::models::SummaryPoint;
use crate::time_window::filter_trailing_year;

/// Rows of the trailing year, oldest first, and the date they end on.
pub(crate) fn trailing_year(rows: Vec<SummaryPoint>) -> (Vec<SummaryPoint>, Option<NaiveDate>) {
    filter_trailing_year(rows, |row| row.reporting_date.as_deref())
}

/// Closing balance over time. `rows` must already be oldest first.
pub(crate) fn closing_balance_series(rows: &[SummaryPoint]) -> (Vec<String>, Vec<Series>) {
    let labels = rows
        .iter()
        .map(|r| r.reporting_date.clone().unwrap_or_default())
        .collect();
    let series = vec![Series {
        label: "Closing Balance (USD)",
        color: "rgb(2, 132, 199)",
        values: rows.iter().map(|r| r.closing_balance).collect(),
    }];
    (labels, series)
}

fn next_visible(current: usize, total: usize) -> usize {
    (current + SUMMARY_ROWS_PER_LOAD).min(total)
}

#[function_component(UsdSummaryPage)]
pub fn usd_summary_page(props: &PageProps) -> Html {
    let scope = use_request_scope();
    let rows = use_state(Vec::<SummaryPoint>::new);
    let anchor = use_state(|| None::<NaiveDate>);
    let visible = use_state(|| 0usize);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);

    {
        let api = props.app.client.scoped(&scope);
        let rows = rows.clone();
        let anchor = anchor.clone();
        let visible = visible.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let Some(result) = scope.settle(api.usd_summary_all().await) else {
                        return;
                    };
                    match result {
                        Ok(all) => {
                            let total = all.len();
                            let (window, latest) = trailing_year(all);
                            log::info!(
                                "USD summary: {} of {} rows fall in the trailing year",
                                window.len(),
                                total
                            );
                            visible.set(next_visible(0, window.len()));
                            anchor.set(latest);
                            rows.set(window);
                        }
                        Err(err) => error.set(Some(err.user_message())),
                    }
                    loading.set(false);
                });
                || ()
            },
            (),
        );
    }

    let on_load_more = {
        let visible = visible.clone();
        let total = rows.len();
        Callback::from(move |_| visible.set(next_visible(*visible, total)))
    };

    let (labels, series) = closing_balance_series(&rows);
    let anchor_caption = (*anchor)
        .map(|d| format!("Last 12 months ending {}", format_date(d)))
        .unwrap_or_default();

    let table = html! {
        <div class="bg-card rounded-lg border border-border overflow-x-auto">
            <table class="w-full text-left border-collapse">
                <thead class="bg-secondary border-b border-border">
                    <tr>
                        <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Reporting Date"}</th>
                        <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Previous Balance"}</th>
                        <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Opening Balance"}</th>
                        <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Net Activity"}</th>
                        <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Closing Balance (USD)"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    { for rows.iter().rev().take(*visible).map(|row| html! {
                        <tr key={row.id} class="text-sm hover:bg-muted/30 transition-colors">
                            <td class="px-6 py-3 text-muted-foreground">{ row.reporting_date.clone().unwrap_or_else(|| "N/A".to_string()) }</td>
                            <td class="px-6 py-3 text-right">{ format_optional_amount(row.previous_balance) }</td>
                            <td class="px-6 py-3 text-right">{ format_optional_amount(row.opening_balance) }</td>
                            <td class="px-6 py-3 text-right">{ format_optional_amount(row.net_activity) }</td>
                            <td class="px-6 py-3 text-right font-semibold">{ format_optional_amount(row.closing_balance) }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    };

    let body = if *loading {
        html! { <p class="text-muted-foreground text-center py-10">{"Loading summary data..."}</p> }
    } else if rows.is_empty() {
        if error.is_some() {
            html! {}
        } else {
            html! { <p class="text-muted-foreground text-center py-10">{"No summary data found."}</p> }
        }
    } else {
        html! {
            <>
                { section("Closing Balance Trend", html! {
                    <>
                        <p class="text-xs text-muted-foreground">{ anchor_caption }</p>
                        <LineChart {labels} {series} />
                    </>
                }) }
                { table }
                if *visible < rows.len() {
                    <div class="flex justify-center">
                        <button class={SECONDARY_BUTTON_CLASS} onclick={on_load_more}>{"Load More"}</button>
                    </div>
                }
            </>
        }
    };

    page_shell(
        "USD Summary Output",
        html! {},
        html! {
            <>
                { error_banner((*error).as_ref()) }
                { body }
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, date: Option<&str>, closing: Option<f64>) -> SummaryPoint {
        SummaryPoint {
            id,
            reporting_date: date.map(str::to_string),
            previous_balance: None,
            opening_balance: None,
            net_activity: None,
            closing_balance: closing,
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn window_is_oldest_first_and_anchored_on_latest() {
        let (window, anchor) = trailing_year(vec![
            row(3, Some("2024-06-01"), Some(30.0)),
            row(1, Some("2022-12-31"), Some(10.0)),
            row(2, Some("2023-09-15"), Some(20.0)),
            row(4, None, Some(99.0)),
        ]);
        let ids: Vec<i64> = window.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(anchor, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn chart_keeps_gaps_for_missing_balances() {
        let (labels, series) = closing_balance_series(&[
            row(1, Some("2024-05-31"), Some(10.0)),
            row(2, Some("2024-06-01"), None),
        ]);
        assert_eq!(labels, vec!["2024-05-31", "2024-06-01"]);
        assert_eq!(series[0].values, vec![Some(10.0), None]);
    }

    #[test]
    fn load_more_reveals_ten_rows_at_a_time() {
        assert_eq!(next_visible(0, 25), 10);
        assert_eq!(next_visible(10, 25), 20);
        assert_eq!(next_visible(20, 25), 25);
        assert_eq!(next_visible(0, 4), 4);
    }
}
