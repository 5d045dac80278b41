use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::SECONDARY_BUTTON_CLASS;
use crate::api::RequestScope;
use crate::app::AppContext;
use crate::components::icons::icon_download;
use crate::components::line_chart::{LineChart, Series};
use crate::components::{error_banner, page_shell};
use crate::export::{download_csv, forecast_filename};
use crate::format::{format_amount, format_optional_amount};
use crate::models::{Currency, ForecastPoint};

pub(crate) const NO_FORECAST_MESSAGE: &str =
    "No forecast data found for the selected currency. Please generate a forecast first.";

/// Chart labels plus the forecasted and actual balance lines.
pub(crate) fn forecast_series(points: &[ForecastPoint]) -> (Vec<String>, Vec<Series>) {
    let labels = points.iter().map(|p| p.date.clone()).collect();
    let series = vec![
        Series {
            label: "Forecasted Cash Balance",
            color: "rgb(255, 159, 64)",
            values: points.iter().map(|p| Some(p.forecasted_balance)).collect(),
        },
        Series {
            label: "Actual Cash Balance",
            color: "rgb(54, 162, 235)",
            values: points.iter().map(|p| p.actual_balance).collect(),
        },
    ];
    (labels, series)
}

#[derive(Properties, PartialEq)]
pub struct ForecastPageProps {
    pub app: AppContext,
    pub currency: Currency,
}

#[function_component(ForecastPage)]
pub fn forecast_page(props: &ForecastPageProps) -> Html {
    let points = use_state(Vec::<ForecastPoint>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);

    {
        let client = props.app.client.clone();
        let points = points.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |currency: &Currency| {
                let currency = *currency;
                // One scope per currency, so a slower answer for the previous
                // one is aborted and never shown.
                let scope = RequestScope::new();
                let api = client.scoped(&scope);
                let teardown = scope.clone();
                loading.set(true);
                error.set(None);
                points.set(Vec::new());
                spawn_local(async move {
                    let Some(result) = scope.settle(api.latest_forecast(currency).await) else {
                        return;
                    };
                    match result {
                        Ok(list) if list.is_empty() => {
                            error.set(Some(NO_FORECAST_MESSAGE.to_string()));
                        }
                        Ok(list) => {
                            log::debug!("loaded {} forecast rows for {}", list.len(), currency);
                            points.set(list);
                        }
                        Err(err) => error.set(Some(err.user_message())),
                    }
                    loading.set(false);
                });
                move || teardown.cancel()
            },
            props.currency,
        );
    }

    let on_download = {
        let points = points.clone();
        let error = error.clone();
        let currency = props.currency;
        Callback::from(move |_| {
            if let Err(msg) = download_csv(points.as_slice(), &forecast_filename(currency)) {
                log::error!("CSV export failed: {}", msg);
                error.set(Some(msg));
            }
        })
    };

    let (labels, series) = forecast_series(&points);
    let title = format!("Forecast Results for {}", props.currency);

    let body = if *loading {
        html! { <p class="text-muted-foreground">{"Loading forecast results..."}</p> }
    } else if points.is_empty() {
        html! {}
    } else {
        html! {
            <>
                <div class="bg-card rounded-lg border border-border p-6">
                    <LineChart {labels} {series} height={400.0} />
                </div>
                <div class="bg-card rounded-lg border border-border overflow-x-auto">
                    <table class="w-full text-left border-collapse">
                        <thead class="bg-secondary border-b border-border">
                            <tr>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Date"}</th>
                                <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Forecasted Amount"}</th>
                                <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Forecasted Cash Balance"}</th>
                                <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Actual Cash Balance"}</th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { for points.iter().map(|p| html! {
                                <tr class="text-sm hover:bg-muted/30 transition-colors">
                                    <td class="px-6 py-3 text-muted-foreground">{ p.date.clone() }</td>
                                    <td class="px-6 py-3 text-right">{ format_amount(p.forecasted_amount) }</td>
                                    <td class="px-6 py-3 text-right">{ format_amount(p.forecasted_balance) }</td>
                                    <td class="px-6 py-3 text-right">{ format_optional_amount(p.actual_balance) }</td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                </div>
            </>
        }
    };

    page_shell(
        &title,
        html! {
            <button class={SECONDARY_BUTTON_CLASS} onclick={on_download} disabled={points.is_empty()}>
                { icon_download() }
                <span>{"Download CSV"}</span>
            </button>
        },
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

    fn point(date: &str, actual: Option<f64>) -> ForecastPoint {
        ForecastPoint {
            date: date.to_string(),
            forecasted_amount: -250.0,
            forecasted_balance: 10_000.0,
            actual_balance: actual,
        }
    }

    #[test]
    fn both_lines_share_the_date_axis() {
        let (labels, series) = forecast_series(&[
            point("2024-07-01", Some(9_800.0)),
            point("2024-07-02", None),
        ]);
        assert_eq!(labels, vec!["2024-07-01", "2024-07-02"]);
        assert_eq!(series[0].values, vec![Some(10_000.0), Some(10_000.0)]);
        assert_eq!(series[1].values, vec![Some(9_800.0), None]);
    }
}
