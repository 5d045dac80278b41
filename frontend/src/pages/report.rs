//! One-page management report.
//!
//! Four independent sources load concurrently and all of them settle before
//! anything is shown. A failed source is reported while the others still
//! render; a missing "latest" record is not a failure.

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::forecast::{forecast_series, NO_FORECAST_MESSAGE};
use super::usd_summary::{closing_balance_series, trailing_year};
use super::SECONDARY_BUTTON_CLASS;
use crate::api::use_request_scope;
use crate::app::PageProps;
use crate::components::line_chart::LineChart;
use crate::components::{error_banner, page_shell, section, StatCard};
use crate::error::ApiError;
use crate::format::{format_currency, format_percent};
use crate::models::{Currency, ForecastPoint, LiquidityRatioRecord, SummaryPoint, UsdExposureRecord};
use crate::ratios::Position;

const REPORT_FORECAST_CURRENCY: Currency = Currency::Cad;

#[derive(Clone, Debug, Default, PartialEq)]
struct ReportData {
    forecast: Vec<ForecastPoint>,
    liquidity: Option<LiquidityRatioRecord>,
    exposure: Option<UsdExposureRecord>,
    /// Trailing year, oldest first.
    usd_summary: Vec<SummaryPoint>,
    errors: Vec<String>,
}

impl ReportData {
    fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join("; "))
        }
    }
}

#[derive(Default)]
struct Outcomes {
    terminal: Option<ApiError>,
    errors: Vec<String>,
}

impl Outcomes {
    fn take<T>(&mut self, label: &str, result: Result<T, ApiError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if err.is_terminal() => {
                self.terminal.get_or_insert(err);
                None
            }
            Err(err) => {
                log::warn!("report: {} failed: {}", label, err);
                self.errors
                    .push(format!("Failed to fetch {}: {}", label, err.user_message()));
                None
            }
        }
    }
}

/// Keeps whatever succeeded and turns each failure into a labelled message.
/// A terminal error (expired session, cancellation) replaces the whole
/// report.
fn assemble(
    forecast: Result<Vec<ForecastPoint>, ApiError>,
    liquidity: Result<Option<LiquidityRatioRecord>, ApiError>,
    exposure: Result<Option<UsdExposureRecord>, ApiError>,
    usd_summary: Result<Vec<SummaryPoint>, ApiError>,
) -> Result<ReportData, ApiError> {
    let mut outcomes = Outcomes::default();
    let forecast = outcomes.take("CAD forecast", forecast).unwrap_or_default();
    let liquidity = outcomes.take("liquidity ratio", liquidity).flatten();
    let exposure = outcomes.take("USD exposure", exposure).flatten();
    let usd_summary = outcomes
        .take("all USD summary data", usd_summary)
        .map(|rows| trailing_year(rows).0)
        .unwrap_or_default();

    if let Some(err) = outcomes.terminal {
        return Err(err);
    }
    Ok(ReportData {
        forecast,
        liquidity,
        exposure,
        usd_summary,
        errors: outcomes.errors,
    })
}

#[function_component(ReportPage)]
pub fn report_page(props: &PageProps) -> Html {
    let scope = use_request_scope();
    let report = use_state(|| None::<ReportData>);
    let fatal_error = use_state(|| None::<String>);

    {
        let api = props.app.client.scoped(&scope);
        let report = report.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let (forecast, liquidity, exposure, usd_summary) = futures::join!(
                        api.latest_forecast(REPORT_FORECAST_CURRENCY),
                        api.latest_liquidity_ratios(),
                        api.latest_usd_exposure(),
                        api.usd_summary_all(),
                    );
                    let assembled = assemble(forecast, liquidity, exposure, usd_summary);
                    if let Some(Ok(data)) = scope.settle(assembled) {
                        report.set(Some(data));
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_print = {
        let fatal_error = fatal_error.clone();
        Callback::from(move |_| {
            let printed = web_sys::window().map(|w| w.print());
            if !matches!(printed, Some(Ok(()))) {
                log::error!("print dialog unavailable");
                fatal_error.set(Some("Could not open the print dialog.".to_string()));
            }
        })
    };

    let Some(data) = &*report else {
        return page_shell(
            "Report",
            html! {},
            html! { <p class="text-muted-foreground">{"Loading report data..."}</p> },
        );
    };

    let forecast_view = if data.forecast.is_empty() {
        html! { <p class="text-sm text-muted-foreground">{ NO_FORECAST_MESSAGE }</p> }
    } else {
        let (labels, series) = forecast_series(&data.forecast);
        html! { <LineChart {labels} {series} /> }
    };

    let liquidity_view = match &data.liquidity {
        Some(record) => html! {
            <>
                <p class="text-sm text-muted-foreground">{ format!("Reporting Date: {}", record.reporting_date) }</p>
                <div class="grid grid-cols-1 sm:grid-cols-3 gap-4">
                    <StatCard title="Statutory Liquidity Ratio" value={format_percent(record.statutory_ratio)} />
                    <StatCard title="Core Liquidity Ratio" value={format_percent(record.core_ratio)} />
                    <StatCard title="Total Liquidity Ratio" value={format_percent(record.total_ratio)} />
                </div>
            </>
        },
        None => html! { <p class="text-sm text-muted-foreground">{"No liquidity ratio data available."}</p> },
    };

    let exposure_view = match &data.exposure {
        Some(record) => {
            let (value, caption) = match record.usd_exposure {
                Some(amount) => (
                    format_currency(amount, "USD"),
                    Some(AttrValue::from(Position::of(amount).label())),
                ),
                None => ("N/A".to_string(), None),
            };
            html! {
                <>
                    <p class="text-sm text-muted-foreground">{ format!("Reporting Date: {}", record.reporting_date) }</p>
                    <StatCard title="USD Exposure" {value} {caption} />
                </>
            }
        }
        None => html! { <p class="text-sm text-muted-foreground">{"No USD exposure data available."}</p> },
    };

    let summary_view = if data.usd_summary.is_empty() {
        html! { <p class="text-sm text-muted-foreground">{"No USD summary data available."}</p> }
    } else {
        let (labels, series) = closing_balance_series(&data.usd_summary);
        html! { <LineChart {labels} {series} /> }
    };

    page_shell(
        "Report",
        html! {
            <button class={SECONDARY_BUTTON_CLASS} onclick={on_print}>{"Download PDF"}</button>
        },
        html! {
            <>
                { error_banner(data.error_message().as_ref()) }
                { error_banner((*fatal_error).as_ref()) }
                { section("CAD Cash Balance Forecast", forecast_view) }
                { section("Latest Liquidity Ratios", liquidity_view) }
                { section("Latest USD Exposure", exposure_view) }
                { section("USD Closing Balance (Last 12 Months)", summary_view) }
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liquidity() -> LiquidityRatioRecord {
        LiquidityRatioRecord {
            id: "lr-1".to_string(),
            reporting_date: "2024-06-30".to_string(),
            statutory_ratio: Some(12.5),
            core_ratio: None,
            total_ratio: Some(30.0),
            created_at: None,
        }
    }

    fn summary_row(id: i64, date: &str) -> SummaryPoint {
        SummaryPoint {
            id,
            reporting_date: Some(date.to_string()),
            previous_balance: None,
            opening_balance: None,
            net_activity: None,
            closing_balance: Some(1.0),
            currency: Some("USD".to_string()),
        }
    }

    #[test]
    fn missing_latest_records_are_not_errors() {
        let report = assemble(Ok(Vec::new()), Ok(None), Ok(None), Ok(Vec::new())).unwrap();
        assert_eq!(report.error_message(), None);
        assert_eq!(report.liquidity, None);
    }

    #[test]
    fn failures_are_collected_while_the_rest_renders() {
        let report = assemble(
            Err(ApiError::Rejected("No forecast for CAD".to_string())),
            Ok(Some(liquidity())),
            Err(ApiError::Network),
            Ok(vec![summary_row(1, "2022-01-01"), summary_row(2, "2024-06-01")]),
        )
        .unwrap();

        assert_eq!(report.liquidity, Some(liquidity()));
        assert_eq!(report.usd_summary.len(), 1);
        assert_eq!(
            report.error_message().unwrap(),
            "Failed to fetch CAD forecast: No forecast for CAD; \
             Failed to fetch USD exposure: An unexpected error occurred. Please try again."
        );
    }

    #[test]
    fn expired_session_drops_the_report() {
        let result = assemble(
            Ok(Vec::new()),
            Err(ApiError::AuthExpired),
            Err(ApiError::AuthExpired),
            Err(ApiError::Network),
        );
        assert_eq!(result, Err(ApiError::AuthExpired));
    }
}
