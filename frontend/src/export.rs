//! CSV download of tabular results.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::models::{Currency, ForecastPoint};

pub trait CsvExportable {
    fn headers() -> Vec<&'static str>;
    fn to_csv_row(&self) -> Vec<String>;
}

impl CsvExportable for ForecastPoint {
    fn headers() -> Vec<&'static str> {
        vec![
            "Date",
            "Forecasted Amount",
            "Forecasted Cash Balance",
            "Actual Cash Balance",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.forecasted_amount.to_string(),
            self.forecasted_balance.to_string(),
            self.actual_balance.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}

fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

pub fn to_csv<T: CsvExportable>(rows: &[T]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(T::headers().join(","));
    for row in rows {
        let cells: Vec<String> = row.to_csv_row().iter().map(|c| escape_csv_cell(c)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

pub fn forecast_filename(currency: Currency) -> String {
    format!("forecast_results_{}.csv", currency.code().to_lowercase())
}

/// Builds the CSV and hands it to the browser as a download.
pub fn download_csv<T: CsvExportable>(rows: &[T], filename: &str) -> Result<(), String> {
    if rows.is_empty() {
        return Err("Nothing to export".to_string());
    }
    let blob = csv_blob(&to_csv(rows))?;
    download_blob(&blob, filename)?;
    log::info!("exported {} rows to {}", rows.len(), filename);
    Ok(())
}

fn csv_blob(content: &str) -> Result<Blob, String> {
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv");

    Blob::new_with_str_sequence_and_options(&parts, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, actual: Option<f64>) -> ForecastPoint {
        ForecastPoint {
            date: date.to_string(),
            forecasted_amount: 1500.5,
            forecasted_balance: 20000.0,
            actual_balance: actual,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let csv = to_csv(&[point("2024-07-01", Some(19876.25)), point("2024-07-02", None)]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Forecasted Amount,Forecasted Cash Balance,Actual Cash Balance"
        );
        assert_eq!(lines[1], "2024-07-01,1500.5,20000,19876.25");
        assert_eq!(lines[2], "2024-07-02,1500.5,20000,");
    }

    #[test]
    fn escapes_separators_and_quotes() {
        assert_eq!(escape_csv_cell("plain"), "plain");
        assert_eq!(escape_csv_cell("1,000"), "\"1,000\"");
        assert_eq!(escape_csv_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn filename_uses_lowercase_currency() {
        assert_eq!(forecast_filename(Currency::Cad), "forecast_results_cad.csv");
    }

    #[test]
    fn empty_export_is_refused() {
        assert_eq!(
            download_csv::<ForecastPoint>(&[], "x.csv"),
            Err("Nothing to export".to_string())
        );
    }
}
