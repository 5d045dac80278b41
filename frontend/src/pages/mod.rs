pub mod admin;
pub mod dashboard;
pub mod forecast;
pub mod history;
pub mod liquidity;
pub mod login;
pub mod report;
pub mod usd_exposure;
pub mod usd_summary;

use web_sys::HtmlInputElement;
use yew::prelude::*;

/// `oninput` handler that mirrors a text input into `state`.
pub(crate) fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub(crate) const INPUT_CLASS: &str = "w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary";
pub(crate) const BUTTON_CLASS: &str = "px-4 py-2 bg-primary text-primary-foreground rounded-lg font-semibold hover:opacity-90 transition-opacity disabled:opacity-50 disabled:cursor-not-allowed";
pub(crate) const SECONDARY_BUTTON_CLASS: &str = "flex items-center gap-2 px-4 py-2 border border-border rounded-lg text-sm font-medium hover:bg-secondary transition-colors disabled:opacity-50";

pub(crate) fn validate_reporting_date(date: &str) -> Result<(), crate::error::ValidationError> {
    if date.trim().is_empty() {
        Err(crate::error::ValidationError::MissingReportingDate)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn reporting_date_is_required() {
        assert_eq!(
            validate_reporting_date(" "),
            Err(ValidationError::MissingReportingDate)
        );
        assert_eq!(validate_reporting_date("2024-03-31"), Ok(()));
    }
}
