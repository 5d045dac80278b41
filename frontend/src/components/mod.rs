pub mod icons;
pub mod line_chart;
pub mod line_item_form;
mod shell;

pub use shell::{
    error_banner, loading_row, page_shell, section, success_banner, StatCard,
};
