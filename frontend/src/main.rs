mod api;
mod app;
mod bulk_upload;
mod components;
mod config;
mod error;
mod export;
mod format;
mod line_items;
mod models;
mod numeric_input;
mod pages;
mod pagination;
mod ratios;
mod session;
mod time_window;

fn main() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();

    log::info!("backend at {}", config::API_BASE_URL);
    yew::Renderer::<app::App>::new().render();
}
