use yew::prelude::*;

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
pub fn icon_history() -> Html {
    icon_base("M3 12a9 9 0 109-9 9.75 9.75 0 00-6.74 2.74L3 8M3 3v5h5M12 7v5l4 2")
}
pub fn icon_droplets() -> Html {
    icon_base("M12 2.69l5.66 5.66a8 8 0 11-11.31 0z")
}
pub fn icon_dollar() -> Html {
    icon_base("M12 1v22M17 5H9.5a3.5 3.5 0 000 7h5a3.5 3.5 0 010 7H6")
}
pub fn icon_list_checks() -> Html {
    icon_base("M3 17l2 2 4-4M3 7l2 2 4-4M13 6h8M13 12h8M13 18h8")
}
pub fn icon_file_text() -> Html {
    icon_base("M14 2H6a2 2 0 00-2 2v16a2 2 0 002 2h12a2 2 0 002-2V8zM14 2v6h6M16 13H8M16 17H8M10 9H8")
}
pub fn icon_users() -> Html {
    icon_base("M17 21v-2a4 4 0 00-4-4H5a4 4 0 00-4 4v2M9 11a4 4 0 100-8 4 4 0 000 8zM23 21v-2a4 4 0 00-3-3.87M16 3.13a4 4 0 010 7.75")
}
pub fn icon_user_plus() -> Html {
    icon_base("M16 21v-2a4 4 0 00-4-4H5a4 4 0 00-4 4v2M8.5 11a4 4 0 100-8 4 4 0 000 8zM20 8v6M23 11h-6")
}
pub fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
pub fn icon_chevron_left() -> Html {
    icon_base("M15 18l-6-6 6-6")
}
pub fn icon_chevron_right() -> Html {
    icon_base("M9 18l6-6-6-6")
}
pub fn icon_upload() -> Html {
    icon_base("M21 15v4a2 2 0 01-2 2H5a2 2 0 01-2-2v-4M17 8l-5-5-5 5M12 3v12")
}
pub fn icon_download() -> Html {
    icon_base("M21 15v4a2 2 0 01-2 2H5a2 2 0 01-2-2v-4M7 10l5 5 5-5M12 15V3")
}
pub fn icon_trending_up() -> Html {
    icon_base("M3 17l6-6 4 4 7-7")
}
