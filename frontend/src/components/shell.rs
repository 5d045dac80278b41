use yew::prelude::*;

pub fn page_shell(title: &str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title.to_string() }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

pub fn section(title: &str, children: Html) -> Html {
    html! {
        <div class="bg-card rounded-lg border border-border p-6 space-y-4">
            <h3 class="text-lg font-bold text-foreground">{ title.to_string() }</h3>
            { children }
        </div>
    }
}

pub fn error_banner(message: Option<&String>) -> Html {
    match message {
        Some(msg) => html! {
            <div class="rounded-lg border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700">{ msg.clone() }</div>
        },
        None => html! {},
    }
}

pub fn success_banner(message: Option<&String>) -> Html {
    match message {
        Some(msg) => html! {
            <div class="rounded-lg border border-green-200 bg-green-50 px-4 py-3 text-sm text-green-700">{ msg.clone() }</div>
        },
        None => html! {},
    }
}

pub fn loading_row(colspan: usize, text: &str) -> Html {
    html! {
        <tr><td colspan={colspan.to_string()} class="px-6 py-6 text-center text-muted-foreground">{ text.to_string() }</td></tr>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    pub value: AttrValue,
    #[prop_or_default]
    pub caption: Option<AttrValue>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
            <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.title.clone() }</p>
            <h3 class="text-2xl font-bold text-slate-800 tracking-tight">{ props.value.clone() }</h3>
            if let Some(caption) = &props.caption {
                <p class="text-xs text-muted-foreground mt-1">{ caption.clone() }</p>
            }
        </div>
    }
}
