use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, HtmlInputElement};
use yew::prelude::*;

use crate::line_items::LineItem;
use crate::numeric_input::{distribute_paste, to_canonical, to_display};

/// Applies a keystroke to row `index`. `None` means the edit is rejected
/// and the row keeps its value.
fn apply_edit(items: &[LineItem], index: usize, display: &str) -> Option<Vec<LineItem>> {
    let canonical = to_canonical(display).ok()?;
    let mut next = items.to_vec();
    next.get_mut(index)?.raw_value = canonical;
    Some(next)
}

fn apply_paste(items: &[LineItem], index: usize, text: &str) -> Option<Vec<LineItem>> {
    let mut next = items.to_vec();
    if distribute_paste(text, index, &mut next) == 0 {
        None
    } else {
        Some(next)
    }
}

#[derive(Properties, PartialEq)]
pub struct LineItemFormProps {
    pub items: Vec<LineItem>,
    pub on_change: Callback<Vec<LineItem>>,
    #[prop_or_default]
    pub disabled: bool,
}

/// Code / description / amount grid. Amounts show thousands separators while
/// the values handed to `on_change` stay canonical. Pasting a column of
/// numbers into a row fills that row and the ones below it.
#[function_component(LineItemForm)]
pub fn line_item_form(props: &LineItemFormProps) -> Html {
    let rows = props.items.iter().enumerate().map(|(index, item)| {
        let oninput = {
            let items = props.items.clone();
            let on_change = props.on_change.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                match apply_edit(&items, index, &input.value()) {
                    Some(next) => on_change.emit(next),
                    None => input.set_value(&to_display(&items[index].raw_value)),
                }
            })
        };

        let onpaste = {
            let items = props.items.clone();
            let on_change = props.on_change.clone();
            Callback::from(move |e: Event| {
                let Some(text) = e
                    .dyn_ref::<ClipboardEvent>()
                    .and_then(ClipboardEvent::clipboard_data)
                    .and_then(|data| data.get_data("text/plain").ok())
                else {
                    return;
                };
                e.prevent_default();
                if let Some(next) = apply_paste(&items, index, &text) {
                    on_change.emit(next);
                }
            })
        };

        html! {
            <tr class="text-sm">
                <td class="px-4 py-2 font-mono text-muted-foreground">{ item.code }</td>
                <td class="px-4 py-2 text-foreground">{ item.description }</td>
                <td class="px-4 py-2">
                    <input
                        type="text"
                        inputmode="decimal"
                        class="w-full px-3 py-1.5 text-right bg-input border border-input rounded-md focus:outline-none focus:ring-2 focus:ring-primary"
                        value={to_display(&item.raw_value)}
                        disabled={props.disabled}
                        {oninput}
                        {onpaste}
                    />
                </td>
            </tr>
        }
    });

    html! {
        <table class="w-full text-left border-collapse">
            <thead class="bg-secondary border-b border-border">
                <tr>
                    <th class="px-4 py-2 text-sm font-semibold text-secondary-foreground w-24">{"Code"}</th>
                    <th class="px-4 py-2 text-sm font-semibold text-secondary-foreground">{"Description"}</th>
                    <th class="px-4 py-2 text-sm font-semibold text-secondary-foreground text-right w-56">{"Amount"}</th>
                </tr>
            </thead>
            <tbody class="divide-y divide-border">
                { for rows }
            </tbody>
        </table>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::liquidity_catalog;

    #[test]
    fn edits_store_canonical_values() {
        let items = liquidity_catalog();
        let next = apply_edit(&items, 1, "1,234,5").map(|n| n[1].raw_value.clone());
        assert_eq!(next.as_deref(), Some("12345"));
    }

    #[test]
    fn malformed_edits_are_rejected() {
        let items = liquidity_catalog();
        assert_eq!(apply_edit(&items, 0, "12x"), None);
        assert_eq!(apply_edit(&items, 99, "1"), None);
    }

    #[test]
    fn paste_without_numbers_is_ignored() {
        let items = liquidity_catalog();
        assert_eq!(apply_paste(&items, 0, "n/a"), None);
        let next = apply_paste(&items, 8, "1\n2\n3").map(|n| {
            n.iter().map(|i| i.raw_value.clone()).collect::<Vec<_>>()
        });
        let tail = next.map(|v| v[8..].to_vec());
        assert_eq!(tail, Some(vec!["1".to_string(), "2".to_string()]));
    }
}
