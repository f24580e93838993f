use dioxus::prelude::*;

use crate::components::Label;

/// Labeled wrapper around one form control.
#[component]
pub fn CustomField(
    label: String,
    #[props(default)] html_for: String,
    #[props(default)] class: String,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "custom-field {class}",
            Label { html_for: html_for, "{label}" }
            {children}
        }
    }
}
