use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant};

/// Shown when the credit balance cannot cover the transformation fee.
/// Editing stays possible behind it; the user can keep working or top up
/// from their profile.
#[component]
pub fn InsufficientCreditsModal(on_close: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            div {
                class: "modal",
                h2 { class: "modal-title", "Insufficient credits" }
                p {
                    class: "modal-body",
                    "You have run out of credits for applying transformations. "
                    "Your remaining work is untouched."
                }
                div {
                    class: "modal-actions",
                    a { class: "btn btn-primary", href: "/profile", "View profile" }
                    Button {
                        variant: ButtonVariant::Outline,
                        onclick: move |_| on_close.call(()),
                        "Keep editing"
                    }
                }
            }
        }
    }
}
