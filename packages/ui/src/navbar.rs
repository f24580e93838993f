use dioxus::prelude::*;

#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        header {
            class: "navbar",
            a { class: "navbar-brand", href: "/", "PixelLift" }
            nav {
                class: "navbar-links",
                {children}
            }
        }
    }
}
