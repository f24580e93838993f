use dioxus::prelude::*;

use crate::components::Spinner;

/// Preview pane for the derived transformation URL.
#[component]
pub fn TransformedImage(
    title: String,
    transformation_url: Option<String>,
    #[props(default)] transforming: bool,
    #[props(default = true)] show_download: bool,
) -> Element {
    rsx! {
        div {
            class: "transformed-image",
            div {
                class: "transformed-image-header",
                h3 { class: "transformed-image-title", "Transformed" }
                if show_download {
                    if let Some(url) = transformation_url.clone() {
                        a {
                            class: "transformed-image-download",
                            href: "{url}",
                            download: "{title}",
                            "Download"
                        }
                    }
                }
            }

            {match transformation_url {
                Some(url) => rsx! {
                    div {
                        class: "transformed-image-frame",
                        img {
                            class: "transformed-image-preview",
                            src: "{url}",
                            alt: "{title}",
                        }
                        if transforming {
                            div {
                                class: "transformed-image-overlay",
                                Spinner { label: "Transforming..." }
                            }
                        }
                    }
                },
                None => rsx! {
                    div {
                        class: "transformed-image-placeholder",
                        p { "Transformed image will appear here" }
                    }
                },
            }}
        }
    }
}
