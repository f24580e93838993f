//! Home gallery: transformation shortcuts, debounced title search, and the
//! paginated image grid.

use api::{ImageInfo, TransformationType};
use dioxus::prelude::*;
use ui::{use_debounce, DEBOUNCE_MS};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let mut search = use_signal(String::new);
    let mut query = use_signal(String::new);
    let mut page = use_signal(|| 1u32);
    let debounce = use_debounce();

    let gallery = use_resource(move || {
        let q = query();
        let p = page();
        async move { api::get_image_gallery(Some(q).filter(|q| !q.is_empty()), p).await }
    });

    let handle_search = move |evt: FormEvent| {
        search.set(evt.value());
        debounce.trigger(DEBOUNCE_MS, move || {
            page.set(1);
            query.set(search.peek().clone());
        });
    };

    rsx! {
        section {
            class: "home-hero",
            h1 { class: "home-title", "Unleash your creative vision with PixelLift" }
            ul {
                class: "home-shortcuts",
                for t in TransformationType::ALL {
                    li {
                        key: "{t.key()}",
                        Link {
                            class: "home-shortcut",
                            to: Route::AddTransformation { type_key: t.key().to_string() },
                            "{t.title()}"
                        }
                    }
                }
            }
        }

        section {
            class: "home-gallery",
            div {
                class: "home-gallery-header",
                h2 { class: "view-section-title", "Recent edits" }
                input {
                    class: "input home-search",
                    r#type: "search",
                    placeholder: "Search by title",
                    value: "{search}",
                    oninput: handle_search,
                }
            }

            {match gallery() {
                Some(Ok(results)) => rsx! {
                    if results.images.is_empty() {
                        p { class: "home-empty", "No images found" }
                    } else {
                        div {
                            class: "image-grid",
                            for image in results.images.iter() {
                                ImageCard { key: "{image.id}", image: image.clone() }
                            }
                        }
                    }

                    if results.total_pages > 1 {
                        div {
                            class: "pagination",
                            button {
                                class: "btn btn-outline",
                                disabled: page() <= 1,
                                onclick: move |_| page.set(page() - 1),
                                "Previous"
                            }
                            span { class: "pagination-status", "Page {page()} of {results.total_pages}" }
                            button {
                                class: "btn btn-outline",
                                disabled: u64::from(page()) >= results.total_pages,
                                onclick: move |_| page.set(page() + 1),
                                "Next"
                            }
                        }
                    }
                },
                Some(Err(e)) => rsx! {
                    p { class: "view-error", "Could not load the gallery: {e}" }
                },
                None => rsx! {
                    p { class: "home-empty", "Loading..." }
                },
            }}
        }
    }
}

#[component]
pub fn ImageCard(image: ImageInfo) -> Element {
    let preview = if image.transformation_url.is_empty() {
        image.secure_url.clone()
    } else {
        image.transformation_url.clone()
    };

    rsx! {
        Link {
            class: "image-card",
            to: Route::TransformationDetail { image_id: image.id.clone() },
            img {
                class: "image-card-preview",
                src: "{preview}",
                alt: "{image.title}",
            }
            div {
                class: "image-card-meta",
                p { class: "image-card-title", "{image.title}" }
                span { class: "image-card-type", "{image.transformation_type.title()}" }
            }
        }
    }
}
