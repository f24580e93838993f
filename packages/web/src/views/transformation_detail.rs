//! Detail view for one saved transformation: original and transformed
//! renditions side by side, metadata, and owner-only edit/delete controls.

use dioxus::prelude::*;
use ui::use_auth;

use crate::Route;

#[component]
pub fn TransformationDetail(image_id: String) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    let detail = use_resource({
        let image_id = image_id.clone();
        move || {
            let id = image_id.clone();
            async move { api::get_image_by_id(id).await }
        }
    });

    let mut deleting = use_signal(|| false);
    let delete_id = image_id.clone();
    let handle_delete = move |_| {
        let id = delete_id.clone();
        deleting.set(true);
        spawn(async move {
            if let Err(e) = api::delete_image(id).await {
                tracing::error!("delete failed: {e}");
            }
            // Home, whether or not the delete went through.
            nav.replace(Route::Home {});
        });
    };

    rsx! {
        {match detail() {
            Some(Ok(detail)) => {
                let image = detail.image.clone();
                let author_name = match (&detail.author.first_name, &detail.author.last_name) {
                    (Some(first), Some(last)) => format!("{first} {last}"),
                    (Some(first), None) => first.clone(),
                    _ => "Unknown".to_string(),
                };
                let is_owner = auth()
                    .user
                    .as_ref()
                    .is_some_and(|u| u.id == detail.author.id);

                rsx! {
                    section {
                        class: "view-page",
                        h1 { class: "view-title", "{image.title}" }

                        ul {
                            class: "detail-meta",
                            li { span { "Transformation" } strong { "{image.transformation_type.title()}" } }
                            li { span { "By" } strong { "{author_name}" } }
                            if let Some(prompt) = &image.prompt {
                                li { span { "Prompt" } strong { "{prompt}" } }
                            }
                            if let Some(color) = &image.color {
                                li { span { "Color" } strong { "{color}" } }
                            }
                            if let Some(ratio) = &image.aspect_ratio {
                                li { span { "Aspect ratio" } strong { "{ratio}" } }
                            }
                        }

                        div {
                            class: "detail-images",
                            figure {
                                figcaption { "Original" }
                                img { class: "detail-image", src: "{image.secure_url}", alt: "{image.title}" }
                            }
                            figure {
                                figcaption { "Transformed" }
                                img { class: "detail-image", src: "{image.transformation_url}", alt: "{image.title}" }
                            }
                        }

                        if is_owner {
                            div {
                                class: "detail-actions",
                                Link {
                                    class: "btn btn-primary",
                                    to: Route::UpdateTransformation { image_id: image.id.clone() },
                                    "Update transformation"
                                }
                                button {
                                    class: "btn btn-danger",
                                    disabled: deleting(),
                                    onclick: handle_delete,
                                    if deleting() { "Deleting..." } else { "Delete image" }
                                }
                            }
                        }
                    }
                }
            }
            Some(Err(e)) => rsx! {
                div {
                    class: "view-placeholder",
                    h2 { "Image not found" }
                    p { class: "view-error", "{e}" }
                }
            },
            None => rsx! {
                div {
                    class: "view-placeholder",
                    h2 { "Loading..." }
                }
            },
        }}
    }
}
