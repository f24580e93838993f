use dioxus::prelude::*;
use ui::{use_auth, FormAction, TransformationForm};

use crate::Route;

#[component]
pub fn UpdateTransformation(image_id: String) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    if !auth().loading && auth().user.is_none() {
        nav.replace(Route::Login {});
    }

    let detail = use_resource(move || {
        let id = image_id.clone();
        async move { api::get_image_by_id(id).await }
    });

    rsx! {
        {match detail() {
            Some(Ok(detail)) => {
                let transformation_type = detail.image.transformation_type;
                rsx! {
                    section {
                        class: "view-page",
                        h1 { class: "view-title", "{transformation_type.title()}" }
                        p { class: "view-subtitle", "Update \"{detail.image.title}\"" }

                        TransformationForm {
                            transformation_type,
                            action: FormAction::Update(detail.image.clone()),
                            on_saved: move |id: String| {
                                nav.push(Route::TransformationDetail { image_id: id });
                            },
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
