use api::TransformationType;
use dioxus::prelude::*;
use ui::{use_auth, FormAction, TransformationForm};

use crate::Route;

#[component]
pub fn AddTransformation(type_key: String) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    let Some(transformation_type) = TransformationType::from_key(&type_key) else {
        return rsx! {
            div {
                class: "view-placeholder",
                h2 { "Unknown transformation" }
            }
        };
    };

    if !auth().loading && auth().user.is_none() {
        nav.replace(Route::Login {});
    }

    rsx! {
        section {
            class: "view-page",
            h1 { class: "view-title", "{transformation_type.title()}" }
            p { class: "view-subtitle", "{transformation_type.subtitle()}" }

            TransformationForm {
                transformation_type,
                action: FormAction::Add,
                on_saved: move |id: String| {
                    nav.push(Route::TransformationDetail { image_id: id });
                },
            }
        }
    }
}
