//! Profile: account details, the credit balance, and the user's own edits.

use dioxus::prelude::*;
use ui::use_auth;

use crate::views::home::ImageCard;
use crate::Route;

#[component]
pub fn Profile() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    if !auth().loading && auth().user.is_none() {
        nav.replace(Route::Login {});
    }

    let mut page = use_signal(|| 1u32);
    let images = use_resource(move || {
        let p = page();
        async move { api::get_user_images(p).await }
    });

    rsx! {
        section {
            class: "view-page",
            h1 { class: "view-title", "Profile" }

            if let Some(user) = auth().user {
                div {
                    class: "profile-card",
                    if let Some(photo) = &user.photo_url {
                        img { class: "profile-photo", src: "{photo}", alt: "{user.username}" }
                    }
                    div {
                        class: "profile-fields",
                        p { class: "profile-name", "{user.display_name()}" }
                        p { class: "profile-email", "{user.email}" }
                    }
                    div {
                        class: "profile-credits",
                        span { "Credits available" }
                        strong { "{user.credit_balance}" }
                    }
                }
            }

            h2 { class: "view-section-title", "My edits" }
            {match images() {
                Some(Ok(results)) => rsx! {
                    if results.images.is_empty() {
                        p { class: "home-empty", "Nothing here yet. Pick a transformation to get started." }
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
                    p { class: "view-error", "Could not load your images: {e}" }
                },
                None => rsx! {
                    p { class: "home-empty", "Loading..." }
                },
            }}
        }
    }
}
