//! Login page: GitHub OAuth plus local email+password sign-in/sign-up.

use dioxus::prelude::*;
use ui::{use_auth, AuthState, LoginButton};

use crate::Route;

fn submit_label(busy: bool, registering: bool) -> &'static str {
    if busy {
        "Please wait..."
    } else if registering {
        "Create account"
    } else {
        "Sign in"
    }
}

#[component]
pub fn Login() -> Element {
    let mut auth = use_auth();
    let nav = use_navigator();

    // Already signed in: straight to the gallery.
    if !auth().loading && auth().user.is_some() {
        nav.replace(Route::Home {});
    }

    let mut registering = use_signal(|| false);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let handle_submit = move |_| {
        spawn(async move {
            error.set(None);
            busy.set(true);

            let result = if registering() {
                api::register(email(), password(), first_name(), last_name()).await
            } else {
                api::login_password(email(), password()).await
            };

            match result {
                Ok(user) => {
                    auth.set(AuthState {
                        user: Some(user),
                        loading: false,
                    });
                    nav.replace(Route::Home {});
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        div {
            class: "login-page",
            h1 { class: "login-brand", "PixelLift" }
            p { class: "login-tagline", "AI-powered image editing" }

            LoginButton {
                provider: "github",
                label: "Continue with GitHub",
                class: "btn login-github",
            }

            div { class: "login-divider", "or" }

            div {
                class: "login-form",
                if registering() {
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "First name",
                        value: "{first_name}",
                        oninput: move |evt| first_name.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Last name",
                        value: "{last_name}",
                        oninput: move |evt| last_name.set(evt.value()),
                    }
                }
                input {
                    class: "input",
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    class: "input",
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }

                if let Some(message) = error() {
                    p { class: "view-error", "{message}" }
                }

                button {
                    class: "btn btn-primary login-submit",
                    disabled: busy(),
                    onclick: handle_submit,
                    "{submit_label(busy(), registering())}"
                }

                button {
                    class: "btn btn-ghost",
                    onclick: move |_| registering.toggle(),
                    if registering() {
                        "Have an account? Sign in"
                    } else {
                        "New here? Create an account"
                    }
                }
            }
        }
    }
}
