use dioxus::prelude::*;

use ui::{use_auth, AuthProvider, LogoutButton, Navbar};
use views::{
    AddTransformation, Home, Login, Profile, TransformationDetail, UpdateTransformation,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/transformations/add/:type_key")]
        AddTransformation { type_key: String },
        #[route("/transformations/:image_id/update")]
        UpdateTransformation { image_id: String },
        #[route("/transformations/:image_id")]
        TransformationDetail { image_id: String },
        #[route("/profile")]
        Profile {},
    #[end_layout]
    #[route("/login")]
    Login {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const FONT_CSS: &str =
    "https://fonts.googleapis.com/css2?family=IBM+Plex+Sans:wght@400;500;600;700&display=swap";

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use axum::routing::get;
    use tower_sessions::cookie::time::Duration;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Establish the database connection up front so a bad MONGODB_URI fails
    // at startup, not on the first request.
    api::db::get().await.expect("failed to connect to database");

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    let router = axum::Router::new()
        // OAuth callback first, then the Dioxus application.
        .route("/auth/github/callback", get(github_callback))
        .serve_dioxus_application(ServeConfigBuilder::default(), App)
        .layer(session_layer);

    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .unwrap();
}

#[cfg(feature = "server")]
async fn github_callback(
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
    session: tower_sessions::Session,
) -> axum::response::Redirect {
    use axum::response::Redirect;

    let Some(code) = params.get("code") else {
        tracing::error!("GitHub callback missing code");
        return Redirect::to("/login?error=missing_code");
    };
    let Some(state) = params.get("state") else {
        tracing::error!("GitHub callback missing state");
        return Redirect::to("/login?error=missing_state");
    };

    match api::auth::GitHubOAuth::new() {
        Ok(oauth) => match oauth.exchange_code(code, state).await {
            Ok(user) => {
                if let Err(e) = session
                    .insert(api::auth::SESSION_USER_ID_KEY, user.to_info().id)
                    .await
                {
                    tracing::error!("failed to set session: {}", e);
                    return Redirect::to("/login?error=session_error");
                }
                Redirect::to("/")
            }
            Err(e) => {
                tracing::error!("GitHub OAuth error: {}", e);
                Redirect::to("/login?error=oauth_error")
            }
        },
        Err(e) => {
            tracing::error!("failed to create GitHub OAuth: {}", e);
            Redirect::to("/login?error=config_error")
        }
    }
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: FONT_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Navbar-wrapped layout for every page except login.
#[component]
fn Shell() -> Element {
    let auth = use_auth();
    let state = auth();
    let signed_out = state.user.is_none() && !state.loading;

    rsx! {
        Navbar {
            Link { class: "navbar-link", to: Route::Home {}, "Gallery" }
            if let Some(user) = state.user {
                Link { class: "navbar-link", to: Route::Profile {}, "Profile" }
                span { class: "navbar-credits", "{user.credit_balance} credits" }
                LogoutButton { class: "btn btn-ghost" }
            }
            if signed_out {
                Link { class: "navbar-link", to: Route::Login {}, "Log in" }
            }
        }
        main {
            class: "page",
            Outlet::<Route> {}
        }
    }
}
