//! MongoDB connection handle, memoized with the OnceCell pattern.

use mongodb::{Client, Collection, Database};
use tokio::sync::OnceCell;

use crate::auth::OAuthState;
use crate::error::ApiError;
use crate::models::{Image, User};

static DB: OnceCell<Db> = OnceCell::const_new();

/// An established connection to the application database.
///
/// Constructed once via [`Db::connect`]; service code takes `&Db` rather than
/// reaching for globals, so it can be pointed at a test database.
#[derive(Debug, Clone)]
pub struct Db {
    client: Client,
    database: Database,
}

impl Db {
    /// Open a connection and select the named database.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, ApiError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(db_name);
        Ok(Self { client, database })
    }

    pub fn users(&self) -> Collection<User> {
        self.database.collection("users")
    }

    pub fn images(&self) -> Collection<Image> {
        self.database.collection("images")
    }

    pub fn oauth_states(&self) -> Collection<OAuthState> {
        self.database.collection("oauth_states")
    }

    /// The underlying client, for shutdown or admin commands.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Get or initialize the shared database handle.
///
/// The connection string comes from `MONGODB_URI` and the database name from
/// `MONGODB_DB` (default `pixellift`). Concurrent early callers await the same
/// in-flight connection attempt; once established the handle is returned
/// unchanged for the life of the process.
pub async fn get() -> Result<&'static Db, ApiError> {
    DB.get_or_try_init(|| async {
        dotenvy::dotenv().ok();

        let uri =
            std::env::var("MONGODB_URI").map_err(|_| ApiError::Config("MONGODB_URI must be set"))?;
        let db_name = std::env::var("MONGODB_DB").unwrap_or_else(|_| "pixellift".to_string());

        Db::connect(&uri, &db_name).await
    })
    .await
}
