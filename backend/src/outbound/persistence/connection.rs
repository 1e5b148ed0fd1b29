//! Per-request PostgreSQL connections.
//!
//! There is no pool: [`DieselConnectionProvider`] establishes a new
//! `AsyncPgConnection` for every request and wraps it in a session that
//! closes the connection when the request is done with it.
//!
//! # Example
//!
//! ```ignore
//! let config = ConnectionConfig::new("localhost", "postgres", "", "school", 5432);
//! let provider = DieselConnectionProvider::new(&config)?;
//! let mut session = provider.open().await?;
//! ```

use std::fmt;

use async_trait::async_trait;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::ports::{
    UserRecordConnectionProvider, UserRecordPersistenceError, UserRecordSession,
};

use super::diesel_user_record_session::DieselUserRecordSession;

/// Errors raised while turning a [`ConnectionConfig`] into a connection URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionConfigError {
    /// The host cannot appear in a URL.
    #[error("invalid database host `{host}`: {message}")]
    InvalidHost { host: String, message: String },

    /// The credentials cannot be attached to the URL.
    #[error("invalid database credentials for user `{user}`")]
    InvalidCredentials { user: String },
}

/// Immutable database connection settings.
///
/// Built once at startup and handed to whatever opens connections.
#[derive(Clone)]
pub struct ConnectionConfig {
    host: String,
    user: String,
    password: Zeroizing<String>,
    database: String,
    port: u16,
}

impl ConnectionConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: Zeroizing::new(password.into()),
            database: database.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Render the `postgres://` URL, percent-encoding the credentials.
    ///
    /// An empty password is left out of the URL entirely.
    pub fn database_url(&self) -> Result<Zeroizing<String>, ConnectionConfigError> {
        let invalid_host = |message: String| ConnectionConfigError::InvalidHost {
            host: self.host.clone(),
            message,
        };
        let invalid_credentials = || ConnectionConfigError::InvalidCredentials {
            user: self.user.clone(),
        };

        let mut url = Url::parse("postgres://localhost")
            .map_err(|err| invalid_host(err.to_string()))?;
        url.set_host(Some(&self.host))
            .map_err(|err| invalid_host(err.to_string()))?;
        url.set_port(Some(self.port))
            .map_err(|()| invalid_host("port cannot be set".to_owned()))?;
        url.set_username(&self.user)
            .map_err(|()| invalid_credentials())?;
        if !self.password.is_empty() {
            url.set_password(Some(self.password.as_str()))
                .map_err(|()| invalid_credentials())?;
        }
        url.set_path(&self.database);

        Ok(Zeroizing::new(url.into()))
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

/// Opens one PostgreSQL connection per request.
#[derive(Clone)]
pub struct DieselConnectionProvider {
    database_url: Zeroizing<String>,
    host: String,
    database: String,
}

impl DieselConnectionProvider {
    /// Create a provider for the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionConfigError`] when the settings cannot form a
    /// connection URL. No connection is attempted here.
    pub fn new(config: &ConnectionConfig) -> Result<Self, ConnectionConfigError> {
        Ok(Self {
            database_url: config.database_url()?,
            host: config.host.clone(),
            database: config.database.clone(),
        })
    }
}

#[async_trait]
impl UserRecordConnectionProvider for DieselConnectionProvider {
    async fn open(&self) -> Result<Box<dyn UserRecordSession>, UserRecordPersistenceError> {
        let conn = AsyncPgConnection::establish(self.database_url.as_str())
            .await
            .map_err(|err| UserRecordPersistenceError::connection(err.to_string()))?;
        debug!(host = %self.host, database = %self.database, "opened database connection");
        Ok(Box::new(DieselUserRecordSession::new(conn)))
    }
}
