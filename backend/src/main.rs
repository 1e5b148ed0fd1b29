//! Roster entry-point: loads settings, wires the database adapter into the
//! user record service and serves the REST endpoints.

mod server;

use std::sync::Arc;

use ortho_config::OrthoConfig as _;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use roster::domain::UserRecordService;
use roster::outbound::persistence::DieselConnectionProvider;
use roster::settings::RosterSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RosterSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address: {e}"),
        )
    })?;

    let connection_config = settings.connection_config();
    let connections = DieselConnectionProvider::new(&connection_config).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let user_records = Arc::new(UserRecordService::new(Arc::new(connections)));

    create_server(ServerConfig::new(bind_addr, user_records))?.await
}
