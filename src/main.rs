//! eawatch - a terminal client for server-side EA trading signals.

use anyhow::Context;
use eawatch::api::ApiClientBuilder;
use eawatch::session::FileCredentialStore;
use eawatch::{App, Config, Session};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The terminal belongs to the UI, so logs go to a daily file.
    let log_dir = eawatch::config::log_dir().context("locating log directory")?;
    let appender = tracing_appender::rolling::daily(log_dir, "eawatch.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eawatch=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    let config = Config::load_or_default().context("loading configuration")?;

    let credentials = match &config.api.session_path {
        Some(path) => FileCredentialStore::new(path.clone()),
        None => FileCredentialStore::in_data_dir().context("locating session file")?,
    };
    tracing::info!(path = %credentials.path().display(), "using session file");
    let session = Session::new(Arc::new(credentials));

    let backend = ApiClientBuilder::new()
        .config(config.api.clone())
        .build()
        .context("building API client")?;

    let mut app = App::new(config, Arc::new(backend), session).context("starting terminal")?;
    app.run().await?;

    Ok(())
}
