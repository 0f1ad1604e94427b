//! # Grocer Console
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  operator ◄──► stdin/stdout ◄──► Console ◄──► HTTP ◄──► grocer-server  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing_subscriber::EnvFilter;

use grocer_console::{ui, ConsoleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ConsoleConfig::load()?;
    tracing::debug!(server = %config.server_url, "Configuration loaded");

    ui::run(config).await
}

/// Logs go to stderr so the operator's stdout stays readable.
///
/// Default level is `warn`; set `RUST_LOG=grocer_console=debug` for more.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
