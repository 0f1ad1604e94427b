//! # Grocer Console
//!
//! Terminal operator console for the Grocer point-of-sale.
//!
//! ## Module Structure
//! ```text
//! grocer_console/
//! ├── config.rs     - Environment configuration
//! ├── error.rs      - ClientError (Transient / Rejected)
//! ├── client.rs     - ApiClient over the HTTP service
//! ├── poller.rs     - Background latest-product poller
//! ├── state/        - Cart and the Idle / PendingNewProduct machine
//! ├── command.rs    - Operator command parsing
//! ├── display.rs    - Terminal tables
//! ├── receipt.rs    - Receipt PNG and terminal QR
//! └── ui.rs         - select! loop tying it together
//! ```
//!
//! The console never opens the database. Everything it knows about the
//! store comes through [`client::ApiClient`].

pub mod client;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod poller;
pub mod receipt;
pub mod state;
pub mod ui;

pub use client::ApiClient;
pub use config::{ConfigError, ConsoleConfig};
pub use error::{ClientError, ClientResult};
pub use poller::{PollEvent, Poller, PollerControl};
pub use state::{Cart, ConsoleState};
