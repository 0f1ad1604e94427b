//! # grocer-db: Database Layer for Grocer POS
//!
//! SQLite storage for the catalog and the ledger, plus the checkout engine
//! that mutates both in one transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Grocer POS Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/transaction)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     grocer-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ Product        │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Ledger         │    │ 001_initial  │  │   │
//! │  │   │ Write gate    │    │ Checkout       │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir)/grocer.db                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grocer_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./grocer.db")).await?;
//! let products = db.products().list().await?;
//! let summary = db.checkout().execute(&items).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::checkout::CheckoutRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::product::ProductRepository;
