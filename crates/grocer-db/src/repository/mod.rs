//! # Repository Module
//!
//! Database repository implementations for Grocer POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().register("5012345678900", overrides)            │
//! │       ▼                                                                 │
//! │  ProductRepository      LedgerRepository      CheckoutRepository       │
//! │  ├── register           ├── recent            └── execute              │
//! │  ├── get_by_barcode     ├── by_reference           │                   │
//! │  ├── get_by_id          └── count                  │ one transaction:  │
//! │  ├── list / latest                                 │ products UPDATE + │
//! │  ├── update / remove                               │ ledger INSERT     │
//! │  └── low_stock                                     │                   │
//! │       │                                            │                   │
//! │       ▼                                            ▼                   │
//! │  SQLite Database (products, transactions)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog store
//! - [`LedgerRepository`](ledger::LedgerRepository) - Sold lines, read side
//! - [`CheckoutRepository`](checkout::CheckoutRepository) - Atomic checkout

pub mod checkout;
pub mod ledger;
pub mod product;
