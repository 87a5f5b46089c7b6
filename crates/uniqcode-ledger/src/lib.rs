//! # Uniqcode Ledger
//!
//! Ledger adapter for unique-code batches. Provides a trait-based interface
//! over two key-value namespaces with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The host ledger exposes *public state*, readable by every participant,
//! and *private data* collections, readable only by an authorized subset.
//! The [`Ledger`] trait models them as two separate namespaces rather than
//! one store with visibility flags.
//!
//! ## Key Types
//!
//! - [`Ledger`] - The async trait for all ledger operations
//! - [`WriteSet`] - An ordered group of writes committed together
//! - [`SqliteLedger`] - SQLite-based persistent ledger
//! - [`MemoryLedger`] - In-memory ledger for tests and embedding
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use uniqcode_ledger::{Ledger, SqliteLedger, WriteSet};
//!
//! async fn example() {
//!     let ledger = SqliteLedger::open("ledger.db").unwrap();
//!
//!     let mut writes = WriteSet::new();
//!     writes.put_private("SECRETS", "0", Bytes::from_static(b"s3cr3t"));
//!     writes.put_state("0", Bytes::from_static(b"0000000001-0000010000"));
//!     ledger.commit(writes).await.unwrap();
//!
//!     let range = ledger.get_state("0").await.unwrap();
//!     assert!(range.is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Separate namespaces**: a key in public state never shadows a key in a
//!   private collection, and there is no read path from one to the other.
//! - **Ordered commits**: a [`WriteSet`] is applied in insertion order. Both
//!   bundled backends apply it all-or-nothing, and check create-only keys
//!   inside the same lock or transaction that applies the writes.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use traits::{commit_in_order, Ledger, Write, WriteSet};
