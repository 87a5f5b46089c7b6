//! # Uniqcode Testkit
//!
//! Testing utilities for uniqcode.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: PEM certificates wrapped as host credentials, for admin,
//!   ordinary and malformed callers
//! - **Golden vectors**: Known secrets and codes for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fault injection**: [`FaultyLedger`], a ledger wrapper that fails chosen
//!   reads or writes
//!
//! ## Golden Vectors
//!
//! ```rust
//! use uniqcode_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! assert!(verify_all_vectors().is_ok());
//! for vector in all_vectors() {
//!     println!("{}: {}", vector.name, vector.secret);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use uniqcode_testkit::generators::{ordinal, SecretParams};
//!
//! proptest! {
//!     #[test]
//!     fn codes_are_deterministic(params: SecretParams, n in ordinal()) {
//!         let secret = params.secret();
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use uniqcode_ledger::MemoryLedger;
//! use uniqcode_testkit::FaultyLedger;
//!
//! let ledger = FaultyLedger::new(MemoryLedger::new()).fail_writes_to("LAST_CODE_ID");
//! ```

pub mod faulty;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use faulty::FaultyLedger;
pub use fixtures::{
    admin_credential, credential, prefixed_admin_credential, random_tx_id, user_credential,
    ADMIN_ID, SCENARIO_TIMESTAMP,
};
pub use generators::SecretParams;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
