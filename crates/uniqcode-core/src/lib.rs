//! # Uniqcode Core
//!
//! Pure primitives for unique-code batches: digest derivation, the code
//! format, strong identifier types, and caller identity parsing.
//!
//! This crate contains no I/O, no storage, no logging. Everything here is a
//! deterministic function of its inputs.
//!
//! ## Key Types
//!
//! - [`BatchId`] - Sequential batch identifier, also the ledger key form
//! - [`OrdinalRange`] - The 10,000 ordinals a batch owns
//! - [`OrderCode`] - A 10-digit zero-padded ordinal
//! - [`UniqueCode`] - A 16-character code: order code plus check suffix
//! - [`BatchSecret`] - The confidential per-batch digest (redacted `Debug`)
//!
//! ## Code Derivation
//!
//! ```rust
//! use uniqcode_core::{BatchSecret, OrderCode, UniqueCode};
//!
//! let secret = BatchSecret::derive("1576458896541", "tx1");
//! let order = OrderCode::new(1).unwrap();
//! let code = UniqueCode::issue(&order, &secret);
//! assert_eq!(code.as_str(), "0000000001532478");
//! ```

pub mod code;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod types;

pub use code::{
    build_code, check_suffix, format_ordinal, parse_batch_id, OrderCode, UniqueCode,
    CODE_LEN, MAX_ORDINAL, ORDINAL_WIDTH, SUFFIX_LEN,
};
pub use crypto::{digest, BatchSecret, Md5Hash};
pub use error::{FormatError, IdentityError};
pub use identity::{common_name_from_credential, resolve_user_id};
pub use types::{BatchId, OrdinalRange, BATCH_CAPACITY};
