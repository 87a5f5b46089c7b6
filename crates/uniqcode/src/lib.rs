//! # Uniqcode
//!
//! Issue and verify batches of tamper-resistant unique codes on top of a
//! shared key-value ledger with a confidential partition for secrets.
//!
//! ## Overview
//!
//! - **Issuance**: an administrator allocates the next batch. The batch
//!   secret goes to a private collection; the public ordinal range goes to
//!   public state and marks the batch as existing.
//! - **Listing**: an administrator regenerates all 10,000 codes of a batch.
//!   Codes are never stored; they are a pure function of ordinal and secret.
//! - **Verification**: anyone checks whether a code matches the batch its
//!   ordinal falls in, without learning the secret.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use uniqcode::{Chaincode, ChaincodeConfig, Invocation};
//! use uniqcode::ledger::MemoryLedger;
//!
//! async fn example(admin_credential: Vec<u8>) {
//!     let chaincode = Chaincode::new(MemoryLedger::new(), ChaincodeConfig::default());
//!     let ctx = Invocation::new(admin_credential, "tx-0001");
//!
//!     let now = ctx.now_millis.to_string();
//!     let created = chaincode.invoke(&ctx, "issueBatch", &[now.as_str()]).await.unwrap();
//!     assert!(created.success);
//!
//!     let listed = chaincode.invoke(&ctx, "listBatchCodes", &["0"]).await.unwrap();
//!     println!("{}", listed.to_json().unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `uniqcode::core` - Code format, digest, identity parsing
//! - `uniqcode::ledger` - Ledger trait and backends

pub mod allocator;
pub mod auth;
pub mod chaincode;
pub mod config;
pub mod context;
pub mod error;
mod issuance;
mod listing;
pub mod response;
pub mod service;
mod verification;

// Re-export component crates
pub use uniqcode_core as core;
pub use uniqcode_ledger as ledger;

pub use allocator::{BatchAllocator, LAST_BATCH_ID_KEY};
pub use auth::Caller;
pub use chaincode::{Chaincode, Method};
pub use config::ChaincodeConfig;
pub use context::{Invocation, TxContext};
pub use error::{Result, UniqueCodeError};
pub use response::{Response, ResponseData};
pub use service::CodeService;

pub use uniqcode_core::{BatchId, BatchSecret, OrderCode, OrdinalRange, UniqueCode};
