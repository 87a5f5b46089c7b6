//! Caller resolution and the admin check.
//!
//! Credential parsing failures never abort an invocation. They resolve to
//! [`Caller::Invalid`], which fails every authorization check.

use uniqcode_core::{common_name_from_credential, resolve_user_id};

use crate::config::ChaincodeConfig;
use crate::context::TxContext;
use crate::error::{Result, UniqueCodeError};

/// The resolved submitter of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// A logical user id taken from the certificate common name.
    User(String),
    /// The credential could not be parsed.
    Invalid,
}

impl Caller {
    /// Resolve a credential blob to a caller, logging parse failures.
    pub fn from_credential(credential: &[u8]) -> Self {
        match common_name_from_credential(credential) {
            Ok(common_name) => Caller::User(resolve_user_id(&common_name).to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "could not resolve caller identity");
                Caller::Invalid
            }
        }
    }

    pub fn from_context<C: TxContext + ?Sized>(ctx: &C) -> Self {
        Self::from_credential(ctx.creator())
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Caller::User(id) => Some(id.as_str()),
            Caller::Invalid => None,
        }
    }

    /// Whether this caller is exactly `identity`. Empty ids never match.
    pub fn is(&self, identity: &str) -> bool {
        matches!(self, Caller::User(id) if !id.is_empty() && id == identity)
    }
}

/// Require the invocation to come from the configured administrator.
pub(crate) fn require_admin<C: TxContext + ?Sized>(
    ctx: &C,
    config: &ChaincodeConfig,
) -> Result<Caller> {
    let caller = Caller::from_context(ctx);
    if caller.is(&config.admin_identity) {
        return Ok(caller);
    }

    let shown = caller.user_id().unwrap_or_default().to_string();
    tracing::warn!(caller = %shown, tx_id = ctx.tx_id(), "unauthorized caller rejected");
    Err(UniqueCodeError::Unauthorized(shown))
}
