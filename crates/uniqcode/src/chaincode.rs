//! Method dispatch: the surface the host ledger invokes.
//!
//! Business failures come back as `Ok(Response { success: false, .. })`.
//! Only ledger failures and unknown methods are returned as `Err`, which a
//! host treats as a rejected unit of work.

use std::fmt;
use std::str::FromStr;

use uniqcode_core::BatchId;
use uniqcode_ledger::Ledger;

use crate::config::ChaincodeConfig;
use crate::context::TxContext;
use crate::error::{Result, UniqueCodeError};
use crate::response::Response;
use crate::service::CodeService;

/// The invocable methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    IssueBatch,
    ListBatchCodes,
    VerifyCode,
    PeekNextBatchId,
    SetLastBatchId,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::IssueBatch,
        Method::ListBatchCodes,
        Method::VerifyCode,
        Method::PeekNextBatchId,
        Method::SetLastBatchId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Method::IssueBatch => "issueBatch",
            Method::ListBatchCodes => "listBatchCodes",
            Method::VerifyCode => "verifyCode",
            Method::PeekNextBatchId => "peekNextBatchId",
            Method::SetLastBatchId => "setLastBatchId",
        }
    }

    /// Name used by the first deployed version of the contract.
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Method::IssueBatch => "createCode",
            Method::ListBatchCodes => "listCode",
            Method::VerifyCode => "checkCode",
            Method::PeekNextBatchId => "getNextCodeId",
            Method::SetLastBatchId => "setLastCodeId",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = UniqueCodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s || m.legacy_name() == s)
            .ok_or_else(|| UniqueCodeError::UnknownMethod(s.to_string()))
    }
}

/// Host-facing entry point wrapping a [`CodeService`].
pub struct Chaincode<L: Ledger> {
    service: CodeService<L>,
}

impl<L: Ledger> Chaincode<L> {
    pub fn new(ledger: L, config: ChaincodeConfig) -> Self {
        Self {
            service: CodeService::new(ledger, config),
        }
    }

    pub fn from_service(service: CodeService<L>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &CodeService<L> {
        &self.service
    }

    /// Invoke a method by name with string arguments.
    pub async fn invoke<C, S>(&self, ctx: &C, method: &str, args: &[S]) -> Result<Response>
    where
        C: TxContext + ?Sized,
        S: AsRef<str>,
    {
        let method: Method = method.parse()?;

        match self.dispatch(ctx, method, args).await {
            Ok(response) => Ok(response),
            Err(e) if e.is_business() => {
                tracing::debug!(%method, error = %e, "invocation rejected");
                Ok(Response::from_error(&e))
            }
            Err(e) => {
                tracing::error!(%method, tx_id = ctx.tx_id(), error = %e, "invocation failed");
                Err(e)
            }
        }
    }

    async fn dispatch<C, S>(&self, ctx: &C, method: Method, args: &[S]) -> Result<Response>
    where
        C: TxContext + ?Sized,
        S: AsRef<str>,
    {
        match method {
            Method::IssueBatch => {
                let timestamp = arg(args, 0, "timestamp")?;
                let id = self.service.issue_batch(ctx, timestamp).await?;
                Ok(Response::ok(format!("batch {} created", id)))
            }
            Method::ListBatchCodes => {
                let id = batch_id_arg(args, 0)?;
                let codes = self.service.list_batch_codes(ctx, id).await?;
                Ok(Response::code_list(&codes))
            }
            Method::VerifyCode => {
                let code = arg(args, 0, "code")?;
                if self.service.verify_code(code).await? {
                    Ok(Response::ok("code verified"))
                } else {
                    Ok(Response::failure("code verification failed"))
                }
            }
            Method::PeekNextBatchId => {
                let id = self.service.peek_next_batch_id().await?;
                Ok(Response::next_batch_id(id))
            }
            Method::SetLastBatchId => {
                let id = batch_id_arg(args, 0)?;
                self.service.set_last_batch_id(id).await?;
                Ok(Response::ok(format!("last batch id set to {}", id)))
            }
        }
    }
}

fn arg<'a, S: AsRef<str>>(args: &'a [S], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(|s| s.as_ref())
        .ok_or_else(|| UniqueCodeError::InvalidArgument(format!("missing {}", name)))
}

fn batch_id_arg<S: AsRef<str>>(args: &[S], index: usize) -> Result<BatchId> {
    let raw = arg(args, index, "batch id")?;
    raw.parse()
        .map_err(|_| UniqueCodeError::InvalidArgument(format!("{:?} is not a batch id", raw)))
}
