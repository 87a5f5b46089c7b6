//! The structured response envelope returned by every method.

use serde::{Deserialize, Serialize};
use uniqcode_core::{BatchId, UniqueCode};

use crate::error::UniqueCodeError;

/// `{"success": bool, "msg": string, "data"?: object}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

/// Method-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    CodeList { code_list: Vec<String> },
    NextBatchId { next_code_id: String },
}

impl Response {
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn code_list(codes: &[UniqueCode]) -> Self {
        Self {
            data: Some(ResponseData::CodeList {
                code_list: codes.iter().map(ToString::to_string).collect(),
            }),
            ..Self::ok("code list retrieved")
        }
    }

    pub fn next_batch_id(id: BatchId) -> Self {
        Self {
            data: Some(ResponseData::NextBatchId {
                next_code_id: id.key(),
            }),
            ..Self::ok("next batch id retrieved")
        }
    }

    /// Business failure envelope for an error.
    pub fn from_error(err: &UniqueCodeError) -> Self {
        Self::failure(err.to_string())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
