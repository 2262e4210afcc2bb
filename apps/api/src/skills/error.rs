//! Error kinds shared by every oracle-backed skill stage.

use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Failure of a single oracle-backed stage. Callers recover at the stage boundary.
#[derive(Debug, Error)]
pub enum SkillError {
    /// Transport, auth or provider failure while calling the oracle.
    #[error("oracle call failed: {0}")]
    OracleCall(String),

    /// The oracle answered, but not with the JSON shape the stage declared.
    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OracleCall,
    MalformedResponse,
}

impl SkillError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkillError::OracleCall(_) => ErrorKind::OracleCall,
            SkillError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SkillError::MalformedResponse(msg.into())
    }
}

impl From<LlmError> for SkillError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => SkillError::MalformedResponse(format!("response is not valid JSON: {e}")),
            LlmError::EmptyContent => SkillError::MalformedResponse("response was empty".to_string()),
            other => SkillError::OracleCall(other.to_string()),
        }
    }
}
