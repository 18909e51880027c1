use serde::{Deserialize, Serialize};

use crate::transport::TransportError;

/// Discriminant shared by every dispatch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Transport,
    UnknownTool,
}

impl ErrorKind {
    /// Map to the corresponding JSON-RPC 2.0 error code.
    ///
    /// Caller mistakes     → -32602 (Invalid params)
    /// Upstream failures   → -32603 (Internal error)
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::Validation | Self::UnknownTool => -32602,
            Self::NotFound | Self::Transport => -32603,
        }
    }
}

/// Failure while fetching a resource for a tool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// A single-entity fetch came back empty.
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

/// Terminal failure of a `tools/call` invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
    #[error("Invalid arguments for {tool}: {message}")]
    Validation {
        tool: String,
        field: Option<String>,
        message: String,
    },
    #[error("Failed to fetch {resource}: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: FetchError,
    },
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool { .. } => ErrorKind::UnknownTool,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Fetch { source, .. } => source.kind(),
        }
    }

    /// Offending argument, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Upstream HTTP status, for transport failures that got a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch {
                source: FetchError::Transport(err),
                ..
            } => err.status(),
            _ => None,
        }
    }
}

/// Structured error body carried in the JSON-RPC `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl From<&ToolError> for ErrorResponse {
    fn from(err: &ToolError) -> Self {
        Self {
            error: ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
                field: err.field().map(str::to_string),
                status: err.status(),
            },
        }
    }
}
