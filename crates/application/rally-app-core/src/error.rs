use rally_core::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidTransition,
    ValidationFailed,
    Collaborator,
}

/// Why a workflow step was rejected. The message is what the client shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{message}")]
    Collaborator { message: String },
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::NotFound(_) => ErrorKind::NotFound,
            WorkflowError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            WorkflowError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            WorkflowError::Collaborator { .. } => ErrorKind::Collaborator,
        }
    }

    /// Wraps a gateway failure, keeping its top-level message verbatim.
    pub fn collaborator(err: &anyhow::Error) -> Self {
        WorkflowError::Collaborator {
            message: err.to_string(),
        }
    }

    pub fn not_found(what: &str) -> Self {
        WorkflowError::NotFound(format!("{what} not found"))
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Lifts a gateway result into the workflow error space.
pub(crate) trait GatewayResultExt<T> {
    fn gateway(self) -> Result<T, WorkflowError>;
}

impl<T> GatewayResultExt<T> for anyhow::Result<T> {
    fn gateway(self) -> Result<T, WorkflowError> {
        self.map_err(|e| {
            tracing::warn!(error = %e, "gateway call failed");
            WorkflowError::collaborator(&e)
        })
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::ValidationFailed(err.to_string())
    }
}
