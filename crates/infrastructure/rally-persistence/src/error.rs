/// Failures of the rally store. Record-level variants carry the message the
/// workflows forward to the user unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{entity} {id} already exists")]
    AlreadyExists { entity: &'static str, id: String },
    #[error("{0}")]
    Forbidden(String),

    #[error("rally.redb schema is invalid or corrupt")]
    Corrupt,
    #[error("rally.redb schema {found} is newer than supported {supported}")]
    NewerSchema { found: u32, supported: u32 },
    #[error("rally.redb is already open by another process")]
    DatabaseAlreadyOpen,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("redb: {0}")]
    Backend(Box<redb::Error>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    Conflict,
    Forbidden,
    Corrupt,
    NewerSchema,
    Busy,
    Io,
    Codec,
    Backend,
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::NotFound { .. } => StorageErrorKind::NotFound,
            StorageError::AlreadyExists { .. } => StorageErrorKind::Conflict,
            StorageError::Forbidden(_) => StorageErrorKind::Forbidden,
            StorageError::Corrupt => StorageErrorKind::Corrupt,
            StorageError::NewerSchema { .. } => StorageErrorKind::NewerSchema,
            StorageError::DatabaseAlreadyOpen => StorageErrorKind::Busy,
            StorageError::Io(_) => StorageErrorKind::Io,
            StorageError::Codec(_) => StorageErrorKind::Codec,
            StorageError::Backend(_) => StorageErrorKind::Backend,
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        StorageError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(entity: &'static str, id: &str) -> Self {
        StorageError::AlreadyExists {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        match err {
            redb::Error::DatabaseAlreadyOpen => StorageError::DatabaseAlreadyOpen,
            other => StorageError::Backend(Box::new(other)),
        }
    }
}

/// Every specific redb error widens into `redb::Error` first.
macro_rules! from_redb {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for StorageError {
                fn from(err: $source) -> Self {
                    redb::Error::from(err).into()
                }
            }
        )*
    };
}

from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
