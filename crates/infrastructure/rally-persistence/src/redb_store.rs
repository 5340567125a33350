use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};

use crate::api::{Backend, DbState, Mutation, Table, CURRENT_SCHEMA};
use crate::maintenance::quarantine_corrupt_file;
use crate::repository::RallyStore;
use crate::StorageError;

const META: TableDefinition<&str, &str> = TableDefinition::new("meta");

const META_FORMAT_KEY: &str = "format";
const META_FORMAT_VALUE: &str = "rally-redb";
const META_SCHEMA_VERSION: &str = "schema_version";
const META_CREATED_AT: &str = "created_at";

fn definition(table: Table) -> TableDefinition<'static, &'static str, &'static [u8]> {
    TableDefinition::new(table.name())
}

/// One `rally.redb` file. Each backend call runs in its own transaction.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
    path: Utf8PathBuf,
}

impl std::fmt::Debug for RedbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbBackend").field("path", &self.path).finish()
    }
}

impl RedbBackend {
    fn is_corrupt_open_error(err: &redb::DatabaseError) -> bool {
        match err {
            redb::DatabaseError::Storage(storage) => match storage {
                redb::StorageError::Corrupted(_) => true,
                redb::StorageError::Io(ioe) => matches!(
                    ioe.kind(),
                    std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof
                ),
                _ => false,
            },
            _ => false,
        }
    }

    /// redb refuses a second handle on the same file, so handles are shared
    /// per path within the process.
    fn db_cache() -> MutexGuard<'static, HashMap<Utf8PathBuf, Arc<Database>>> {
        static CACHE: OnceLock<Mutex<HashMap<Utf8PathBuf, Arc<Database>>>> = OnceLock::new();
        CACHE
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path_for_root(root: &Utf8Path) -> Utf8PathBuf {
        root.join(rally_config::DATA_FILE_NAME)
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn open_or_create(root: &Utf8Path) -> Result<Self, StorageError> {
        let path = Self::path_for_root(root);
        std::fs::create_dir_all(root)?;

        let mut cache = Self::db_cache();
        if let Some(existing) = cache.get(&path) {
            if path.exists() {
                return Ok(Self {
                    db: existing.clone(),
                    path,
                });
            }
            cache.remove(&path);
        }

        let db = if path.exists() {
            match Database::open(path.as_std_path()) {
                Ok(db) => db,
                Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                    return Err(StorageError::DatabaseAlreadyOpen);
                }
                Err(e) if Self::is_corrupt_open_error(&e) => {
                    let _ = quarantine_corrupt_file(&path);
                    return Err(StorageError::Corrupt);
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            tracing::info!(path = %path, "creating rally store");
            Database::create(path.as_std_path())?
        };

        if let Err(e) = Self::ensure_schema(&db) {
            drop(db);
            if matches!(e, StorageError::Corrupt) {
                let _ = quarantine_corrupt_file(&path);
            }
            return Err(e);
        }
        let db = Arc::new(db);
        cache.insert(path.clone(), db.clone());
        Ok(Self { db, path })
    }

    fn ensure_schema(db: &Database) -> Result<(), StorageError> {
        let write_tx = db.begin_write()?;
        {
            let mut meta = write_tx.open_table(META)?;
            let format: Option<String> = meta.get(META_FORMAT_KEY)?.map(|g| g.value().to_string());
            match format.as_deref() {
                None => {
                    let schema_version = CURRENT_SCHEMA.to_string();
                    let created_at = Utc::now().to_rfc3339();
                    meta.insert(META_FORMAT_KEY, META_FORMAT_VALUE)?;
                    meta.insert(META_SCHEMA_VERSION, schema_version.as_str())?;
                    meta.insert(META_CREATED_AT, created_at.as_str())?;
                }
                Some(META_FORMAT_VALUE) => {}
                Some(_) => return Err(StorageError::Corrupt),
            }
        }
        for table in Table::ALL {
            write_tx.open_table(definition(table))?;
        }
        write_tx.commit()?;

        let read_tx = db.begin_read()?;
        let meta = read_tx.open_table(META)?;
        let schema_version = meta
            .get(META_SCHEMA_VERSION)?
            .and_then(|g| g.value().parse::<u32>().ok())
            .unwrap_or(0);
        if schema_version == 0 {
            return Err(StorageError::Corrupt);
        }
        if schema_version > CURRENT_SCHEMA {
            return Err(StorageError::NewerSchema {
                found: schema_version,
                supported: CURRENT_SCHEMA,
            });
        }
        if schema_version != CURRENT_SCHEMA {
            return Err(StorageError::Corrupt);
        }
        Ok(())
    }

    /// Classifies the file under `root` without creating it. A corrupt file is
    /// quarantined as a side effect.
    pub fn validate(root: &Utf8Path) -> Result<DbState, StorageError> {
        let path = Self::path_for_root(root);
        if !path.exists() {
            return Ok(DbState::Missing);
        }
        if Self::db_cache().contains_key(&path) {
            return Ok(DbState::Valid);
        }

        match Database::open(path.as_std_path()) {
            Ok(db) => match Self::ensure_schema(&db) {
                Ok(()) => Ok(DbState::Valid),
                Err(StorageError::NewerSchema { found, supported }) => {
                    Ok(DbState::NewerSchema { found, supported })
                }
                Err(StorageError::Corrupt) => {
                    drop(db);
                    let _ = quarantine_corrupt_file(&path);
                    Ok(DbState::Corrupt)
                }
                Err(e) => Err(e),
            },
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => Ok(DbState::Busy),
            Err(e) if Self::is_corrupt_open_error(&e) => {
                let _ = quarantine_corrupt_file(&path);
                Ok(DbState::Corrupt)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Backend for RedbBackend {
    fn get(&self, table: Table, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let read_tx = self.db.begin_read()?;
        let rows = read_tx.open_table(definition(table))?;
        let value = rows.get(key)?.map(|g| g.value().to_vec());
        Ok(value)
    }

    fn scan(&self, table: Table) -> Result<Vec<Vec<u8>>, StorageError> {
        let read_tx = self.db.begin_read()?;
        let rows = read_tx.open_table(definition(table))?;
        let mut values = Vec::new();
        for row in rows.iter()? {
            let (_, value) = row?;
            values.push(value.value().to_vec());
        }
        Ok(values)
    }

    fn mutate(&self, table: Table, key: &str, mutation: Mutation<'_>) -> Result<(), StorageError> {
        let write_tx = self.db.begin_write()?;
        let outcome = {
            let mut rows = write_tx.open_table(definition(table))?;
            let current = rows.get(key)?.map(|g| g.value().to_vec());
            match mutation(current.as_deref()) {
                Ok(Some(bytes)) => {
                    rows.insert(key, bytes.as_slice())?;
                    Ok(())
                }
                Ok(None) => {
                    rows.remove(key)?;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };
        match outcome {
            Ok(()) => {
                write_tx.commit()?;
                Ok(())
            }
            Err(e) => {
                let _ = write_tx.abort();
                Err(e)
            }
        }
    }
}

pub type RedbStore = RallyStore<RedbBackend>;

impl RedbStore {
    /// Opens `rally.redb` under `root`, creating the directory and file on
    /// first use.
    pub fn open(root: &Utf8Path) -> Result<Self, StorageError> {
        Ok(Self::with_backend(RedbBackend::open_or_create(root)?))
    }

    pub fn validate(root: &Utf8Path) -> Result<DbState, StorageError> {
        RedbBackend::validate(root)
    }

    pub fn path(&self) -> &Utf8Path {
        self.backend().path()
    }
}
