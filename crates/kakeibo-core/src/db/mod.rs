//! Database access layer with connection pooling
//!
//! The ledger lives in a single SQLite file with one `transactions` table.
//! The generator rebuilds it wholesale; everything else opens it read-only in
//! practice.
//!
//! - `transactions` - bulk insert and full-ledger loading

use std::path::{Path, PathBuf};
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info};

use crate::error::{Error, Result};

mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for the optional database encryption passphrase
pub const DB_KEY_ENV: &str = "KAKEIBO_DB_KEY";

/// Default database file name
pub const DEFAULT_DB_PATH: &str = "db.sqlite3";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this would invalidate every existing encrypted database
    const APP_SALT: &[u8; 16] = b"kakeibo-salt-v01";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Remove a database file together with its SQLite sidecar files
fn remove_database_files(path: &Path) -> Result<()> {
    let mut candidates = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm", "-journal"] {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(suffix);
        candidates.push(PathBuf::from(sidecar));
    }

    for candidate in candidates {
        match std::fs::remove_file(&candidate) {
            Ok(()) => debug!(path = %candidate.display(), "Removed old database file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: PathBuf,
    /// Backing temp file for throwaway databases (deleted when the last clone drops)
    _temp: Option<Arc<tempfile::TempPath>>,
}

impl Database {
    /// Open an existing ledger database
    ///
    /// Fails with `Error::NotFound` if the file does not exist; no schema is
    /// created here, so a store that was never seeded stays an error.
    pub fn open(path: impl AsRef<Path>, passphrase: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "ledger database {} (run `kakeibo seed` first)",
                path.display()
            )));
        }
        Self::connect(path, passphrase)
    }

    /// Create a fresh ledger database, discarding any existing file at `path`
    pub fn create(path: impl AsRef<Path>, passphrase: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        remove_database_files(path)?;
        let db = Self::connect(path, passphrase)?;
        db.reset_schema()?;
        info!(path = %path.display(), encrypted = passphrase.is_some(), "Created ledger database");
        Ok(db)
    }

    /// Read the optional passphrase from `KAKEIBO_DB_KEY`
    pub fn passphrase_from_env() -> Option<String> {
        std::env::var(DB_KEY_ENV).ok().filter(|s| !s.is_empty())
    }

    fn connect(path: &Path, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = if let Some(pass) = passphrase {
            let key = derive_key(pass)?;
            let key_pragma = format!("PRAGMA key = 'x\"{}\"';", key);

            // Every pooled connection needs the key before its first query
            let manager = manager.with_init(move |conn| {
                conn.execute_batch(&key_pragma)?;
                Ok(())
            });

            Pool::builder().max_size(4).build(manager)?
        } else {
            Pool::builder().max_size(4).build(manager)?
        };

        Ok(Self {
            pool,
            db_path: path.to_path_buf(),
            _temp: None,
        })
    }

    /// Create a throwaway database (for tests and demos)
    ///
    /// Backed by a temporary file rather than `:memory:` because every pooled
    /// connection must see the same data.
    pub fn in_memory() -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix("kakeibo_test_")
            .suffix(".db")
            .tempfile()?
            .into_temp_path();

        let mut db = Self::connect(&temp, None)?;
        db.reset_schema()?;
        db._temp = Some(Arc::new(temp));
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Drop and recreate the ledger schema
    pub fn reset_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA synchronous = NORMAL;

            DROP TABLE IF EXISTS transactions;

            -- `type` holds the category label (salary, food, ...)
            CREATE TABLE transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                description TEXT
            );
            "#,
        )?;

        Ok(())
    }
}
