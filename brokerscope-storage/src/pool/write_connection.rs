//! Single write connection behind a mutex.
//!
//! Callers run on blocking threads (the engine uses `spawn_blocking`), so a
//! std mutex is used rather than an async one.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use brokerscope_core::errors::ScopeResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u64) -> ScopeResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> ScopeResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, 0)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> ScopeResult<T>
    where
        F: FnOnce(&Connection) -> ScopeResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|_| to_storage_err("write connection mutex poisoned"))?;
        f(&guard)
    }
}
