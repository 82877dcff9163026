//! Persistence and synchronization core for a Gantt scheduling backend.
//!
//! Stores four collections (tasks, dependencies, resources, assignments)
//! in SQLite and reconciles the change sets a Gantt chart frontend sends
//! through its crud manager protocol: batched added/updated/removed lists
//! per collection, server-assigned ids and `$PhantomId` correlation for
//! new rows. The HTTP surface lives in the server crate; everything here
//! is transport-agnostic.

use std::path::Path;

use sea_orm::DatabaseConnection;
use serde_json::Value;

pub mod database;
pub mod dates;
pub mod protocol;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use database::Database;
pub use protocol::{LoadResponse, SyncRequest, SyncResponse};
pub use snapshot::ProjectSnapshot;
pub use sync::{SyncEngine, SyncError, SyncResult};

/// Database file name inside the data directory.
pub const DB_FILE: &str = "gantt.db";

/// Owns the database handle and the reconciliation engine. One instance
/// serves the whole process; handlers share it behind an `Arc`.
pub struct Core {
    db: Database,
    engine: SyncEngine,
}

impl Core {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            engine: SyncEngine::new(),
        }
    }

    /// Opens the database under `data_dir`, creating file and directory on
    /// first run, and brings the schema up to date.
    pub async fn open(data_dir: &Path) -> SyncResult<Self> {
        let db = Database::create(&data_dir.join(DB_FILE)).await?;
        db.migrate().await?;
        Ok(Self::new(db))
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.db.conn()
    }

    /// Reads the full store in one consistent pass.
    pub async fn snapshot(&self) -> SyncResult<ProjectSnapshot> {
        Ok(snapshot::load(self.db.conn()).await?)
    }

    /// Decodes a raw sync payload and applies it. Decoding failures reject
    /// the call before any row changes.
    pub async fn apply_sync(&self, payload: Value) -> SyncResult<SyncResponse> {
        let request = SyncRequest::from_value(payload)?;
        self.apply_changes(request).await
    }

    /// Applies an already-decoded sync request.
    pub async fn apply_changes(&self, request: SyncRequest) -> SyncResult<SyncResponse> {
        self.engine.apply(self.db.conn(), request).await
    }

    /// Replaces the store contents with the bundled demo project.
    pub async fn seed_demo(&self) -> SyncResult<()> {
        Ok(seed::seed_demo_project(self.db.conn()).await?)
    }
}
