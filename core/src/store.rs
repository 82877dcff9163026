//! Record store contract shared by the four entity collections.

use std::fmt;

use async_trait::async_trait;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, Value};
use tokio::sync::{Mutex, MutexGuard};

/// The four persisted collections. Each one is an independent namespace for
/// identifier allocation, so a Task id and a Resource id may coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Tasks,
    Dependencies,
    Resources,
    Assignments,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Tasks => write!(f, "tasks"),
            Collection::Dependencies => write!(f, "dependencies"),
            Collection::Resources => write!(f, "resources"),
            Collection::Assignments => write!(f, "assignments"),
        }
    }
}

/// Persistence operations every synchronized collection supports.
///
/// Implemented by each entity on its `Entity` type; the reconciliation
/// engine only ever talks to collections through this trait, so the engine
/// logic stays identical across the four tables. Implementors are the unit
/// entity structs, hence the `Send` supertrait the boxed futures need.
#[async_trait]
pub trait SyncTable: Send {
    /// Which namespace this table allocates ids in.
    const COLLECTION: Collection;

    /// New-record draft as decoded from a sync payload.
    type Draft: Send;
    /// Sparse update as decoded from a sync payload.
    type Patch: Send;
    /// Stored row shape returned to clients.
    type Record: Send + Sync;

    /// All rows, ordered by id ascending.
    async fn find_all(db: &DatabaseConnection) -> Result<Vec<Self::Record>, DbErr>;

    /// Current maximum id, 0 when the table is empty.
    async fn max_id(db: &DatabaseConnection) -> Result<i32, DbErr>;

    /// Next free id. Callers must hold the collection's allocation lock
    /// across this call and the following insert (see [`IdAllocator`]).
    async fn next_id(db: &DatabaseConnection) -> Result<i32, DbErr> {
        Ok(Self::max_id(db).await? + 1)
    }

    /// Persists a draft under a freshly allocated id, returning the stored
    /// row.
    async fn insert(
        db: &DatabaseConnection,
        id: i32,
        draft: Self::Draft,
    ) -> Result<Self::Record, DbErr>;

    /// Merges a sparse patch into the row it targets. A patch aimed at an
    /// id that does not exist is a no-op.
    async fn apply_patch(db: &DatabaseConnection, patch: Self::Patch) -> Result<(), DbErr>;

    /// Deletes the given ids, ignoring unknown ones. Returns how many rows
    /// actually went away.
    async fn remove(db: &DatabaseConnection, ids: &[i32]) -> Result<u64, DbErr>;

    /// Durable id of a stored row.
    fn record_id(record: &Self::Record) -> i32;

    /// Temporary identifier carried by a draft, if the client sent one.
    fn phantom_of(draft: &Self::Draft) -> Option<&str>;
}

/// Serializes the allocate-and-insert section per collection.
///
/// `next_id` reads the current maximum and adds one; two batches doing that
/// concurrently for the same collection would both observe the same maximum
/// and collide. Holding the collection's lock from the first `next_id` until
/// the last insert of a batch keeps every allocated id visible to the next
/// allocation.
#[derive(Debug, Default)]
pub struct IdAllocator {
    locks: [Mutex<()>; 4],
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the allocation lock for one collection.
    pub async fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        self.locks[collection as usize].lock().await
    }
}

/// Maps a decoded patch field onto an active value: a present field becomes
/// `Set`, an absent one stays `NotSet` and leaves the column untouched.
pub fn patch_field<T>(field: Option<T>) -> ActiveValue<T>
where
    T: Into<Value>,
{
    match field {
        Some(value) => ActiveValue::Set(value),
        None => ActiveValue::NotSet,
    }
}
