//! Reconciliation engine for sync payloads.
//!
//! Applies one decoded [`SyncRequest`] against the store, collection by
//! collection in a fixed order (tasks, dependencies, resources,
//! assignments), and within each collection removals first, then updates,
//! then inserts. Inserts take ids from the per-collection allocator while
//! its lock is held, so concurrent requests cannot interleave inside a
//! collection's id sequence.

use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;
use tracing::debug;

use crate::database::entities::{Assignment, Dependency, Resource, Task};
use crate::protocol::{PhantomIdMapping, Rows, SyncRequest, SyncResponse, TableChanges};
use crate::store::{IdAllocator, SyncTable};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("malformed sync payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Default)]
pub struct SyncEngine {
    allocator: IdAllocator,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every change set in the request and builds the response.
    ///
    /// Changes are applied as they are reached. A failure partway through
    /// leaves earlier collections committed; there is no rollback across
    /// the request.
    pub async fn apply(
        &self,
        db: &DatabaseConnection,
        request: SyncRequest,
    ) -> SyncResult<SyncResponse> {
        let mut response = SyncResponse::ok(request.request_id);

        if let Some(changes) = request.tasks {
            response.tasks = self.apply_table::<Task>(db, changes).await?.map(Rows::from);
        }
        if let Some(changes) = request.dependencies {
            response.dependencies = self
                .apply_table::<Dependency>(db, changes)
                .await?
                .map(Rows::from);
        }
        if let Some(changes) = request.resources {
            response.resources = self
                .apply_table::<Resource>(db, changes)
                .await?
                .map(Rows::from);
        }
        if let Some(changes) = request.assignments {
            response.assignments = self
                .apply_table::<Assignment>(db, changes)
                .await?
                .map(Rows::from);
        }

        Ok(response)
    }

    /// Runs one collection's removed, updated and added phases, in that
    /// order. Returns mapping rows only when the request carried an `added`
    /// list; an empty list still yields an empty mapping block.
    async fn apply_table<T: SyncTable>(
        &self,
        db: &DatabaseConnection,
        changes: TableChanges<T::Draft, T::Patch>,
    ) -> SyncResult<Option<Vec<PhantomIdMapping>>> {
        // Captured before the removed phase runs: ids handed out below must
        // stay strictly above the collection's pre-call maximum even when
        // this call's own removals free the top of the range.
        let floor = if changes.added.is_some() {
            T::max_id(db).await?
        } else {
            0
        };

        if let Some(removed) = changes.removed {
            let ids: Vec<i32> = removed.into_iter().map(|r| r.id()).collect();
            if !ids.is_empty() {
                // Ids with no matching row are skipped without complaint.
                let dropped = T::remove(db, &ids).await?;
                debug!(
                    "Removed {} of {} requested {} rows",
                    dropped,
                    ids.len(),
                    T::COLLECTION
                );
            }
        }

        if let Some(updated) = changes.updated {
            for patch in updated {
                // An id that matches nothing updates nothing.
                T::apply_patch(db, patch).await?;
            }
        }

        let Some(added) = changes.added else {
            return Ok(None);
        };

        // Hold the collection's allocation lock across the whole added
        // phase so ids come out dense and in input order.
        let _guard = self.allocator.lock(T::COLLECTION).await;
        let mut mappings = Vec::with_capacity(added.len());
        for draft in added {
            let id = T::next_id(db).await?.max(floor + 1);
            let phantom_id = T::phantom_of(&draft).map(str::to_owned);
            let record = T::insert(db, id, draft).await?;
            mappings.push(PhantomIdMapping {
                phantom_id,
                id: T::record_id(&record),
            });
        }
        debug!("Inserted {} {} rows", mappings.len(), T::COLLECTION);

        Ok(Some(mappings))
    }
}
