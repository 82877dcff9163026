//! Full-store snapshot for the load endpoint.

use sea_orm::{DatabaseConnection, DbErr};

use crate::database::entities::{assignment, dependency, resource, task};
use crate::database::entities::{Assignment, Dependency, Resource, Task};
use crate::store::SyncTable;

/// Everything the chart needs to render, read in one go. Rows come back
/// ordered by id within each collection.
#[derive(Clone, Debug, Default)]
pub struct ProjectSnapshot {
    pub tasks: Vec<task::Model>,
    pub dependencies: Vec<dependency::Model>,
    pub resources: Vec<resource::Model>,
    pub assignments: Vec<assignment::Model>,
}

/// Reads all four collections concurrently. Any single failure fails the
/// whole snapshot; partial data is never handed out.
pub async fn load(db: &DatabaseConnection) -> Result<ProjectSnapshot, DbErr> {
    let (tasks, dependencies, resources, assignments) = tokio::try_join!(
        Task::find_all(db),
        Dependency::find_all(db),
        Resource::find_all(db),
        Assignment::find_all(db),
    )?;

    Ok(ProjectSnapshot {
        tasks,
        dependencies,
        resources,
        assignments,
    })
}
