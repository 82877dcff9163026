//! Wire contract for the load and sync endpoints.
//!
//! Mirrors the JSON the chart's crud manager speaks: camelCase field names,
//! `$PhantomId` temporary identifiers on added drafts, and a `{rows: [...]}`
//! wrapper around every collection payload. Decoding is structural only;
//! whether a referenced id exists is not this layer's problem.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::database::entities::{assignment, dependency, resource, task};
use crate::snapshot::ProjectSnapshot;

/// One collection's requested mutations. An absent list means "no change
/// requested", which is different from an empty one.
#[derive(Clone, Debug, Deserialize)]
pub struct TableChanges<A, P> {
    pub added: Option<Vec<A>>,
    pub updated: Option<Vec<P>>,
    pub removed: Option<Vec<RemovedRef>>,
}

pub type TaskChanges = TableChanges<task::TaskDraft, task::TaskPatch>;
pub type DependencyChanges = TableChanges<dependency::DependencyDraft, dependency::DependencyPatch>;
pub type ResourceChanges = TableChanges<resource::ResourceDraft, resource::ResourcePatch>;
pub type AssignmentChanges = TableChanges<assignment::AssignmentDraft, assignment::AssignmentPatch>;

/// A removal target; the wire carries either a bare id or an `{id}` record.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(untagged)]
pub enum RemovedRef {
    Id(i32),
    Record { id: i32 },
}

impl RemovedRef {
    pub fn id(self) -> i32 {
        match self {
            RemovedRef::Id(id) => id,
            RemovedRef::Record { id } => id,
        }
    }
}

/// Decoded sync payload.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Opaque correlation token, echoed back verbatim.
    pub request_id: Option<String>,
    pub tasks: Option<TaskChanges>,
    pub dependencies: Option<DependencyChanges>,
    pub resources: Option<ResourceChanges>,
    pub assignments: Option<AssignmentChanges>,
}

impl SyncRequest {
    /// Structural decode of a sync payload. Date strings are parsed here,
    /// so a malformed date rejects the whole call before any mutation.
    pub fn from_value(payload: Value) -> serde_json::Result<Self> {
        serde_json::from_value(payload)
    }
}

/// `$PhantomId` to durable id pair returned for each added draft. Drafts
/// that carried no temporary identifier still get an entry, in input order,
/// so positional correlation keeps working.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhantomIdMapping {
    #[serde(rename = "$PhantomId", skip_serializing_if = "Option::is_none")]
    pub phantom_id: Option<String>,
    pub id: i32,
}

/// The `{rows: [...]}` wrapper every collection block uses on the wire.
#[derive(Clone, Debug, Serialize)]
pub struct Rows<T> {
    pub rows: Vec<T>,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Rows<T> {
    fn from(rows: Vec<T>) -> Self {
        Self { rows }
    }
}

/// Sync response: per collection that had an `added` list, the id mappings
/// produced for it. Collections that only updated or removed rows are
/// absent, not empty.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Rows<PhantomIdMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Rows<PhantomIdMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Rows<PhantomIdMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Rows<PhantomIdMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SyncResponse {
    pub fn ok(request_id: Option<String>) -> Self {
        Self {
            request_id,
            success: true,
            tasks: None,
            dependencies: None,
            resources: None,
            assignments: None,
            message: None,
        }
    }

    pub fn failure(request_id: Option<String>, message: &str) -> Self {
        Self {
            request_id,
            success: false,
            tasks: None,
            dependencies: None,
            resources: None,
            assignments: None,
            message: Some(message.to_string()),
        }
    }
}

/// Load response: the full store snapshot, or an explicitly all-empty
/// failure shape. Partial data is never returned.
#[derive(Clone, Debug, Serialize)]
pub struct LoadResponse {
    pub success: bool,
    pub tasks: Rows<task::Model>,
    pub dependencies: Rows<dependency::Model>,
    pub resources: Rows<resource::Model>,
    pub assignments: Rows<assignment::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoadResponse {
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            tasks: Rows::default(),
            dependencies: Rows::default(),
            resources: Rows::default(),
            assignments: Rows::default(),
            message: Some(message.to_string()),
        }
    }
}

impl From<ProjectSnapshot> for LoadResponse {
    fn from(snapshot: ProjectSnapshot) -> Self {
        Self {
            success: true,
            tasks: snapshot.tasks.into(),
            dependencies: snapshot.dependencies.into(),
            resources: snapshot.resources.into(),
            assignments: snapshot.assignments.into(),
            message: None,
        }
    }
}

/// Sparse-patch field adapter: a field that is present but `null` decodes
/// to `Some(None)`, distinct from an absent field, which serde's default
/// leaves as `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
