//! Assignment entity: allocates a resource to a task at some percentage.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::store::{patch_field, Collection, SyncTable};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub event_id: i32,
    pub resource_id: i32,
    pub units: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// New-assignment draft; both endpoints are required, `units` defaults to a
/// full-time 100 percent.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDraft {
    #[serde(rename = "$PhantomId")]
    pub phantom_id: Option<String>,
    pub event_id: i32,
    pub resource_id: i32,
    pub units: Option<f64>,
}

impl AssignmentDraft {
    fn into_active(self, id: i32) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            event_id: Set(self.event_id),
            resource_id: Set(self.resource_id),
            units: Set(self.units.unwrap_or(100.0)),
        }
    }
}

/// Sparse update for one assignment.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPatch {
    pub id: i32,
    pub event_id: Option<i32>,
    pub resource_id: Option<i32>,
    pub units: Option<f64>,
}

impl AssignmentPatch {
    fn into_active(self) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            event_id: patch_field(self.event_id),
            resource_id: patch_field(self.resource_id),
            units: patch_field(self.units),
        }
    }
}

#[async_trait]
impl SyncTable for Entity {
    const COLLECTION: Collection = Collection::Assignments;

    type Draft = AssignmentDraft;
    type Patch = AssignmentPatch;
    type Record = Model;

    async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    async fn max_id(db: &DatabaseConnection) -> Result<i32, DbErr> {
        Ok(Entity::find()
            .order_by_desc(Column::Id)
            .one(db)
            .await?
            .map(|row| row.id)
            .unwrap_or(0))
    }

    async fn insert(
        db: &DatabaseConnection,
        id: i32,
        draft: AssignmentDraft,
    ) -> Result<Model, DbErr> {
        draft.into_active(id).insert(db).await
    }

    async fn apply_patch(db: &DatabaseConnection, patch: AssignmentPatch) -> Result<(), DbErr> {
        let id = patch.id;
        let active = patch.into_active();
        if !active.is_changed() {
            return Ok(());
        }
        Entity::update_many()
            .set(active)
            .filter(Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }

    async fn remove(db: &DatabaseConnection, ids: &[i32]) -> Result<u64, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    fn record_id(record: &Model) -> i32 {
        record.id
    }

    fn phantom_of(draft: &AssignmentDraft) -> Option<&str> {
        draft.phantom_id.as_deref()
    }
}
