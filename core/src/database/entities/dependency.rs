//! Dependency entity: a directed scheduling edge between two tasks.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::protocol::double_option;
use crate::store::{patch_field, Collection, SyncTable};

// The relation kind is called `type` on the wire; `kind` avoids the keyword
// on the Rust side.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dependencies")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub from_event: i32,
    pub to_event: i32,
    #[serde(rename = "type")]
    pub kind: i32,
    pub cls: Option<String>,
    pub lag: f64,
    pub lag_unit: String,
    pub active: bool,
    pub from_side: Option<String>,
    pub to_side: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// New-dependency draft; both endpoints are required, everything else
/// defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDraft {
    #[serde(rename = "$PhantomId")]
    pub phantom_id: Option<String>,
    pub from_event: i32,
    pub to_event: i32,
    #[serde(rename = "type")]
    pub kind: Option<i32>,
    pub cls: Option<String>,
    pub lag: Option<f64>,
    pub lag_unit: Option<String>,
    pub active: Option<bool>,
    pub from_side: Option<String>,
    pub to_side: Option<String>,
}

impl DependencyDraft {
    fn into_active(self, id: i32) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            from_event: Set(self.from_event),
            to_event: Set(self.to_event),
            kind: Set(self.kind.unwrap_or(2)),
            cls: Set(self.cls),
            lag: Set(self.lag.unwrap_or(0.0)),
            lag_unit: Set(self.lag_unit.unwrap_or_else(|| "day".to_string())),
            active: Set(self.active.unwrap_or(true)),
            from_side: Set(self.from_side),
            to_side: Set(self.to_side),
        }
    }
}

/// Sparse update for one dependency.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyPatch {
    pub id: i32,
    pub from_event: Option<i32>,
    pub to_event: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub cls: Option<Option<String>>,
    pub lag: Option<f64>,
    pub lag_unit: Option<String>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub from_side: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub to_side: Option<Option<String>>,
}

impl DependencyPatch {
    fn into_active(self) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            from_event: patch_field(self.from_event),
            to_event: patch_field(self.to_event),
            kind: patch_field(self.kind),
            cls: patch_field(self.cls),
            lag: patch_field(self.lag),
            lag_unit: patch_field(self.lag_unit),
            active: patch_field(self.active),
            from_side: patch_field(self.from_side),
            to_side: patch_field(self.to_side),
        }
    }
}

#[async_trait]
impl SyncTable for Entity {
    const COLLECTION: Collection = Collection::Dependencies;

    type Draft = DependencyDraft;
    type Patch = DependencyPatch;
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
        draft: DependencyDraft,
    ) -> Result<Model, DbErr> {
        draft.into_active(id).insert(db).await
    }

    async fn apply_patch(db: &DatabaseConnection, patch: DependencyPatch) -> Result<(), DbErr> {
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

    fn phantom_of(draft: &DependencyDraft) -> Option<&str> {
        draft.phantom_id.as_deref()
    }
}
