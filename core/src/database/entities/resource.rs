//! Resource entity: a person or thing that can be assigned to tasks.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::protocol::double_option;
use crate::store::{patch_field, Collection, SyncTable};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub calendar: Option<i32>,
    pub cls: Option<String>,
    pub icon_cls: Option<String>,
    pub event_color: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// New-resource draft; `name` is the one required field.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDraft {
    #[serde(rename = "$PhantomId")]
    pub phantom_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub calendar: Option<i32>,
    pub cls: Option<String>,
    pub icon_cls: Option<String>,
    pub event_color: Option<String>,
}

impl ResourceDraft {
    fn into_active(self, id: i32) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            name: Set(self.name),
            email: Set(self.email),
            image_url: Set(self.image_url),
            calendar: Set(self.calendar),
            cls: Set(self.cls),
            icon_cls: Set(self.icon_cls),
            event_color: Set(self.event_color),
        }
    }
}

/// Sparse update for one resource.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePatch {
    pub id: i32,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub calendar: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cls: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon_cls: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub event_color: Option<Option<String>>,
}

impl ResourcePatch {
    fn into_active(self) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            name: patch_field(self.name),
            email: patch_field(self.email),
            image_url: patch_field(self.image_url),
            calendar: patch_field(self.calendar),
            cls: patch_field(self.cls),
            icon_cls: patch_field(self.icon_cls),
            event_color: patch_field(self.event_color),
        }
    }
}

#[async_trait]
impl SyncTable for Entity {
    const COLLECTION: Collection = Collection::Resources;

    type Draft = ResourceDraft;
    type Patch = ResourcePatch;
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
        draft: ResourceDraft,
    ) -> Result<Model, DbErr> {
        draft.into_active(id).insert(db).await
    }

    async fn apply_patch(db: &DatabaseConnection, patch: ResourcePatch) -> Result<(), DbErr> {
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

    fn phantom_of(draft: &ResourceDraft) -> Option<&str> {
        draft.phantom_id.as_deref()
    }
}
