//! Task entity: one schedulable row in the project tree.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::protocol::double_option;
use crate::store::{patch_field, Collection, SyncTable};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub effort: Option<f64>,
    pub effort_unit: String,
    pub duration: Option<f64>,
    pub duration_unit: String,
    pub percent_done: f64,
    pub scheduling_mode: String,
    pub note: Option<String>,
    pub constraint_type: Option<String>,
    pub constraint_date: Option<DateTimeUtc>,
    pub manually_scheduled: bool,
    pub ignore_resource_calendar: bool,
    pub effort_driven: bool,
    pub inactive: bool,
    pub cls: Option<String>,
    pub icon_cls: Option<String>,
    pub color: Option<String>,
    pub parent_index: i32,
    pub expanded: bool,
    pub calendar: Option<i32>,
    pub deadline: Option<DateTimeUtc>,
    pub event_color: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// New-task draft from a sync payload. Unknown fields are dropped during
/// decoding and a client-supplied `id` is never honored; omitted fields take
/// the schema defaults at insert time.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(rename = "$PhantomId")]
    pub phantom_id: Option<String>,
    pub parent_id: Option<i32>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub start_date: Option<DateTimeUtc>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub end_date: Option<DateTimeUtc>,
    pub effort: Option<f64>,
    pub effort_unit: Option<String>,
    pub duration: Option<f64>,
    pub duration_unit: Option<String>,
    pub percent_done: Option<f64>,
    pub scheduling_mode: Option<String>,
    pub note: Option<String>,
    pub constraint_type: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub constraint_date: Option<DateTimeUtc>,
    pub manually_scheduled: Option<bool>,
    pub ignore_resource_calendar: Option<bool>,
    pub effort_driven: Option<bool>,
    pub inactive: Option<bool>,
    pub cls: Option<String>,
    pub icon_cls: Option<String>,
    pub color: Option<String>,
    pub parent_index: Option<i32>,
    pub expanded: Option<bool>,
    pub calendar: Option<i32>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub deadline: Option<DateTimeUtc>,
    pub event_color: Option<String>,
}

impl TaskDraft {
    fn into_active(self, id: i32) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            parent_id: Set(self.parent_id),
            name: Set(self.name.unwrap_or_default()),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            effort: Set(self.effort),
            effort_unit: Set(self.effort_unit.unwrap_or_else(|| "hour".to_string())),
            duration: Set(self.duration),
            duration_unit: Set(self.duration_unit.unwrap_or_else(|| "day".to_string())),
            percent_done: Set(self.percent_done.unwrap_or(0.0)),
            scheduling_mode: Set(self.scheduling_mode.unwrap_or_else(|| "Normal".to_string())),
            note: Set(self.note),
            constraint_type: Set(self.constraint_type),
            constraint_date: Set(self.constraint_date),
            manually_scheduled: Set(self.manually_scheduled.unwrap_or(false)),
            ignore_resource_calendar: Set(self.ignore_resource_calendar.unwrap_or(false)),
            effort_driven: Set(self.effort_driven.unwrap_or(false)),
            inactive: Set(self.inactive.unwrap_or(false)),
            cls: Set(self.cls),
            icon_cls: Set(self.icon_cls),
            color: Set(self.color),
            parent_index: Set(self.parent_index.unwrap_or(0)),
            expanded: Set(self.expanded.unwrap_or(false)),
            calendar: Set(self.calendar),
            deadline: Set(self.deadline),
            event_color: Set(self.event_color),
        }
    }
}

/// Sparse update for one task. A field left out of the payload is not
/// touched; an explicit `null` clears a nullable field.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub id: i32,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i32>>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "dates::deserialize_double_opt")]
    pub start_date: Option<Option<DateTimeUtc>>,
    #[serde(default, deserialize_with = "dates::deserialize_double_opt")]
    pub end_date: Option<Option<DateTimeUtc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub effort: Option<Option<f64>>,
    pub effort_unit: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration: Option<Option<f64>>,
    pub duration_unit: Option<String>,
    pub percent_done: Option<f64>,
    pub scheduling_mode: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub note: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub constraint_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "dates::deserialize_double_opt")]
    pub constraint_date: Option<Option<DateTimeUtc>>,
    pub manually_scheduled: Option<bool>,
    pub ignore_resource_calendar: Option<bool>,
    pub effort_driven: Option<bool>,
    pub inactive: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub cls: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon_cls: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
    pub parent_index: Option<i32>,
    pub expanded: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub calendar: Option<Option<i32>>,
    #[serde(default, deserialize_with = "dates::deserialize_double_opt")]
    pub deadline: Option<Option<DateTimeUtc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub event_color: Option<Option<String>>,
}

impl TaskPatch {
    fn into_active(self) -> ActiveModel {
        ActiveModel {
            // Identity never changes through updates.
            id: NotSet,
            parent_id: patch_field(self.parent_id),
            name: patch_field(self.name),
            start_date: patch_field(self.start_date),
            end_date: patch_field(self.end_date),
            effort: patch_field(self.effort),
            effort_unit: patch_field(self.effort_unit),
            duration: patch_field(self.duration),
            duration_unit: patch_field(self.duration_unit),
            percent_done: patch_field(self.percent_done),
            scheduling_mode: patch_field(self.scheduling_mode),
            note: patch_field(self.note),
            constraint_type: patch_field(self.constraint_type),
            constraint_date: patch_field(self.constraint_date),
            manually_scheduled: patch_field(self.manually_scheduled),
            ignore_resource_calendar: patch_field(self.ignore_resource_calendar),
            effort_driven: patch_field(self.effort_driven),
            inactive: patch_field(self.inactive),
            cls: patch_field(self.cls),
            icon_cls: patch_field(self.icon_cls),
            color: patch_field(self.color),
            parent_index: patch_field(self.parent_index),
            expanded: patch_field(self.expanded),
            calendar: patch_field(self.calendar),
            deadline: patch_field(self.deadline),
            event_color: patch_field(self.event_color),
        }
    }
}

#[async_trait]
impl SyncTable for Entity {
    const COLLECTION: Collection = Collection::Tasks;

    type Draft = TaskDraft;
    type Patch = TaskPatch;
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

    async fn insert(db: &DatabaseConnection, id: i32, draft: TaskDraft) -> Result<Model, DbErr> {
        draft.into_active(id).insert(db).await
    }

    async fn apply_patch(db: &DatabaseConnection, patch: TaskPatch) -> Result<(), DbErr> {
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

    fn phantom_of(draft: &TaskDraft) -> Option<&str> {
        draft.phantom_id.as_deref()
    }
}
