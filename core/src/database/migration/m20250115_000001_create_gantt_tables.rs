//! Initial migration creating the four project tables.
//!
//! Ids are assigned by the application's allocator, so no column is
//! auto-incrementing, and the cross-table references (parent_id, from_event,
//! event_id, ...) are deliberately plain integers: the store tolerates
//! dangling references and the chart resolves them at render time.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tasks table
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::ParentId).integer())
                    .col(ColumnDef::new(Tasks::Name).string().not_null().default(""))
                    .col(ColumnDef::new(Tasks::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::EndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::Effort).double())
                    .col(ColumnDef::new(Tasks::EffortUnit).string().not_null().default("hour"))
                    .col(ColumnDef::new(Tasks::Duration).double())
                    .col(ColumnDef::new(Tasks::DurationUnit).string().not_null().default("day"))
                    .col(ColumnDef::new(Tasks::PercentDone).double().not_null().default(0.0))
                    .col(ColumnDef::new(Tasks::SchedulingMode).string().not_null().default("Normal"))
                    .col(ColumnDef::new(Tasks::Note).string())
                    .col(ColumnDef::new(Tasks::ConstraintType).string())
                    .col(ColumnDef::new(Tasks::ConstraintDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::ManuallyScheduled).boolean().not_null().default(false))
                    .col(ColumnDef::new(Tasks::IgnoreResourceCalendar).boolean().not_null().default(false))
                    .col(ColumnDef::new(Tasks::EffortDriven).boolean().not_null().default(false))
                    .col(ColumnDef::new(Tasks::Inactive).boolean().not_null().default(false))
                    .col(ColumnDef::new(Tasks::Cls).string())
                    .col(ColumnDef::new(Tasks::IconCls).string())
                    .col(ColumnDef::new(Tasks::Color).string())
                    .col(ColumnDef::new(Tasks::ParentIndex).integer().not_null().default(0))
                    .col(ColumnDef::new(Tasks::Expanded).boolean().not_null().default(false))
                    .col(ColumnDef::new(Tasks::Calendar).integer())
                    .col(ColumnDef::new(Tasks::Deadline).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::EventColor).string())
                    .to_owned(),
            )
            .await?;

        // Create dependencies table
        manager
            .create_table(
                Table::create()
                    .table(Dependencies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Dependencies::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Dependencies::FromEvent).integer().not_null())
                    .col(ColumnDef::new(Dependencies::ToEvent).integer().not_null())
                    .col(ColumnDef::new(Dependencies::Kind).integer().not_null().default(2))
                    .col(ColumnDef::new(Dependencies::Cls).string())
                    .col(ColumnDef::new(Dependencies::Lag).double().not_null().default(0.0))
                    .col(ColumnDef::new(Dependencies::LagUnit).string().not_null().default("day"))
                    .col(ColumnDef::new(Dependencies::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Dependencies::FromSide).string())
                    .col(ColumnDef::new(Dependencies::ToSide).string())
                    .to_owned(),
            )
            .await?;

        // Create resources table
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Resources::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Resources::Name).string().not_null())
                    .col(ColumnDef::new(Resources::Email).string())
                    .col(ColumnDef::new(Resources::ImageUrl).string())
                    .col(ColumnDef::new(Resources::Calendar).integer())
                    .col(ColumnDef::new(Resources::Cls).string())
                    .col(ColumnDef::new(Resources::IconCls).string())
                    .col(ColumnDef::new(Resources::EventColor).string())
                    .to_owned(),
            )
            .await?;

        // Create assignments table
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assignments::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Assignments::EventId).integer().not_null())
                    .col(ColumnDef::new(Assignments::ResourceId).integer().not_null())
                    .col(ColumnDef::new(Assignments::Units).double().not_null().default(100.0))
                    .to_owned(),
            )
            .await?;

        // Create indices for the lookup paths the chart hits
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_parent_id")
                    .table(Tasks::Table)
                    .col(Tasks::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_calendar")
                    .table(Tasks::Table)
                    .col(Tasks::Calendar)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dependencies_from_event")
                    .table(Dependencies::Table)
                    .col(Dependencies::FromEvent)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dependencies_to_event")
                    .table(Dependencies::Table)
                    .col(Dependencies::ToEvent)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_event_id")
                    .table(Assignments::Table)
                    .col(Assignments::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_resource_id")
                    .table(Assignments::Table)
                    .col(Assignments::ResourceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of creation
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dependencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Table identifiers

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    ParentId,
    Name,
    StartDate,
    EndDate,
    Effort,
    EffortUnit,
    Duration,
    DurationUnit,
    PercentDone,
    SchedulingMode,
    Note,
    ConstraintType,
    ConstraintDate,
    ManuallyScheduled,
    IgnoreResourceCalendar,
    EffortDriven,
    Inactive,
    Cls,
    IconCls,
    Color,
    ParentIndex,
    Expanded,
    Calendar,
    Deadline,
    EventColor,
}

#[derive(Iden)]
enum Dependencies {
    Table,
    Id,
    FromEvent,
    ToEvent,
    Kind,
    Cls,
    Lag,
    LagUnit,
    Active,
    FromSide,
    ToSide,
}

#[derive(Iden)]
enum Resources {
    Table,
    Id,
    Name,
    Email,
    ImageUrl,
    Calendar,
    Cls,
    IconCls,
    EventColor,
}

#[derive(Iden)]
enum Assignments {
    Table,
    Id,
    EventId,
    ResourceId,
    Units,
}
