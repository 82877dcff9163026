//! Demo dataset for local development.
//!
//! A small software project plan: four top-level phases with subtasks,
//! start-to-start dependencies between them and a handful of assigned
//! resources. Reseeding wipes the existing rows first, so the command is
//! safe to run repeatedly.

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use tracing::info;

use crate::database::entities::{assignment, dependency, resource, task};
use crate::database::entities::{Assignment, Dependency, Resource, Task};

/// Replaces the store contents with the demo project.
pub async fn seed_demo_project(db: &DatabaseConnection) -> Result<(), DbErr> {
    Task::delete_many().exec(db).await?;
    Dependency::delete_many().exec(db).await?;
    Resource::delete_many().exec(db).await?;
    Assignment::delete_many().exec(db).await?;

    Task::insert_many(demo_tasks()).exec(db).await?;
    Dependency::insert_many(demo_dependencies()).exec(db).await?;
    Resource::insert_many(demo_resources()).exec(db).await?;
    Assignment::insert_many(demo_assignments()).exec(db).await?;

    info!("Seeded sample project: 16 tasks, 12 dependencies, 3 resources, 4 assignments");
    Ok(())
}

fn demo_tasks() -> Vec<task::ActiveModel> {
    vec![
        sample_task(1, None, "Project Setup", 1, 5.0, 100.0, true),
        sample_task(2, Some(1), "Initialize repository", 1, 1.0, 100.0, false),
        sample_task(3, Some(1), "Setup development environment", 2, 2.0, 100.0, false),
        sample_task(4, Some(1), "Configure CI/CD", 4, 2.0, 50.0, false),
        sample_task(5, None, "Frontend Development", 8, 10.0, 30.0, true),
        sample_task(6, Some(5), "Design UI components", 8, 3.0, 100.0, false),
        sample_task(7, Some(5), "Implement Gantt chart", 11, 5.0, 40.0, false),
        sample_task(8, Some(5), "Add task editing", 16, 2.0, 0.0, false),
        sample_task(9, None, "Backend Development", 8, 8.0, 25.0, true),
        sample_task(10, Some(9), "Setup API endpoints", 8, 2.0, 100.0, false),
        sample_task(11, Some(9), "Implement CRUD operations", 10, 4.0, 50.0, false),
        sample_task(12, Some(9), "Add data validation", 14, 2.0, 0.0, false),
        sample_task(13, None, "Testing", 18, 5.0, 0.0, true),
        sample_task(14, Some(13), "Unit tests", 18, 2.0, 0.0, false),
        sample_task(15, Some(13), "Integration tests", 20, 2.0, 0.0, false),
        sample_task(16, Some(13), "E2E tests", 22, 1.0, 0.0, false),
    ]
}

fn demo_dependencies() -> Vec<dependency::ActiveModel> {
    vec![
        sample_dependency(1, 2, 3),
        sample_dependency(2, 3, 4),
        sample_dependency(3, 1, 5),
        sample_dependency(4, 1, 9),
        sample_dependency(5, 6, 7),
        sample_dependency(6, 7, 8),
        sample_dependency(7, 10, 11),
        sample_dependency(8, 11, 12),
        sample_dependency(9, 5, 13),
        sample_dependency(10, 9, 13),
        sample_dependency(11, 14, 15),
        sample_dependency(12, 15, 16),
    ]
}

fn demo_resources() -> Vec<resource::ActiveModel> {
    vec![
        sample_resource(1, "John Doe", "john@example.com"),
        sample_resource(2, "Jane Smith", "jane@example.com"),
        sample_resource(3, "Bob Johnson", "bob@example.com"),
    ]
}

fn demo_assignments() -> Vec<assignment::ActiveModel> {
    vec![
        sample_assignment(1, 2, 1),
        sample_assignment(2, 3, 1),
        sample_assignment(3, 7, 2),
        sample_assignment(4, 11, 3),
    ]
}

// The batched inserts require every row to set the same columns, so the
// helpers spell out the full column set and lean on nothing implicit.

fn sample_task(
    id: i32,
    parent_id: Option<i32>,
    name: &str,
    start_day: u32,
    duration: f64,
    percent_done: f64,
    expanded: bool,
) -> task::ActiveModel {
    task::ActiveModel {
        id: Set(id),
        parent_id: Set(parent_id),
        name: Set(name.to_string()),
        start_date: Set(Some(jan(start_day))),
        end_date: Set(None),
        effort: Set(None),
        effort_unit: Set("hour".to_string()),
        duration: Set(Some(duration)),
        duration_unit: Set("day".to_string()),
        percent_done: Set(percent_done),
        scheduling_mode: Set("Normal".to_string()),
        note: Set(None),
        constraint_type: Set(None),
        constraint_date: Set(None),
        manually_scheduled: Set(false),
        ignore_resource_calendar: Set(false),
        effort_driven: Set(false),
        inactive: Set(false),
        cls: Set(None),
        icon_cls: Set(None),
        color: Set(None),
        parent_index: Set(0),
        expanded: Set(expanded),
        calendar: Set(None),
        deadline: Set(None),
        event_color: Set(None),
    }
}

fn sample_dependency(id: i32, from_event: i32, to_event: i32) -> dependency::ActiveModel {
    dependency::ActiveModel {
        id: Set(id),
        from_event: Set(from_event),
        to_event: Set(to_event),
        // Type 0, start-to-start, throughout the demo plan.
        kind: Set(0),
        cls: Set(None),
        lag: Set(0.0),
        lag_unit: Set("day".to_string()),
        active: Set(true),
        from_side: Set(None),
        to_side: Set(None),
    }
}

fn sample_resource(id: i32, name: &str, email: &str) -> resource::ActiveModel {
    resource::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        email: Set(Some(email.to_string())),
        image_url: Set(None),
        cls: Set(None),
        icon_cls: Set(None),
        event_color: Set(None),
        calendar: Set(None),
    }
}

fn sample_assignment(id: i32, event_id: i32, resource_id: i32) -> assignment::ActiveModel {
    assignment::ActiveModel {
        id: Set(id),
        event_id: Set(event_id),
        resource_id: Set(resource_id),
        units: Set(100.0),
    }
}

fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .expect("valid seed date")
}
