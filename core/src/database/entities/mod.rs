//! Sea-ORM entity definitions
//!
//! One module per synchronized collection; each also carries the wire-side
//! draft and patch types for its rows.

pub mod assignment;
pub mod dependency;
pub mod resource;
pub mod task;

// Re-export all entities
pub use assignment::Entity as Assignment;
pub use dependency::Entity as Dependency;
pub use resource::Entity as Resource;
pub use task::Entity as Task;
