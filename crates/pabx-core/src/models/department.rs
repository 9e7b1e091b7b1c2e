//! Department model
//!
//! Departments are reference entities used as grouping keys in statistics.
//! Calls carry a snapshot of the department name, not a foreign key, so
//! renaming a department does not relabel historical calls.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Department entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier
    pub id: i32,

    /// Unique department name; the join key for department statistics
    pub name: String,

    /// Accounting cost center code
    pub cost_center: Option<String>,

    /// Responsible manager
    pub manager: Option<String>,
}

/// Payload for creating a department
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewDepartment {
    /// Unique department name
    #[validate(length(min = 1, message = "department name must not be empty"))]
    pub name: String,

    /// Accounting cost center code
    pub cost_center: Option<String>,

    /// Responsible manager
    pub manager: Option<String>,
}
