use serde::{Deserialize, Serialize};

/// A portfolio project row from the `projects` table.
///
/// `sort_order` defines display order and is kept unique and densely
/// packed (0..N-1) by the client; the store does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub stack: String,
    pub desc: String,
    pub image_url: Option<String>,
    pub sort_order: i32,
}

/// Editable fields of a project, used as the insert/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectFields {
    pub title: String,
    pub stack: String,
    pub desc: String,
    pub image_url: Option<String>,
}
