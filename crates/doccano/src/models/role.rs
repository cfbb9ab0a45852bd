use serde::{Deserialize, Serialize};

/// Well-known role names.
pub const PROJECT_ADMIN: &str = "project_admin";
pub const ANNOTATOR: &str = "annotator";
pub const ANNOTATION_APPROVER: &str = "annotation_approver";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}
