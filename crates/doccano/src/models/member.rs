use serde::{Deserialize, Serialize};

/// A user's role within one project.
///
/// `username` and `rolename` are filled in by the server for display and are
/// never sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user: i64,
    pub role: i64,
    #[serde(default, skip_serializing)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub rolename: String,
}

impl Member {
    pub fn new(user: i64, role: i64) -> Self {
        Self {
            id: None,
            user,
            role,
            username: String::new(),
            rolename: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_fields_are_read_only() {
        let member: Member = serde_json::from_value(json!({
            "id": 3, "user": 1, "role": 2, "username": "ann", "rolename": "annotator"
        }))
        .expect("deserialize");
        assert_eq!(member.rolename, "annotator");

        let payload = serde_json::to_value(&member).expect("serialize");
        assert_eq!(payload, json!({"id": 3, "user": 1, "role": 2}));
        assert_eq!(
            serde_json::to_value(Member::new(1, 2)).expect("serialize"),
            json!({"user": 1, "role": 2})
        );
    }
}
