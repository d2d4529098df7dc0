use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::timestamp;

/// User notification (`GET /notifications/me`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub actor_id: Option<i64>,
    #[serde(default)]
    pub article_id: Option<i64>,
    #[serde(default)]
    pub article_title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_deserializes_backend_shape() {
        let json = r#"{
            "id": 5, "userId": 1, "actorId": 2, "articleId": 9,
            "articleTitle": "Hello", "type": "ARTICLE_LIKED",
            "content": "bob liked your article", "read": false,
            "createdAt": "2024-05-01T10:00:00.123"
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind.as_deref(), Some("ARTICLE_LIKED"));
        assert!(!n.read);
        assert!(n.created_at.is_some());
    }
}
