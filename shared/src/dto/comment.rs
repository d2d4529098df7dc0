use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::article::AuthorSummary;
use crate::utils::timestamp;

/// Comment on an article, with nested replies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub content: String,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub author: Option<AuthorSummary>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Remove a comment (at any depth) by id; returns true if found
    pub fn remove_reply(&mut self, comment_id: i64) -> bool {
        let before = self.replies.len();
        self.replies.retain(|reply| reply.id != comment_id);
        if self.replies.len() != before {
            return true;
        }
        self.replies.iter_mut().any(|reply| reply.remove_reply(comment_id))
    }
}

/// New comment payload (`POST /articles/{id}/comments`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_comment_omits_parent() {
        let req = CommentRequest {
            content: "nice".to_string(),
            parent_id: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"content":"nice"}"#);
    }

    #[test]
    fn remove_reply_finds_nested_comment() {
        let json = r#"{
            "id": 1, "articleId": 9, "content": "root",
            "replies": [{"id": 2, "articleId": 9, "content": "a",
                "replies": [{"id": 3, "articleId": 9, "content": "b"}]}]
        }"#;
        let mut root: Comment = serde_json::from_str(json).unwrap();
        assert!(root.remove_reply(3));
        assert!(root.replies[0].replies.is_empty());
        assert!(!root.remove_reply(42));
    }
}
