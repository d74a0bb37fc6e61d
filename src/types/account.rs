//! Administrator identity, sessions and citizen feedback

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user as reported to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Server-side record of an issued login token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Fields a citizen fills in on the feedback form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub feedback_text: Option<String>,
}

impl FeedbackSubmission {
    /// Names of the fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("location", &self.location),
            ("feedbackText", &self.feedback_text),
        ]
        .into_iter()
        .filter(|(_, v)| blank(v))
        .map(|(k, _)| k)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Submitted,
}

/// A validated, accepted feedback submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    /// `FB-<unix millis>`
    pub id: String,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub feedback_text: String,
    pub timestamp: DateTime<Utc>,
    pub status: FeedbackStatus,
    pub processed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_treats_blank_as_missing() {
        let sub = FeedbackSubmission {
            name: Some("Asha".to_string()),
            phone: Some("   ".to_string()),
            location: None,
            feedback_text: Some("Signal stuck on red".to_string()),
        };
        assert_eq!(sub.missing_fields(), vec!["phone", "location"]);
    }

    #[test]
    fn test_complete_submission_has_no_missing_fields() {
        let sub: FeedbackSubmission = serde_json::from_str(
            r#"{"name":"A","phone":"1","location":"Hebbal Flyover","feedbackText":"ok"}"#,
        )
        .unwrap();
        assert!(sub.missing_fields().is_empty());
    }
}
