//! Citizen feedback intake
//!
//! Accepted submissions get a `FB-<unix millis>` reference and are kept in a
//! bounded in-memory list, newest first, so the dashboard can show what came
//! in recently. Once the list is full the oldest entry is dropped.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};
use tracing::info;

use crate::types::{FeedbackEntry, FeedbackStatus, FeedbackSubmission};

#[derive(Debug)]
pub struct FeedbackStore {
    max_retained: usize,
    entries: RwLock<VecDeque<FeedbackEntry>>,
}

impl FeedbackStore {
    pub fn new(max_retained: usize) -> Self {
        Self {
            max_retained: max_retained.max(1),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Validate and store a submission.
    ///
    /// On failure returns the names of the missing or blank fields.
    pub fn submit(
        &self,
        submission: FeedbackSubmission,
        now: DateTime<Utc>,
    ) -> Result<FeedbackEntry, Vec<&'static str>> {
        let missing = submission.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }

        let entry = FeedbackEntry {
            id: format!("FB-{}", now.timestamp_millis()),
            name: submission.name.unwrap_or_default(),
            phone: submission.phone.unwrap_or_default(),
            location: submission.location.unwrap_or_default(),
            feedback_text: submission.feedback_text.unwrap_or_default(),
            timestamp: now,
            status: FeedbackStatus::Submitted,
            processed: false,
        };

        info!(reference = %entry.id, location = %entry.location, "Storing feedback");
        info!(location = %entry.location, "Queued feedback location for analysis");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry.clone());
        entries.truncate(self.max_retained);
        Ok(entry)
    }

    /// Up to `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<FeedbackEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn submission(location: &str) -> FeedbackSubmission {
        FeedbackSubmission {
            name: Some("Ravi".to_string()),
            phone: Some("+91 98450 00000".to_string()),
            location: Some(location.to_string()),
            feedback_text: Some("Long wait on the right turn".to_string()),
        }
    }

    #[test]
    fn test_submit_assigns_reference() {
        let store = FeedbackStore::new(10);
        let now = Utc::now();
        let entry = store.submit(submission("Hebbal Flyover"), now).unwrap();
        assert_eq!(entry.id, format!("FB-{}", now.timestamp_millis()));
        assert_eq!(entry.status, FeedbackStatus::Submitted);
        assert!(!entry.processed);
    }

    #[test]
    fn test_rejects_blank_fields_without_storing() {
        let store = FeedbackStore::new(10);
        let mut sub = submission("Hebbal Flyover");
        sub.feedback_text = Some(String::new());
        assert_eq!(store.submit(sub, Utc::now()), Err(vec!["feedbackText"]));
        assert!(store.is_empty());
    }

    #[test]
    fn test_bounded_newest_first() {
        let store = FeedbackStore::new(2);
        let start = Utc::now();
        for (i, loc) in ["A", "B", "C"].iter().enumerate() {
            let at = start + Duration::seconds(i64::try_from(i).unwrap());
            store.submit(submission(loc), at).unwrap();
        }
        let recent = store.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].location, "C");
        assert_eq!(recent[1].location, "B");
    }
}
