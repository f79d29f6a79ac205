use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Free-text comment a user left against one ranked material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialFeedback {
    pub category: String,
    pub grade: String,
    pub comment: String,
}

/// End-of-session survey answers, scores on a 1-5 scale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSurvey {
    pub recommendation_score: u8,
    #[serde(default)]
    pub improvement_suggestions: String,
    pub doe_relevance_score: u8,
    #[serde(default)]
    pub doe_comments: String,
    #[serde(default)]
    pub other_feedback: String,
}

/// Everything a session hands to the feedback collaborator in one shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub user: String,
    pub submitted_at: NaiveDateTime,
    pub survey: SessionSurvey,
    #[serde(default)]
    pub material_feedback: Vec<MaterialFeedback>,
}

/// Outbound seam for feedback persistence (files, object storage, a queue).
/// The core only produces submissions; where they land is the adapter's
/// problem.
pub trait FeedbackSink: Send + Sync {
    fn record(&self, submission: &FeedbackSubmission) -> Result<(), FeedbackError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("feedback transport unavailable: {0}")]
    Transport(String),
}

/// Sink that only logs submissions; the default until a storage adapter is
/// configured.
#[derive(Debug, Default)]
pub struct LogFeedbackSink;

impl FeedbackSink for LogFeedbackSink {
    fn record(&self, submission: &FeedbackSubmission) -> Result<(), FeedbackError> {
        info!(
            user = %submission.user,
            recommendation_score = submission.survey.recommendation_score,
            doe_relevance_score = submission.survey.doe_relevance_score,
            material_comments = submission.material_feedback.len(),
            "feedback submission recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct RecordingSink {
        submissions: Mutex<Vec<FeedbackSubmission>>,
    }

    impl FeedbackSink for RecordingSink {
        fn record(&self, submission: &FeedbackSubmission) -> Result<(), FeedbackError> {
            self.submissions
                .lock()
                .expect("sink mutex poisoned")
                .push(submission.clone());
            Ok(())
        }
    }

    fn sample_submission() -> FeedbackSubmission {
        FeedbackSubmission {
            user: "anonymous".to_string(),
            submitted_at: NaiveDate::from_ymd_opt(2026, 3, 2)
                .expect("valid date")
                .and_hms_opt(9, 30, 0)
                .expect("valid time"),
            survey: SessionSurvey {
                recommendation_score: 4,
                improvement_suggestions: "More suppliers per grade".to_string(),
                doe_relevance_score: 5,
                doe_comments: String::new(),
                other_feedback: String::new(),
            },
            material_feedback: vec![MaterialFeedback {
                category: "PLA".to_string(),
                grade: "L175".to_string(),
                comment: "Elongation looks optimistic".to_string(),
            }],
        }
    }

    #[test]
    fn sinks_receive_the_full_submission() {
        let sink = RecordingSink {
            submissions: Mutex::new(Vec::new()),
        };

        sink.record(&sample_submission()).expect("record succeeds");

        let stored = sink.submissions.lock().expect("sink mutex poisoned");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].material_feedback[0].grade, "L175");
    }

    #[test]
    fn log_sink_accepts_submissions() {
        LogFeedbackSink
            .record(&sample_submission())
            .expect("log sink never fails");
    }
}
