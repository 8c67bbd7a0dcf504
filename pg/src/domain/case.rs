//! Case records and embedded trainee progress
//!
//! A case is one trainee-facing unit of work. Records arrive from a
//! Firestore-shaped export, so every field except `id` is optional and the
//! serde layer is camelCase with defaults. Legacy rows freely omit fields;
//! the helpers here are where "is this present and valid" gets decided once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow status of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Assigned to the trainee, not yet opened
    #[default]
    Assigned,
    /// Being worked on
    InProgress,
    /// Saved but not submitted
    Draft,
    /// Turned in for grading
    Submitted,
    /// Removed from circulation
    Archived,
    /// Unrecognized legacy value
    #[serde(other)]
    Unknown,
}

impl CaseStatus {
    /// Statuses that make a case directly actionable for the trainee
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress | Self::Draft)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assigned => write!(f, "assigned"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Draft => write!(f, "draft"),
            Self::Submitted => write!(f, "submitted"),
            Self::Archived => write!(f, "archived"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// State of a trainee's accumulated progress on one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    #[default]
    NotStarted,
    InProgress,
    Submitted,
    #[serde(other)]
    Unknown,
}

/// Locally-saved state of an unsubmitted attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveAttempt {
    /// Opaque saved form state
    pub draft: serde_json::Value,

    /// Wizard step the trainee was last on
    pub step: Option<String>,

    /// When the attempt was started
    pub started_at: Option<DateTime<Utc>>,

    /// Last local save
    pub updated_at: Option<DateTime<Utc>>,
}

impl ActiveAttempt {
    /// Whether the saved draft bag actually holds anything
    pub fn has_draft_content(&self) -> bool {
        match &self.draft {
            serde_json::Value::Null => false,
            serde_json::Value::Object(map) => !map.is_empty(),
            serde_json::Value::Array(items) => !items.is_empty(),
            serde_json::Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

/// A trainee's accumulated state for one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    /// Authoritative completion flag when present
    pub has_successful_attempt: Option<bool>,

    /// 0-100
    pub percent_complete: f64,

    pub state: ProgressState,

    pub active_attempt: Option<ActiveAttempt>,

    pub last_attempt_at: Option<DateTime<Utc>>,

    /// Legacy denormalized field, only consulted for recency ordering
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// A progress record is completed iff the authoritative flag says so,
    /// or (when the flag is absent) the state or percentage does.
    pub fn is_completed(&self) -> bool {
        match self.has_successful_attempt {
            Some(flag) => flag,
            None => self.state == ProgressState::Submitted || self.percent_complete >= 100.0,
        }
    }

    /// A meaningful draft is an unfinished attempt with anything saved:
    /// form content, a wizard step, or attempt timestamps.
    pub fn has_meaningful_draft(&self) -> bool {
        if self.is_completed() {
            return false;
        }
        match &self.active_attempt {
            Some(attempt) => {
                attempt.has_draft_content()
                    || attempt.step.as_deref().is_some_and(|s| !s.trim().is_empty())
                    || attempt.started_at.is_some()
                    || attempt.updated_at.is_some()
            }
            None => false,
        }
    }
}

/// One trainee-facing unit of work with its denormalized progress merged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseRecord {
    /// Unique identifier
    pub id: String,

    /// Owning module; falls back to `id` when absent
    pub module_id: Option<String>,

    /// Recipe this case was instantiated from, if any
    pub recipe_id: Option<String>,

    /// Coarse subject tag (free text, aliased during normalization)
    pub audit_area: Option<String>,

    pub title: Option<String>,

    /// Older records carry the title here instead
    pub case_name: Option<String>,

    pub path_id: Option<String>,

    /// Raw tier value; parsed leniently during normalization
    pub tier: Option<String>,

    /// Raw case level; parsed leniently during normalization
    pub case_level: Option<String>,

    pub primary_skill: Option<String>,

    pub module_title: Option<String>,

    pub status: CaseStatus,

    /// Tie-breaker for "next" selection, lowest first
    pub order_index: Option<f64>,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,

    pub progress: Option<ProgressRecord>,
}

impl CaseRecord {
    /// Whether the trainee has completed this case
    pub fn is_completed(&self) -> bool {
        self.progress.as_ref().is_some_and(|p| p.is_completed())
    }

    /// Whether this case carries a resumable unfinished attempt
    pub fn has_meaningful_draft(&self) -> bool {
        self.progress.as_ref().is_some_and(|p| p.has_meaningful_draft())
    }

    /// Module id with the documented fallback to the case id
    pub fn module_id_or_self(&self) -> &str {
        match self.module_id.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => &self.id,
        }
    }

    /// Most recent activity timestamp, first-present-wins:
    /// attempt save, last attempt, progress update, case update, creation.
    pub fn latest_activity(&self) -> Option<DateTime<Utc>> {
        if let Some(progress) = &self.progress {
            if let Some(ts) = progress.active_attempt.as_ref().and_then(|a| a.updated_at) {
                return Some(ts);
            }
            if let Some(ts) = progress.last_attempt_at {
                return Some(ts);
            }
            if let Some(ts) = progress.updated_at {
                return Some(ts);
            }
        }
        self.updated_at.or(self.created_at)
    }

    /// Human-facing label with legacy fallbacks
    pub fn display_title(&self) -> &str {
        [&self.title, &self.case_name, &self.module_title]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_completion_flag_is_authoritative() {
        let explicit_failure = ProgressRecord {
            has_successful_attempt: Some(false),
            state: ProgressState::Submitted,
            percent_complete: 100.0,
            ..Default::default()
        };
        assert!(!explicit_failure.is_completed());

        let explicit_success = ProgressRecord {
            has_successful_attempt: Some(true),
            ..Default::default()
        };
        assert!(explicit_success.is_completed());
    }

    #[test]
    fn test_completion_fallback_without_flag() {
        let submitted = ProgressRecord {
            state: ProgressState::Submitted,
            ..Default::default()
        };
        assert!(submitted.is_completed());

        let full_percent = ProgressRecord {
            percent_complete: 100.0,
            ..Default::default()
        };
        assert!(full_percent.is_completed());

        let partial = ProgressRecord {
            state: ProgressState::InProgress,
            percent_complete: 60.0,
            ..Default::default()
        };
        assert!(!partial.is_completed());
    }

    #[test]
    fn test_meaningful_draft_requires_saved_state() {
        let empty = ProgressRecord {
            active_attempt: Some(ActiveAttempt::default()),
            ..Default::default()
        };
        assert!(!empty.has_meaningful_draft());

        let with_step = ProgressRecord {
            active_attempt: Some(ActiveAttempt {
                step: Some("testing".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(with_step.has_meaningful_draft());

        let with_bag = ProgressRecord {
            active_attempt: Some(ActiveAttempt {
                draft: serde_json::json!({"q1": "answer"}),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(with_bag.has_meaningful_draft());
    }

    #[test]
    fn test_completed_progress_is_never_a_draft() {
        let progress = ProgressRecord {
            has_successful_attempt: Some(true),
            active_attempt: Some(ActiveAttempt {
                step: Some("review".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!progress.has_meaningful_draft());
    }

    #[test]
    fn test_module_id_fallback() {
        let with_module = CaseRecord {
            id: "case-1".to_string(),
            module_id: Some("payables".to_string()),
            ..Default::default()
        };
        assert_eq!(with_module.module_id_or_self(), "payables");

        let blank_module = CaseRecord {
            id: "case-2".to_string(),
            module_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank_module.module_id_or_self(), "case-2");
    }

    #[test]
    fn test_latest_activity_fallback_chain() {
        let case = CaseRecord {
            created_at: Some(ts(100)),
            updated_at: Some(ts(200)),
            progress: Some(ProgressRecord {
                last_attempt_at: Some(ts(300)),
                active_attempt: Some(ActiveAttempt {
                    updated_at: Some(ts(400)),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        // Attempt save wins even though it is not the max
        assert_eq!(case.latest_activity(), Some(ts(400)));

        let no_attempt = CaseRecord {
            updated_at: Some(ts(200)),
            progress: Some(ProgressRecord {
                last_attempt_at: Some(ts(300)),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(no_attempt.latest_activity(), Some(ts(300)));

        let bare = CaseRecord {
            created_at: Some(ts(100)),
            ..Default::default()
        };
        assert_eq!(bare.latest_activity(), Some(ts(100)));
    }

    #[test]
    fn test_case_record_camel_case_serde() {
        let json = r#"{
            "id": "case-9",
            "moduleId": "payables",
            "auditArea": "Accounts Payable",
            "orderIndex": 2,
            "status": "in_progress",
            "progress": {
                "hasSuccessfulAttempt": false,
                "percentComplete": 45,
                "state": "in_progress",
                "activeAttempt": {"step": "vouching"}
            },
            "someFutureField": true
        }"#;
        let case: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(case.module_id.as_deref(), Some("payables"));
        assert_eq!(case.status, CaseStatus::InProgress);
        assert_eq!(case.order_index, Some(2.0));
        assert!(case.has_meaningful_draft());
        assert!(!case.is_completed());
    }

    #[test]
    fn test_unknown_status_values_degrade() {
        let case: CaseRecord =
            serde_json::from_str(r#"{"id": "c", "status": "mothballed"}"#).unwrap();
        assert_eq!(case.status, CaseStatus::Unknown);
        assert!(!case.status.is_actionable());
    }

    #[test]
    fn test_display_title_fallbacks() {
        let case = CaseRecord {
            id: "case-3".to_string(),
            case_name: Some("Vendor statement recon".to_string()),
            ..Default::default()
        };
        assert_eq!(case.display_title(), "Vendor statement recon");

        let bare = CaseRecord {
            id: "case-4".to_string(),
            title: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(bare.display_title(), "case-4");
    }
}
