//! Primary vs. retake attempt partitioning
//!
//! Once a module has been completed once, later unfinished attempts under
//! it are practice traffic. They get their own trainee-facing history list
//! but must not distort tier completion math, so everything downstream of
//! this split runs on the primary set only.

use crate::index::{CompletionIndex, KeyedCase};

/// The two attempt pools an evaluation works with
#[derive(Debug, Default)]
pub struct Partition<'a> {
    /// First-pass attempts; all tier and eligibility math uses these
    pub primary: Vec<KeyedCase<'a>>,
    /// Unfinished attempts at already-completed modules, most recent first
    pub retakes: Vec<KeyedCase<'a>>,
}

/// Split attempts into primary and retake pools.
///
/// A case is a retake iff its module id already has a completed attempt
/// and the case itself is not the completed one.
pub fn partition_attempts<'a>(cases: Vec<KeyedCase<'a>>, completion: &CompletionIndex) -> Partition<'a> {
    let mut partition = Partition::default();
    for keyed in cases {
        let is_retake =
            completion.is_module_id_completed(keyed.case.module_id_or_self()) && !keyed.case.is_completed();
        if is_retake {
            partition.retakes.push(keyed);
        } else {
            partition.primary.push(keyed);
        }
    }

    partition.retakes.sort_by(|a, b| {
        match (a.case.latest_activity(), b.case.latest_activity()) {
            (Some(ts_a), Some(ts_b)) => ts_b.cmp(&ts_a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.case.id.cmp(&b.case.id),
        }
    });

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseRecord, ProgressRecord};
    use crate::index::ModuleIndex;
    use crate::normalize::Normalizer;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn case(id: &str, module_id: &str, completed: bool, updated: Option<i64>) -> CaseRecord {
        CaseRecord {
            id: id.to_string(),
            module_id: Some(module_id.to_string()),
            audit_area: Some("cash".to_string()),
            updated_at: updated.map(ts),
            progress: Some(ProgressRecord {
                has_successful_attempt: Some(completed),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn run(cases: &[CaseRecord]) -> (Vec<String>, Vec<String>) {
        let normalizer = Normalizer::default();
        let catalog = ModuleIndex::build(&[], &normalizer);
        let keyed: Vec<KeyedCase<'_>> = cases
            .iter()
            .map(|c| KeyedCase {
                keys: normalizer.case_keys(c, catalog.catalog_modules()),
                case: c,
            })
            .collect();
        let completion = CompletionIndex::build(&keyed);
        let partition = partition_attempts(keyed, &completion);
        (
            partition.primary.iter().map(|k| k.case.id.clone()).collect(),
            partition.retakes.iter().map(|k| k.case.id.clone()).collect(),
        )
    }

    #[test]
    fn test_completed_module_ratchets_later_attempts_into_retakes() {
        let cases = vec![
            case("first", "cash-mod", true, Some(10)),
            case("again", "cash-mod", false, Some(20)),
            case("other", "ap-mod", false, Some(30)),
        ];
        let (primary, retakes) = run(&cases);
        assert_eq!(primary, vec!["first", "other"]);
        assert_eq!(retakes, vec!["again"]);
    }

    #[test]
    fn test_completed_attempt_itself_stays_primary() {
        let cases = vec![case("done", "cash-mod", true, Some(10))];
        let (primary, retakes) = run(&cases);
        assert_eq!(primary, vec!["done"]);
        assert!(retakes.is_empty());
    }

    #[test]
    fn test_retakes_sorted_most_recent_first() {
        let cases = vec![
            case("first", "cash-mod", true, Some(10)),
            case("old-retake", "cash-mod", false, Some(20)),
            case("new-retake", "cash-mod", false, Some(90)),
            case("dateless-retake", "cash-mod", false, None),
        ];
        let (_, retakes) = run(&cases);
        assert_eq!(retakes, vec!["new-retake", "old-retake", "dateless-retake"]);
    }
}
