//! Terminal rendering of a progression view

use colored::*;
use eyre::Result;
use progression::{CurrentAction, ProgressionView, Tier, TierStatus};

/// One-line-per-fact rendering of the recommended next action
pub fn render_next(view: &ProgressionView) -> String {
    let mut out = String::new();
    match &view.current_action {
        Some(CurrentAction::ResumeDraft { case }) => {
            out.push_str(&format!("{} Resume draft: {}\n", "→".cyan(), case.display_title().bold()));
            if let Some(step) = case
                .progress
                .as_ref()
                .and_then(|p| p.active_attempt.as_ref())
                .and_then(|a| a.step.as_deref())
            {
                out.push_str(&format!("  last step: {}\n", step.dimmed()));
            }
        }
        Some(CurrentAction::Assigned { case }) => {
            out.push_str(&format!("{} Up next (assigned): {}\n", "→".cyan(), case.display_title().bold()));
        }
        Some(CurrentAction::Recommended { case }) => {
            out.push_str(&format!("{} Recommended: {}\n", "→".cyan(), case.display_title().bold()));
        }
        Some(CurrentAction::StartModule { recipe }) => {
            out.push_str(&format!("{} Start module: {}\n", "→".cyan(), recipe.display_title().bold()));
        }
        Some(CurrentAction::EmptyModule { module }) => {
            out.push_str(&format!("{} Module {} has no content yet\n", "∅".yellow(), module.cyan()));
        }
        None => {
            out.push_str("Nothing to work on right now\n");
        }
    }

    if let Some(skill) = &view.skill_progress {
        out.push_str(&format!(
            "  skill: {} {}/{}\n",
            skill.label.cyan(),
            skill.done,
            skill.total
        ));
    }
    out
}

/// Tier progress plus the module-by-module journey
pub fn render_journey(view: &ProgressionView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Path: {}  (active tier: {})\n",
        view.current_path_id.cyan(),
        view.current_tier.to_string().bold()
    ));
    for tier in Tier::ALL {
        let state = view.program_path.tier_state(tier);
        let marker = match state.status {
            TierStatus::Complete => "✓".green().to_string(),
            TierStatus::Active => "→".cyan().to_string(),
            TierStatus::Locked => "·".dimmed().to_string(),
        };
        out.push_str(&format!(
            "  {} {:<12} {}/{}\n",
            marker, tier.to_string(), state.stats.done, state.stats.total
        ));
    }

    out.push('\n');
    for entry in &view.module_journey {
        out.push_str(&format!(
            "{:<16} {}/{} ({}%)",
            entry.label, entry.done, entry.total, entry.percent
        ));
        if let Some(next) = &entry.next_skill {
            out.push_str(&format!("  next: {}", next.dimmed()));
        }
        out.push('\n');
    }
    out
}

/// The ranked module picker
pub fn render_modules(view: &ProgressionView) -> String {
    if view.module_options.is_empty() {
        return "No modules available\n".to_string();
    }
    let mut out = String::new();
    for option in &view.module_options {
        out.push_str(&format!("{:<16} {}", option.value.cyan(), option.label));
        if let Some(description) = &option.description {
            out.push_str(&format!("  {}", description.dimmed()));
        }
        out.push('\n');
    }
    out
}

/// Full view: counts, action, tiers, journey
pub fn render_view(view: &ProgressionView) -> String {
    let mut out = String::new();
    out.push_str(&render_next(view));
    out.push('\n');
    out.push_str(&render_journey(view));
    out.push('\n');
    out.push_str(&format!(
        "cases: {} primary, {} retake, {} assigned, {} eligible\n",
        view.primary_cases.len(),
        view.retake_cases.len(),
        view.assigned_cases.len(),
        view.eligible_cases.len()
    ));
    if !view.available_modules.is_empty() {
        out.push_str(&format!("open catalog entries in module: {}\n", view.available_modules.len()));
    }
    out
}

/// JSON rendering for downstream tooling
pub fn render_view_json(view: &ProgressionView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use progression::{ProgressionInput, compute_progression_view};

    #[test]
    fn test_render_next_with_nothing_to_do() {
        let view = compute_progression_view(&ProgressionInput::default());
        let text = render_next(&view);
        assert!(text.contains("Nothing to work on"));
    }

    #[test]
    fn test_render_journey_lists_all_tiers() {
        let view = compute_progression_view(&ProgressionInput::default());
        let text = render_journey(&view);
        assert!(text.contains("foundations"));
        assert!(text.contains("core"));
        assert!(text.contains("advanced"));
    }

    #[test]
    fn test_render_view_json_is_valid() {
        let view = compute_progression_view(&ProgressionInput::default());
        let json = render_view_json(&view).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("currentPathId").is_some() || parsed.get("current_path_id").is_some());
    }
}
