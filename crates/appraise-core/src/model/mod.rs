//! Data model for plans, check outputs, verdicts and run results.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Open key/value map produced by a check.
///
/// Convention: always contains a `raw_result` entry; a failed check carries
/// `error` and `error_type` entries with a null `raw_result`.
pub type CheckOutput = serde_json::Map<String, serde_json::Value>;

/// Per-check parameter overrides, keyed by check name.
pub type ParamOverrides = HashMap<String, CheckOutput>;

/// Verdict severity. Closed set; parsing anything else is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a severity string is outside {none, warning, critical}.
#[derive(Debug, thiserror::Error)]
#[error("severity must be one of none|warning|critical, got '{0}'")]
pub struct InvalidSeverity(pub String);

impl FromStr for Severity {
    type Err = InvalidSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(InvalidSeverity(other.to_string())),
        }
    }
}

/// One recorded iteration of the judge's action-observation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// 1-based loop iteration.
    pub iteration: u32,

    /// Free-text reasoning extracted from the model turn, if any.
    #[serde(default)]
    pub reasoning: Option<String>,

    /// Action name extracted from the model turn, if any.
    #[serde(default)]
    pub action: Option<String>,

    /// Tool result (or corrective message) recorded for this iteration.
    #[serde(default)]
    pub observation: Option<String>,
}

/// The judgment for one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Name of the check this verdict is about.
    pub check_name: String,

    /// Whether the check output constitutes a problem.
    pub has_problem: bool,

    /// Severity of the problem (always `None` when `has_problem` is false
    /// in practice, but not enforced structurally).
    pub severity: Severity,

    /// Free-text reasoning behind the judgment.
    pub reasoning: String,

    /// Short one-or-two sentence summary.
    pub summary: String,

    /// Ordered loop trace, attached by the iterative judge for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TraceEntry>>,
}

impl Verdict {
    /// Default no-problem verdict with the given reasoning and summary.
    pub fn no_problem(
        check_name: impl Into<String>,
        reasoning: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            check_name: check_name.into(),
            has_problem: false,
            severity: Severity::None,
            reasoning: reasoning.into(),
            summary: summary.into(),
            trace: None,
        }
    }
}

/// One unit of the execution schedule. Immutable once planned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// 1-based ordinal position.
    pub step_id: u32,

    /// Name of the check to run.
    pub check_name: String,

    /// What this step does, for reporting.
    pub description: String,

    /// Parameter bag handed to the check; always includes the subject text
    /// under `"text"`.
    #[serde(default)]
    pub params: CheckOutput,

    /// Ordinals this step depends on. The planner emits a strictly linear
    /// chain: empty for the first step, the previous ordinal otherwise.
    #[serde(default)]
    pub depends_on: Vec<u32>,
}

/// Plan metadata stamped at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub created_at: DateTime<Utc>,

    /// First 100 characters of the subject text.
    pub text_preview: String,

    /// Subject length in characters.
    pub text_length: usize,

    pub step_count: usize,
}

/// The ordered execution schedule for one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub steps: Vec<Step>,
    pub metadata: PlanMetadata,
}

impl Plan {
    /// Look up a step by ordinal.
    pub fn step(&self, step_id: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.step_id == step_id)
    }

    /// Steps sorted by ordinal.
    pub fn execution_order(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.step_id);
        steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }
}

/// A completed step: the step, its raw check output and its verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: Step,
    pub output: CheckOutput,
    pub verdict: Verdict,
    pub executed_at: DateTime<Utc>,
}

/// Overall run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    AllPassed,
    ProblemFound,
}

/// The assembled result of one run. Never mutated after construction.
///
/// Invariant: `status` is `ProblemFound` iff at least one outcome's verdict
/// has the problem flag set (the halting step included, if any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub plan: Plan,
    pub outcomes: Vec<StepOutcome>,
    pub status: RunStatus,

    /// The step at which execution halted early, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halted_at: Option<Step>,
}

impl RunResult {
    pub fn has_problem(&self) -> bool {
        self.status == RunStatus::ProblemFound
    }

    pub fn executed_step_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn total_step_count(&self) -> usize {
        self.plan.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_closed_set_only() {
        assert_eq!("none".parse::<Severity>().unwrap(), Severity::None);
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);

        assert!("minor".parse::<Severity>().is_err());
        assert!("CRITICAL".parse::<Severity>().is_err());
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_orders_by_escalation() {
        assert!(Severity::None < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn severity_serde_round_trip() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::Critical);

        let bad: Result<Severity, _> = serde_json::from_str("\"fatal\"");
        assert!(bad.is_err());
    }

    #[test]
    fn run_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RunStatus::ProblemFound).unwrap(),
            "\"problem_found\""
        );
        assert_eq!(
            serde_json::to_string(&RunStatus::AllPassed).unwrap(),
            "\"all_passed\""
        );
    }

    #[test]
    fn plan_step_lookup_and_order() {
        let mk = |id: u32| Step {
            step_id: id,
            check_name: format!("check_{id}"),
            description: String::new(),
            params: CheckOutput::new(),
            depends_on: vec![],
        };
        let plan = Plan {
            id: Uuid::new_v4(),
            steps: vec![mk(2), mk(1)],
            metadata: PlanMetadata {
                created_at: Utc::now(),
                text_preview: String::new(),
                text_length: 0,
                step_count: 2,
            },
        };

        assert_eq!(plan.step(1).unwrap().check_name, "check_1");
        assert!(plan.step(99).is_none());

        let order = plan.execution_order();
        assert_eq!(order[0].step_id, 1);
        assert_eq!(order[1].step_id, 2);
    }
}
