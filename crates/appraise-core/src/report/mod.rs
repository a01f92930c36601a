//! Markdown report rendering over a completed run.

use std::path::Path;

use chrono::Utc;

use crate::model::{RunResult, RunStatus, Severity};

/// Format a completed run as a markdown document.
pub fn render_markdown(run: &RunResult) -> String {
    let mut md = String::new();

    let status_icon = match run.status {
        RunStatus::AllPassed => "✅",
        RunStatus::ProblemFound => "❌",
    };

    md.push_str(&format!("# Text Analysis Report {status_icon}\n\n"));
    md.push_str(&format!(
        "Generated: {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let problems = run
        .outcomes
        .iter()
        .filter(|o| o.verdict.has_problem)
        .count();
    let critical = run
        .outcomes
        .iter()
        .filter(|o| o.verdict.severity == Severity::Critical)
        .count();
    let warnings = run
        .outcomes
        .iter()
        .filter(|o| o.verdict.severity == Severity::Warning)
        .count();

    md.push_str("## Summary\n\n");
    md.push_str("| Problems | Critical | Warnings |\n");
    md.push_str("|----------|----------|----------|\n");
    md.push_str(&format!("| {problems} | {critical} | {warnings} |\n\n"));

    md.push_str("## Execution\n\n");
    md.push_str(&format!(
        "- **Plan:** `{}` ({} characters analyzed)\n",
        run.plan.id, run.plan.metadata.text_length
    ));
    md.push_str(&format!(
        "- **Steps executed:** {} of {}\n",
        run.executed_step_count(),
        run.total_step_count()
    ));
    md.push_str(&format!(
        "- **Status:** {}\n",
        match run.status {
            RunStatus::AllPassed => "all_passed",
            RunStatus::ProblemFound => "problem_found",
        }
    ));
    if let Some(halted) = &run.halted_at {
        md.push_str(&format!(
            "- **Halted early** at step {} (`{}`) on a critical verdict\n",
            halted.step_id, halted.check_name
        ));
    }
    md.push('\n');

    md.push_str("## Steps\n\n");
    for outcome in &run.outcomes {
        let icon = severity_icon(outcome.verdict.severity);
        md.push_str(&format!(
            "### Step {}: `{}` {}\n\n",
            outcome.step.step_id, outcome.step.check_name, icon
        ));
        md.push_str(&format!("{}\n\n", outcome.step.description));
        md.push_str(&format!(
            "- **Severity:** {}\n- **Summary:** {}\n\n",
            outcome.verdict.severity, outcome.verdict.summary
        ));

        md.push_str("> ");
        md.push_str(&outcome.verdict.reasoning.replace('\n', "\n> "));
        md.push_str("\n\n");

        if let Some(trace) = &outcome.verdict.trace {
            md.push_str("<details>\n<summary>Evaluation trace</summary>\n\n");
            for entry in trace {
                md.push_str(&format!("**Iteration {}**\n\n", entry.iteration));
                if let Some(reasoning) = &entry.reasoning {
                    md.push_str(&format!("- Thought: {reasoning}\n"));
                }
                if let Some(action) = &entry.action {
                    md.push_str(&format!("- Action: `{action}`\n"));
                }
                if let Some(observation) = &entry.observation {
                    md.push_str(&format!("- Observation: {observation}\n"));
                }
                md.push('\n');
            }
            md.push_str("</details>\n\n");
        }

        md.push_str("<details>\n<summary>Raw check output</summary>\n\n");
        md.push_str("```json\n");
        md.push_str(
            &serde_json::to_string_pretty(&outcome.output)
                .unwrap_or_else(|_| "{}".to_string()),
        );
        md.push_str("\n```\n\n</details>\n\n");
    }

    md.push_str("## Conclusion\n\n");
    match run.status {
        RunStatus::AllPassed => {
            md.push_str("All checks passed. No problems were detected in the text.\n");
        }
        RunStatus::ProblemFound => {
            md.push_str(&format!(
                "{problems} problem(s) detected ({critical} critical, {warnings} warning). \
                 Review the step details above.\n"
            ));
        }
    }

    md
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::None => "✅",
        Severity::Warning => "⚠️",
        Severity::Critical => "❌",
    }
}

/// Render and write the report to `path`.
pub fn write_report(run: &RunResult, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, render_markdown(run))
}

/// Plaintext dump of the judge loop traces, one block per step that has one.
pub fn render_trace(run: &RunResult) -> String {
    let mut out = String::new();
    for outcome in &run.outcomes {
        let Some(trace) = &outcome.verdict.trace else {
            continue;
        };
        out.push_str(&format!(
            "=== Step {} ({}) ===\n",
            outcome.step.step_id, outcome.step.check_name
        ));
        for entry in trace {
            out.push_str(&format!("[{}]", entry.iteration));
            if let Some(reasoning) = &entry.reasoning {
                out.push_str(&format!(" Thought: {reasoning}"));
            }
            if let Some(action) = &entry.action {
                out.push_str(&format!(" Action: {action}"));
            }
            out.push('\n');
            if let Some(observation) = &entry.observation {
                out.push_str(&format!("    Observation: {observation}\n"));
            }
        }
        out.push('\n');
    }
    out
}

/// Render and write the loop traces to `path`.
pub fn write_trace(run: &RunResult, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, render_trace(run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::RuleJudge;
    use crate::model::RunStatus;
    use crate::planner::Planner;
    use crate::registry::CheckRegistry;
    use crate::Executor;
    use std::sync::Arc;

    async fn run_on(text: &str) -> RunResult {
        let registry = Arc::new(CheckRegistry::with_builtins());
        let plan = Planner::new(registry.clone(), None).create_plan(text, None);
        Executor::new(registry, Arc::new(RuleJudge), true)
            .execute(&plan)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn clean_run_renders_pass_report() {
        let run = run_on(&"a".repeat(50)).await;
        let md = render_markdown(&run);
        assert!(md.starts_with("# Text Analysis Report ✅"));
        assert!(md.contains("| 0 | 0 | 0 |"));
        assert!(md.contains("All checks passed"));
        assert!(md.contains("### Step 1: `keyword_check`") || md.contains("### Step 1: `length_check`"));
    }

    #[tokio::test]
    async fn halted_run_reports_early_exit() {
        let run = run_on("짧").await;
        let md = render_markdown(&run);
        assert_eq!(run.status, RunStatus::ProblemFound);
        assert!(md.contains("**Halted early** at step 1"));
        assert!(md.contains("problem(s) detected"));
    }

    #[tokio::test]
    async fn raw_output_is_embedded_as_json() {
        let run = run_on(&"a".repeat(50)).await;
        let md = render_markdown(&run);
        assert!(md.contains("```json"));
        assert!(md.contains("\"raw_result\""));
    }

    #[tokio::test]
    async fn render_trace_dumps_loop_iterations() {
        let mut run = run_on(&"a".repeat(50)).await;
        run.outcomes[0].verdict.trace = Some(vec![crate::model::TraceEntry {
            iteration: 1,
            reasoning: Some("compare against the minimum".into()),
            action: Some("check_threshold".into()),
            observation: Some("{\"result\": true}".into()),
        }]);

        let dump = render_trace(&run);
        assert!(dump.contains("=== Step 1"));
        assert!(dump.contains("Action: check_threshold"));
        assert!(dump.contains("Observation: {\"result\": true}"));
        // Steps without a trace are skipped.
        assert!(!dump.contains("=== Step 2"));
    }

    #[tokio::test]
    async fn write_report_creates_the_file() {
        let run = run_on(&"a".repeat(50)).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report(&run, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Text Analysis Report"));
    }
}
