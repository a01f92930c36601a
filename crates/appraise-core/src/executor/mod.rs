//! Sequential step executor.
//!
//! Walks the plan in ordinal order, invokes each check, asks the judge for a
//! verdict and applies the early-exit policy. Check failures and recoverable
//! judge failures are folded into the result data so one misbehaving step can
//! never crash the pipeline; the only hard failures are an unknown check name
//! at execution time and an unavailable text-generation collaborator.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use crate::errors::{ExecutorError, JudgeError};
use crate::judge::Judge;
use crate::model::{
    CheckOutput, Plan, RunResult, RunStatus, Severity, Step, StepOutcome, Verdict,
};
use crate::registry::CheckRegistry;

pub struct Executor {
    registry: Arc<CheckRegistry>,
    judge: Arc<dyn Judge>,
    early_exit_on_critical: bool,
}

impl Executor {
    pub fn new(
        registry: Arc<CheckRegistry>,
        judge: Arc<dyn Judge>,
        early_exit_on_critical: bool,
    ) -> Self {
        Self {
            registry,
            judge,
            early_exit_on_critical,
        }
    }

    /// Execute the plan and assemble the run result.
    pub async fn execute(&self, plan: &Plan) -> Result<RunResult, ExecutorError> {
        let mut outcomes: Vec<StepOutcome> = Vec::new();
        let mut halted_at: Option<Step> = None;

        let order = plan.execution_order();
        tracing::info!(plan = %plan.id, steps = order.len(), "starting execution");

        for step in order {
            tracing::info!(step = step.step_id, check = %step.check_name, "executing step");
            let outcome = self.run_step(step).await?;
            let verdict = outcome.verdict.clone();
            outcomes.push(outcome);

            tracing::info!(
                step = step.step_id,
                has_problem = verdict.has_problem,
                severity = %verdict.severity,
                "step judged"
            );

            if verdict.has_problem {
                if verdict.severity == Severity::Critical && self.early_exit_on_critical {
                    tracing::warn!(
                        step = step.step_id,
                        check = %step.check_name,
                        "critical problem found, early exit triggered"
                    );
                    halted_at = Some(step.clone());
                    break;
                }
                if verdict.severity == Severity::Warning {
                    // Recorded, never halting.
                    tracing::warn!(step = step.step_id, summary = %verdict.summary, "warning");
                }
            }
        }

        let any_problem = outcomes.iter().any(|o| o.verdict.has_problem);
        let status = if any_problem || halted_at.is_some() {
            RunStatus::ProblemFound
        } else {
            RunStatus::AllPassed
        };

        Ok(RunResult {
            plan: plan.clone(),
            outcomes,
            status,
            halted_at,
        })
    }

    /// Build an ad-hoc one-step plan entry and run it, returning the outcome
    /// directly. Used for isolated testing or manual probing of one check.
    pub async fn run_single(
        &self,
        check_name: &str,
        text: &str,
        params: CheckOutput,
    ) -> Result<StepOutcome, ExecutorError> {
        let mut params = params;
        params.insert("text".into(), json!(text));
        let step = Step {
            step_id: 1,
            check_name: check_name.to_string(),
            description: format!("Execute {check_name}"),
            params,
            depends_on: vec![],
        };
        self.run_step(&step).await
    }

    async fn run_step(&self, step: &Step) -> Result<StepOutcome, ExecutorError> {
        // Unknown check at execution time is a contract violation and a hard
        // failure; planning already skipped unknown names.
        let check = self.registry.lookup(&step.check_name)?;

        let mut params = step.params.clone();
        let text = params
            .remove("text")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let output = match check.run(&text, &params) {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(check = %step.check_name, error = %e, "check execution failed");
                let mut output = CheckOutput::new();
                output.insert("raw_result".into(), Value::Null);
                output.insert("error".into(), json!(e.to_string()));
                output.insert("error_type".into(), json!("check_execution_error"));
                output.insert("success".into(), json!(false));
                output
            }
        };

        let verdict = match self.judge.evaluate(&step.check_name, &output).await {
            Ok(verdict) => verdict,
            // Collaborator unavailability aborts the run; see errors module.
            Err(JudgeError::Llm(e)) => return Err(ExecutorError::Llm(e)),
            Err(e) => {
                tracing::error!(check = %step.check_name, error = %e, "judge evaluation failed");
                // Fail-open: judgment failure must not sink the pipeline.
                Verdict::no_problem(
                    &step.check_name,
                    format!("Judge evaluation failed: {e}"),
                    "Could not evaluate result",
                )
            }
        };

        Ok(StepOutcome {
            step: step.clone(),
            output,
            verdict,
            executed_at: Utc::now(),
        })
    }
}
