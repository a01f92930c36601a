//! Iterative model-driven judge: the bounded action-observation loop.
//!
//! Each iteration submits the accumulated conversation to the text-generation
//! collaborator, parses the reply into a reasoning/action/argument triple,
//! dispatches the action to a tool and feeds the observation back. The loop
//! ends on a structured `submit_judgment` or when the iteration budget runs
//! out, whichever comes first.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::parse::{parse_turn, ActionInput, ParsedTurn};
use super::prompt::{evaluation_prompt, MALFORMED_SUBMISSION, NUDGE, SYSTEM_PROMPT};
use super::tools::{JudgeTools, ACTION_SUBMIT_JUDGMENT};
use super::Judge;
use crate::errors::JudgeError;
use crate::model::{CheckOutput, Severity, TraceEntry, Verdict};
use crate::providers::llm::{ChatMessage, LlmClient};
use crate::registry::CheckRegistry;

/// Iteration budget guarding against a loop that never submits.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Observations are truncated to this many characters in the trace.
const TRACE_OBSERVATION_LIMIT: usize = 200;

pub struct ReactJudge {
    client: Arc<dyn LlmClient>,
    tools: JudgeTools,
    max_iterations: u32,
}

impl ReactJudge {
    pub fn new(registry: Arc<CheckRegistry>, client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            tools: JudgeTools::new(registry),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    fn verdict_from_submission(
        &self,
        check_name: &str,
        obj: &serde_json::Map<String, Value>,
        iterations: u32,
        trace: Vec<TraceEntry>,
    ) -> Result<Verdict, JudgeError> {
        let severity_str = obj
            .get("severity")
            .and_then(Value::as_str)
            .unwrap_or("none");
        let severity: Severity =
            severity_str
                .parse()
                .map_err(|e: crate::model::InvalidSeverity| JudgeError::Evaluation {
                    check: check_name.to_string(),
                    message: e.to_string(),
                })?;

        let reasoning = obj
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(Verdict {
            check_name: check_name.to_string(),
            has_problem: obj
                .get("has_problem")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            severity,
            reasoning: format!("{reasoning}\n\n[loop trace: {iterations} iterations]"),
            summary: obj
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            trace: Some(trace),
        })
    }

    fn fallback_verdict(&self, check_name: &str, trace: Vec<TraceEntry>) -> Verdict {
        tracing::warn!(
            check = check_name,
            max_iterations = self.max_iterations,
            "iteration budget exhausted without a submitted judgment"
        );
        let tail: Vec<String> = trace
            .iter()
            .rev()
            .take(10)
            .rev()
            .map(|entry| {
                format!(
                    "[{}] reasoning={} action={} observation={}",
                    entry.iteration,
                    entry.reasoning.as_deref().unwrap_or("-"),
                    entry.action.as_deref().unwrap_or("-"),
                    entry.observation.as_deref().unwrap_or("-"),
                )
            })
            .collect();

        Verdict {
            check_name: check_name.to_string(),
            has_problem: false,
            severity: Severity::None,
            reasoning: format!("Evaluation loop did not complete. Trace:\n{}", tail.join("\n")),
            summary: "Evaluation incomplete - max iterations reached".to_string(),
            trace: Some(trace),
        }
    }
}

#[async_trait]
impl Judge for ReactJudge {
    async fn evaluate(
        &self,
        check_name: &str,
        output: &CheckOutput,
    ) -> Result<Verdict, JudgeError> {
        let output_json = serde_json::to_string_pretty(&Value::Object(output.clone()))
            .unwrap_or_else(|_| "{}".to_string());

        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(evaluation_prompt(check_name, &output_json)),
        ];
        let mut trace: Vec<TraceEntry> = Vec::new();

        tracing::info!(check = check_name, "starting judge loop");

        for iteration in 1..=self.max_iterations {
            // Collaborator failure aborts the step: no safe default verdict
            // can be inferred from total model unavailability.
            let response = self.client.complete(&messages).await?;
            let turn = parse_turn(&response.text);
            tracing::debug!(check = check_name, iteration, ?turn, "parsed model turn");

            match turn {
                ParsedTurn::NoAction { reasoning } => {
                    trace.push(TraceEntry {
                        iteration,
                        reasoning,
                        action: None,
                        observation: Some(NUDGE.to_string()),
                    });
                    messages.push(ChatMessage::assistant(response.text));
                    messages.push(ChatMessage::user(NUDGE));
                }
                ParsedTurn::Action {
                    reasoning,
                    name,
                    input,
                } if name == ACTION_SUBMIT_JUDGMENT => {
                    if let Some(obj) = input.as_ref().and_then(ActionInput::as_object) {
                        trace.push(TraceEntry {
                            iteration,
                            reasoning,
                            action: Some(name.clone()),
                            observation: None,
                        });
                        tracing::info!(check = check_name, iteration, "judgment submitted");
                        return self.verdict_from_submission(check_name, obj, iteration, trace);
                    }
                    // Non-structured argument: correct and keep looping.
                    trace.push(TraceEntry {
                        iteration,
                        reasoning,
                        action: Some(name),
                        observation: Some(MALFORMED_SUBMISSION.to_string()),
                    });
                    messages.push(ChatMessage::assistant(response.text));
                    messages.push(ChatMessage::user(MALFORMED_SUBMISSION));
                }
                ParsedTurn::Action {
                    reasoning,
                    name,
                    input,
                } => {
                    let observation = self.tools.execute(&name, input.as_ref(), check_name);
                    trace.push(TraceEntry {
                        iteration,
                        reasoning,
                        action: Some(name),
                        observation: Some(truncate(&observation, TRACE_OBSERVATION_LIMIT)),
                    });
                    messages.push(ChatMessage::assistant(response.text));
                    messages.push(ChatMessage::user(format!("Observation: {observation}")));
                }
            }
        }

        Ok(self.fallback_verdict(check_name, trace))
    }
}

fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        let head: String = s.chars().take(limit).collect();
        format!("{head}...")
    }
}
