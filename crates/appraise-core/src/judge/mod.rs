//! Judgment engine: turns a check's raw output into a structured verdict.
//!
//! Two interchangeable implementations share one contract: [`RuleJudge`], a
//! deterministic rule evaluator, and [`ReactJudge`], an iterative model-driven
//! loop. The variant is selected via configuration, not inheritance.

use async_trait::async_trait;

use crate::errors::JudgeError;
use crate::model::{CheckOutput, Verdict};

pub mod parse;
pub mod prompt;
pub mod react;
pub mod rules;
pub mod tools;

pub use parse::{parse_turn, ActionInput, ParsedTurn};
pub use react::ReactJudge;
pub use rules::RuleJudge;
pub use tools::JudgeTools;

/// Judgment contract shared by both variants.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Evaluate one check's raw output.
    ///
    /// An `Err(JudgeError::Llm(_))` means the text-generation collaborator is
    /// unavailable and aborts the step; every other failure mode is recovered
    /// by the executor into a fail-open verdict.
    async fn evaluate(&self, check_name: &str, output: &CheckOutput)
        -> Result<Verdict, JudgeError>;
}
