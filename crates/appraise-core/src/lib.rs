//! Plan-and-execute text evaluation with a judged verdict per step.
//!
//! The pipeline walks an ordered plan of checks over a subject text. After each
//! check runs, a judge decides whether the check's raw output constitutes a
//! problem and how severe it is. A critical verdict can halt the run early;
//! warnings are recorded and execution continues.
//!
//! Two judge variants share one contract:
//!
//! - [`judge::RuleJudge`] — deterministic, no I/O, never fails. Used for fast
//!   reproducible runs and as the reference implementation in tests.
//! - [`judge::ReactJudge`] — a bounded action-observation loop driven by an
//!   LLM: the model proposes an action, a tool executes it, the observation is
//!   fed back, capped at a fixed iteration budget.
//!
//! # Quick Start
//!
//! ```no_run
//! use appraise_core::{Analyzer, AppraiseConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let analyzer = Analyzer::new(AppraiseConfig::default())?;
//! let run = analyzer.analyze("text under evaluation", None).await?;
//! println!("{}", appraise_core::report::render_markdown(&run));
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod checks;
pub mod config;
pub mod errors;
pub mod executor;
pub mod judge;
pub mod model;
pub mod planner;
pub mod providers;
pub mod registry;
pub mod report;

// Re-export main types
pub use analyzer::Analyzer;
pub use config::{AppraiseConfig, JudgeKind, LlmSettings};
pub use errors::{ConfigError, ExecutorError, JudgeError, LlmError, RegistryError};
pub use executor::Executor;
pub use judge::{Judge, ReactJudge, RuleJudge};
pub use model::{
    CheckOutput, Plan, PlanMetadata, RunResult, RunStatus, Severity, Step, StepOutcome,
    TraceEntry, Verdict,
};
pub use planner::Planner;
pub use providers::llm::{ChatMessage, LlmClient, LlmResponse, Role};
pub use registry::CheckRegistry;
