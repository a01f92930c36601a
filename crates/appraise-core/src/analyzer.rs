//! High-level facade assembling the whole pipeline from a config.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::config::{AppraiseConfig, JudgeKind};
use crate::errors::ExecutorError;
use crate::executor::Executor;
use crate::judge::{Judge, ReactJudge, RuleJudge};
use crate::model::{ParamOverrides, RunResult};
use crate::planner::Planner;
use crate::providers::llm::OpenAiClient;
use crate::registry::CheckRegistry;

pub struct Analyzer {
    registry: Arc<CheckRegistry>,
    planner: Planner,
    executor: Executor,
    overrides: ParamOverrides,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Assemble registry, planner, judge and executor from the config.
    ///
    /// Fails when the react judge is requested without an API key or with an
    /// unsupported provider; every other setting has a working default.
    pub fn new(config: AppraiseConfig) -> Result<Self> {
        let mut registry = CheckRegistry::with_builtins();
        if let Some(dir) = &config.criteria_dir {
            registry.set_criteria_dir(dir.clone());
        }
        let registry = Arc::new(registry);

        let judge: Arc<dyn Judge> = match config.judge {
            JudgeKind::Rules => Arc::new(RuleJudge),
            JudgeKind::React => {
                if config.llm.provider != "openai" {
                    bail!(
                        "unsupported LLM provider '{}'; only 'openai' is supported",
                        config.llm.provider
                    );
                }
                let Some(api_key) = config.llm.api_key.clone() else {
                    bail!(
                        "react judge requires an API key; set OPENAI_API_KEY \
                         or llm.api_key in the config"
                    );
                };
                let client = OpenAiClient::new(
                    config.llm.model.clone(),
                    api_key,
                    config.llm.temperature as f32,
                    config.llm.timeout(),
                );
                Arc::new(ReactJudge::new(registry.clone(), Arc::new(client)))
            }
        };

        let planner = Planner::new(registry.clone(), Some(config.check_order.clone()));
        let executor = Executor::new(registry.clone(), judge, config.early_exit_on_critical);

        Ok(Self {
            registry,
            planner,
            executor,
            overrides: config.overrides,
        })
    }

    /// Plan and execute a full analysis of `text`.
    ///
    /// `overrides` merge over the config-level overrides, per check.
    pub async fn analyze(
        &self,
        text: &str,
        overrides: Option<&ParamOverrides>,
    ) -> Result<RunResult, ExecutorError> {
        let merged = match overrides {
            Some(extra) => {
                let mut merged = self.overrides.clone();
                for (check, params) in extra {
                    merged
                        .entry(check.clone())
                        .or_default()
                        .extend(params.clone());
                }
                Some(merged)
            }
            None if self.overrides.is_empty() => None,
            None => Some(self.overrides.clone()),
        };

        let plan = self.planner.create_plan(text, merged.as_ref());
        tracing::debug!(plan = %plan.id, steps = plan.total_steps(), "plan created");
        self.executor.execute(&plan).await
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }
}
