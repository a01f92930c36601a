//! Turns an ordered list of check names into an explicit, inspectable plan.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::model::{CheckOutput, ParamOverrides, Plan, PlanMetadata, Step};
use crate::registry::CheckRegistry;

/// Builds execution plans from the configured check order.
pub struct Planner {
    registry: Arc<CheckRegistry>,
    check_order: Vec<String>,
}

impl Planner {
    /// `check_order` of `None` means "every registered check, in registration
    /// order".
    pub fn new(registry: Arc<CheckRegistry>, check_order: Option<Vec<String>>) -> Self {
        let check_order = check_order.unwrap_or_else(|| registry.list());
        Self {
            registry,
            check_order,
        }
    }

    /// Create a plan for `text`.
    ///
    /// Unknown check names are skipped silently. Each step's parameter bag is
    /// the caller override for that check (empty by default) with the subject
    /// text merged in under `"text"`. Steps form a strictly linear dependency
    /// chain and carry 1-based ordinals in the configured order.
    pub fn create_plan(&self, text: &str, overrides: Option<&ParamOverrides>) -> Plan {
        let mut steps = Vec::new();
        let mut ordinal: u32 = 0;

        for name in &self.check_order {
            if !self.registry.contains(name) {
                tracing::warn!(check = %name, "skipping unknown check during planning");
                continue;
            }
            ordinal += 1;

            let mut params: CheckOutput = overrides
                .and_then(|o| o.get(name))
                .cloned()
                .unwrap_or_default();
            params.insert("text".into(), json!(text));

            let description = self
                .registry
                .check_info(name)
                .map(|info| info.description)
                .unwrap_or_else(|_| format!("Execute {name}"));

            steps.push(Step {
                step_id: ordinal,
                check_name: name.clone(),
                description,
                params,
                depends_on: if ordinal > 1 { vec![ordinal - 1] } else { vec![] },
            });
        }

        let text_length = text.chars().count();
        let text_preview: String = if text_length > 100 {
            let head: String = text.chars().take(100).collect();
            format!("{head}...")
        } else {
            text.to_string()
        };

        Plan {
            id: Uuid::new_v4(),
            metadata: PlanMetadata {
                created_at: Utc::now(),
                text_preview,
                text_length,
                step_count: steps.len(),
            },
            steps,
        }
    }

    /// A plan is valid when it has at least one step, every step's check is
    /// registered, and every `depends_on` ordinal resolves within the plan.
    pub fn validate(&self, plan: &Plan) -> bool {
        if plan.steps.is_empty() {
            return false;
        }
        let ids: Vec<u32> = plan.steps.iter().map(|s| s.step_id).collect();
        for step in &plan.steps {
            if !self.registry.contains(&step.check_name) {
                return false;
            }
            if step.depends_on.iter().any(|dep| !ids.contains(dep)) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn planner_with(order: &[&str]) -> Planner {
        let registry = Arc::new(CheckRegistry::with_builtins());
        Planner::new(registry, Some(order.iter().map(|s| s.to_string()).collect()))
    }

    #[test]
    fn plan_assigns_ordinals_in_supplied_order() {
        let planner = planner_with(&["length_check", "keyword_check"]);
        let plan = planner.create_plan("sample text for planning", None);

        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].step_id, 1);
        assert_eq!(plan.steps[0].check_name, "length_check");
        assert_eq!(plan.steps[1].step_id, 2);
        assert_eq!(plan.steps[1].check_name, "keyword_check");
    }

    #[test]
    fn plan_encodes_linear_dependency_chain() {
        let planner = planner_with(&["length_check", "keyword_check"]);
        let plan = planner.create_plan("sample", None);

        assert!(plan.steps[0].depends_on.is_empty());
        assert_eq!(plan.steps[1].depends_on, vec![1]);
    }

    #[test]
    fn plan_skips_unknown_names_silently() {
        let planner = planner_with(&["length_check", "nonexistent", "keyword_check"]);
        let plan = planner.create_plan("sample", None);

        assert_eq!(plan.steps.len(), 2);
        // Ordinals stay dense after the skip.
        assert_eq!(plan.steps[1].step_id, 2);
        assert_eq!(plan.steps[1].check_name, "keyword_check");
    }

    #[test]
    fn plan_merges_subject_text_into_params() {
        let planner = planner_with(&["length_check"]);
        let mut overrides = ParamOverrides::new();
        let mut params = CheckOutput::new();
        params.insert("min_length".into(), json!(5));
        overrides.insert("length_check".into(), params);

        let plan = planner.create_plan("hello", Some(&overrides));
        let step = &plan.steps[0];
        assert_eq!(step.params["text"], json!("hello"));
        assert_eq!(step.params["min_length"], json!(5));
    }

    #[test]
    fn plan_metadata_describes_subject() {
        let planner = planner_with(&["length_check", "keyword_check"]);
        let long_text = "x".repeat(150);
        let plan = planner.create_plan(&long_text, None);

        assert_eq!(plan.metadata.text_length, 150);
        assert_eq!(plan.metadata.step_count, 2);
        assert!(plan.metadata.text_preview.ends_with("..."));
        assert_eq!(plan.metadata.text_preview.chars().count(), 103);
    }

    #[test]
    fn validate_accepts_built_plan() {
        let planner = planner_with(&["length_check", "keyword_check"]);
        let plan = planner.create_plan("sample", None);
        assert!(planner.validate(&plan));
    }

    #[test]
    fn validate_rejects_empty_plan() {
        let planner = planner_with(&["no_such_check"]);
        let plan = planner.create_plan("sample", None);
        assert!(plan.steps.is_empty());
        assert!(!planner.validate(&plan));
    }

    #[test]
    fn validate_rejects_dangling_dependency() {
        let planner = planner_with(&["length_check"]);
        let mut plan = planner.create_plan("sample", None);
        plan.steps[0].depends_on = vec![42];
        assert!(!planner.validate(&plan));
    }

    #[test]
    fn validate_rejects_unknown_check_at_validation_time() {
        let registry = Arc::new(CheckRegistry::with_builtins());
        let planner = Planner::new(registry, None);
        let mut plan = planner.create_plan("sample", None);
        plan.steps[0].check_name = "gone_check".into();
        assert!(!planner.validate(&plan));
    }

    #[test]
    fn default_order_follows_registration_order() {
        let registry = Arc::new(CheckRegistry::with_builtins());
        let planner = Planner::new(registry, None);
        let plan = planner.create_plan("sample", None);
        assert_eq!(plan.steps[0].check_name, "length_check");
        assert_eq!(plan.steps[1].check_name, "keyword_check");
    }
}
