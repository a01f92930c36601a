//! Tools available to the action-observation loop.
//!
//! Every tool returns its result as observation text; tool-level failures are
//! folded into that text so the loop can relay them to the model instead of
//! aborting.

use std::sync::Arc;

use serde_json::{json, Value};

use super::parse::ActionInput;
use crate::registry::CheckRegistry;

pub const ACTION_GET_CRITERIA: &str = "get_criteria";
pub const ACTION_CHECK_THRESHOLD: &str = "check_threshold";
pub const ACTION_CALCULATE_PERCENTAGE: &str = "calculate_percentage";
pub const ACTION_SUBMIT_JUDGMENT: &str = "submit_judgment";

/// Valid action names, in the order they are described to the model.
pub const VALID_ACTIONS: [&str; 4] = [
    ACTION_GET_CRITERIA,
    ACTION_CHECK_THRESHOLD,
    ACTION_CALCULATE_PERCENTAGE,
    ACTION_SUBMIT_JUDGMENT,
];

/// Tool dispatch for the judge loop.
pub struct JudgeTools {
    registry: Arc<CheckRegistry>,
}

impl JudgeTools {
    pub fn new(registry: Arc<CheckRegistry>) -> Self {
        Self { registry }
    }

    /// Execute `action` and return the observation text.
    ///
    /// `check_name` is the check under evaluation, pinned by the loop's fixed
    /// context: `get_criteria` ignores the model-supplied argument so the
    /// model cannot fetch an unrelated document.
    pub fn execute(&self, action: &str, input: Option<&ActionInput>, check_name: &str) -> String {
        match action {
            ACTION_GET_CRITERIA => self.get_criteria(check_name),
            ACTION_CHECK_THRESHOLD => match input.and_then(ActionInput::as_object) {
                Some(obj) => check_threshold(obj),
                None => "Error: check_threshold requires JSON input".to_string(),
            },
            ACTION_CALCULATE_PERCENTAGE => match input.and_then(ActionInput::as_object) {
                Some(obj) => calculate_percentage(obj),
                None => "Error: calculate_percentage requires JSON input".to_string(),
            },
            ACTION_SUBMIT_JUDGMENT => {
                // Terminal action; the loop intercepts it before dispatch.
                "Judgment recorded".to_string()
            }
            unknown => format!(
                "Error: Unknown tool '{unknown}'. Available tools: {}",
                VALID_ACTIONS.join(", ")
            ),
        }
    }

    fn get_criteria(&self, check_name: &str) -> String {
        match self.registry.criteria_for(check_name) {
            Ok(doc) => format!("Criteria document loaded:\n\n{doc}"),
            Err(e) => format!("Error loading criteria: {e}"),
        }
    }
}

/// Numeric field from a tool argument; accepts numbers and numeric strings.
fn num(obj: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn check_threshold(obj: &serde_json::Map<String, Value>) -> String {
    let value = num(obj, "value").unwrap_or(0.0);
    let threshold = num(obj, "threshold").unwrap_or(0.0);
    let operator = obj
        .get("operator")
        .and_then(Value::as_str)
        .unwrap_or("gte");

    let (result, symbol) = match operator {
        "gt" => (value > threshold, ">"),
        "gte" => (value >= threshold, ">="),
        "lt" => (value < threshold, "<"),
        "lte" => (value <= threshold, "<="),
        "eq" => ((value - threshold).abs() < f64::EPSILON, "=="),
        other => {
            return format!("Error: Unknown operator '{other}'. Use: gt, gte, lt, lte, eq");
        }
    };

    json!({
        "result": result,
        "comparison": format!("{value} {symbol} {threshold} = {result}"),
    })
    .to_string()
}

fn calculate_percentage(obj: &serde_json::Map<String, Value>) -> String {
    let value = num(obj, "value").unwrap_or(0.0);
    let total = num(obj, "total").unwrap_or(1.0);

    if total == 0.0 {
        return json!({ "error": "Cannot divide by zero" }).to_string();
    }

    let percentage = (value / total) * 100.0;
    let rounded = (percentage * 100.0).round() / 100.0;
    json!({
        "percentage": rounded,
        "calculation": format!("{value} / {total} * 100 = {percentage:.2}%"),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> JudgeTools {
        JudgeTools::new(Arc::new(CheckRegistry::with_builtins()))
    }

    fn json_input(v: Value) -> ActionInput {
        ActionInput::Json(v)
    }

    #[test]
    fn get_criteria_uses_loop_context_not_model_argument() {
        let tools = tools();
        // Model asks for an unrelated document; the pinned check name wins.
        let input = json_input(json!("keyword_check"));
        let obs = tools.execute(ACTION_GET_CRITERIA, Some(&input), "length_check");
        assert!(obs.contains("Criteria document loaded"));
        assert!(obs.contains("length_check"));
    }

    #[test]
    fn get_criteria_missing_document_is_observation_text() {
        let tools = JudgeTools::new(Arc::new(CheckRegistry::new()));
        let obs = tools.execute(ACTION_GET_CRITERIA, None, "length_check");
        assert!(obs.starts_with("Error loading criteria"));
    }

    #[test]
    fn check_threshold_operators() {
        let tools = tools();
        for (op, expected) in [("gt", false), ("gte", true), ("lte", true), ("eq", true)] {
            let input = json_input(json!({"value": 10, "threshold": 10, "operator": op}));
            let obs = tools.execute(ACTION_CHECK_THRESHOLD, Some(&input), "length_check");
            let parsed: Value = serde_json::from_str(&obs).unwrap();
            assert_eq!(parsed["result"], json!(expected), "operator {op}");
        }
        let input = json_input(json!({"value": 1, "threshold": 10, "operator": "lt"}));
        let obs = tools.execute(ACTION_CHECK_THRESHOLD, Some(&input), "length_check");
        let parsed: Value = serde_json::from_str(&obs).unwrap();
        assert_eq!(parsed["result"], json!(true));
        assert!(parsed["comparison"].as_str().unwrap().contains("<"));
    }

    #[test]
    fn check_threshold_accepts_numeric_strings() {
        let tools = tools();
        let input = json_input(json!({"value": "9", "threshold": "10", "operator": "lt"}));
        let obs = tools.execute(ACTION_CHECK_THRESHOLD, Some(&input), "length_check");
        let parsed: Value = serde_json::from_str(&obs).unwrap();
        assert_eq!(parsed["result"], json!(true));
    }

    #[test]
    fn check_threshold_unknown_operator() {
        let tools = tools();
        let input = json_input(json!({"value": 1, "threshold": 2, "operator": "between"}));
        let obs = tools.execute(ACTION_CHECK_THRESHOLD, Some(&input), "length_check");
        assert!(obs.contains("Unknown operator 'between'"));
    }

    #[test]
    fn check_threshold_requires_structured_input() {
        let tools = tools();
        let input = ActionInput::Text("9 < 10".into());
        let obs = tools.execute(ACTION_CHECK_THRESHOLD, Some(&input), "length_check");
        assert!(obs.contains("requires JSON input"));
    }

    #[test]
    fn calculate_percentage_rounds_to_two_decimals() {
        let tools = tools();
        let input = json_input(json!({"value": 1, "total": 3}));
        let obs = tools.execute(ACTION_CALCULATE_PERCENTAGE, Some(&input), "length_check");
        let parsed: Value = serde_json::from_str(&obs).unwrap();
        assert_eq!(parsed["percentage"], json!(33.33));
    }

    #[test]
    fn calculate_percentage_zero_total_is_error_payload() {
        let tools = tools();
        let input = json_input(json!({"value": 5, "total": 0}));
        let obs = tools.execute(ACTION_CALCULATE_PERCENTAGE, Some(&input), "length_check");
        let parsed: Value = serde_json::from_str(&obs).unwrap();
        assert_eq!(parsed["error"], json!("Cannot divide by zero"));
    }

    #[test]
    fn unknown_action_lists_valid_names() {
        let tools = tools();
        let obs = tools.execute("fetch_web_page", None, "length_check");
        assert!(obs.contains("Unknown tool 'fetch_web_page'"));
        for name in VALID_ACTIONS {
            assert!(obs.contains(name));
        }
    }
}
