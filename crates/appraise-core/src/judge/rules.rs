//! Deterministic rule-based judge.
//!
//! Fast, reproducible stand-in for the model-driven variant and the reference
//! implementation for testing the executor in isolation. Performs no I/O and
//! never fails; the recorded reasoning mirrors the thought/action/observation
//! shape of the iterative loop so reports stay uniform.

use async_trait::async_trait;
use serde_json::Value;

use super::Judge;
use crate::errors::JudgeError;
use crate::model::{CheckOutput, Severity, Verdict};

/// Fraction of `min_length` under which a length deviation is only a warning.
const LENGTH_WARNING_FRACTION: f64 = 0.10;

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleJudge;

#[async_trait]
impl Judge for RuleJudge {
    async fn evaluate(
        &self,
        check_name: &str,
        output: &CheckOutput,
    ) -> Result<Verdict, JudgeError> {
        let mut trace = vec![
            format!("Thought: I need to evaluate the {check_name} result"),
            "Action: get_criteria".to_string(),
            format!("Observation: Loaded criteria for {check_name}"),
        ];

        let verdict = match check_name {
            "length_check" => evaluate_length(output, &mut trace),
            "keyword_check" => evaluate_keywords(output, &mut trace),
            _ => Verdict::no_problem(
                check_name,
                format!(
                    "Unknown check, assuming no problem\n\n{}",
                    trace.join("\n")
                ),
                "No issues detected",
            ),
        };
        Ok(verdict)
    }
}

fn evaluate_length(output: &CheckOutput, trace: &mut Vec<String>) -> Verdict {
    let is_within_range = output
        .get("is_within_range")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let length_diff = num(output, "length_diff").unwrap_or(0.0);
    let min_length = num(output, "min_length").unwrap_or(10.0);
    let max_length = num(output, "max_length").unwrap_or(10_000.0);
    let length = num(output, "raw_result").unwrap_or(0.0);

    trace.push(format!(
        "Thought: Check if text length {length} is within range"
    ));
    trace.push("Action: check_threshold".to_string());
    trace.push(format!("Observation: is_within_range = {is_within_range}"));

    if is_within_range {
        trace.push("Thought: Text length is acceptable, submitting judgment".to_string());
        trace.push("Action: submit_judgment".to_string());
        return Verdict::no_problem(
            "length_check",
            format!(
                "Text length ({length}) is within the allowed range \
                 ({min_length}-{max_length}).\n\n{}",
                trace.join("\n")
            ),
            "Text length is acceptable.",
        );
    }

    trace.push("Thought: Length is outside range, calculating severity".to_string());
    trace.push("Action: calculate_percentage".to_string());
    let diff_percentage = if min_length > 0.0 {
        (length_diff / min_length) * 100.0
    } else {
        0.0
    };
    trace.push(format!(
        "Observation: Difference is {diff_percentage:.1}% of minimum"
    ));

    let (severity, reasoning) = if length_diff <= min_length * LENGTH_WARNING_FRACTION {
        (
            Severity::Warning,
            format!(
                "Text length ({length}) is slightly outside the allowed range \
                 ({min_length}-{max_length}). Difference: {length_diff} characters \
                 ({diff_percentage:.1}%)."
            ),
        )
    } else {
        (
            Severity::Critical,
            format!(
                "Text length ({length}) is significantly outside the allowed range \
                 ({min_length}-{max_length}). Difference: {length_diff} characters \
                 ({diff_percentage:.1}% > 10% threshold)."
            ),
        )
    };

    trace.push(format!("Thought: Severity determined as {severity}"));
    trace.push("Action: submit_judgment".to_string());

    let direction = if length < min_length { "below" } else { "above" };
    Verdict {
        check_name: "length_check".to_string(),
        has_problem: true,
        severity,
        reasoning: format!("{reasoning}\n\n{}", trace.join("\n")),
        summary: format!("Text length issue: {length_diff} characters {direction} limit."),
        trace: None,
    }
}

fn evaluate_keywords(output: &CheckOutput, trace: &mut Vec<String>) -> Verdict {
    let has_forbidden = output
        .get("has_forbidden_keywords")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let keyword_count = num(output, "keyword_count").unwrap_or(0.0) as u64;
    let found: Vec<String> = output
        .get("raw_result")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    trace.push("Thought: Check if any forbidden keywords were found".to_string());
    trace.push("Action: check_threshold".to_string());
    trace.push(format!(
        "Observation: has_forbidden_keywords = {has_forbidden}, count = {keyword_count}"
    ));

    if !has_forbidden {
        trace.push("Thought: No forbidden keywords, submitting clean judgment".to_string());
        trace.push("Action: submit_judgment".to_string());
        return Verdict::no_problem(
            "keyword_check",
            format!(
                "No forbidden keywords were found in the text.\n\n{}",
                trace.join("\n")
            ),
            "No forbidden keywords detected.",
        );
    }

    trace.push(format!(
        "Thought: Found {keyword_count} forbidden keywords, determining severity"
    ));

    let (severity, reasoning) = if keyword_count == 1 {
        (
            Severity::Warning,
            format!(
                "Found 1 forbidden keyword: '{}'. This may be a minor issue.",
                found.first().map(String::as_str).unwrap_or("")
            ),
        )
    } else {
        (
            Severity::Critical,
            format!(
                "Found {keyword_count} forbidden keywords: {}. Multiple violations detected.",
                found.join(", ")
            ),
        )
    };

    trace.push(format!(
        "Thought: Severity is {severity} based on keyword count"
    ));
    trace.push("Action: submit_judgment".to_string());

    Verdict {
        check_name: "keyword_check".to_string(),
        has_problem: true,
        severity,
        reasoning: format!("{reasoning}\n\n{}", trace.join("\n")),
        summary: format!(
            "Found {keyword_count} forbidden keyword(s): {}",
            found.join(", ")
        ),
        trace: None,
    }
}

fn num(output: &CheckOutput, key: &str) -> Option<f64> {
    output.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{Check, KeywordCheck, LengthCheck};
    use serde_json::json;

    async fn judge_length(text: &str) -> Verdict {
        let output = LengthCheck::default()
            .run(text, &CheckOutput::new())
            .unwrap();
        RuleJudge.evaluate("length_check", &output).await.unwrap()
    }

    #[tokio::test]
    async fn length_within_range_is_clean() {
        let verdict = judge_length(&"a".repeat(50)).await;
        assert!(!verdict.has_problem);
        assert_eq!(verdict.severity, Severity::None);
    }

    #[tokio::test]
    async fn length_at_exact_bound_is_within_range() {
        let verdict = judge_length(&"a".repeat(10)).await;
        assert!(!verdict.has_problem);
        assert_eq!(verdict.severity, Severity::None);
    }

    #[tokio::test]
    async fn one_char_below_minimum_is_warning() {
        // diff = 1, 10% of min 10 is 1.0, 1 <= 1.0
        let verdict = judge_length(&"a".repeat(9)).await;
        assert!(verdict.has_problem);
        assert_eq!(verdict.severity, Severity::Warning);
    }

    #[tokio::test]
    async fn two_chars_below_minimum_is_critical() {
        let verdict = judge_length(&"a".repeat(8)).await;
        assert!(verdict.has_problem);
        assert_eq!(verdict.severity, Severity::Critical);
    }

    async fn judge_keywords(text: &str, forbidden: &[&str]) -> Verdict {
        let check = KeywordCheck {
            forbidden: forbidden.iter().map(|s| s.to_string()).collect(),
            case_sensitive: false,
        };
        let output = check.run(text, &CheckOutput::new()).unwrap();
        RuleJudge.evaluate("keyword_check", &output).await.unwrap()
    }

    #[tokio::test]
    async fn zero_keyword_matches_is_clean() {
        let verdict = judge_keywords("perfectly ordinary text", &["spam", "scam"]).await;
        assert!(!verdict.has_problem);
        assert_eq!(verdict.severity, Severity::None);
    }

    #[tokio::test]
    async fn one_keyword_match_is_warning() {
        let verdict = judge_keywords("a little spam here", &["spam", "scam"]).await;
        assert!(verdict.has_problem);
        assert_eq!(verdict.severity, Severity::Warning);
        assert!(verdict.summary.contains("spam"));
    }

    #[tokio::test]
    async fn two_keyword_matches_are_critical() {
        let verdict = judge_keywords("spam and a scam", &["spam", "scam"]).await;
        assert!(verdict.has_problem);
        assert_eq!(verdict.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn unknown_check_gets_default_clean_verdict() {
        let mut output = CheckOutput::new();
        output.insert("raw_result".into(), json!(123));
        let verdict = RuleJudge.evaluate("entropy_check", &output).await.unwrap();
        assert!(!verdict.has_problem);
        assert_eq!(verdict.severity, Severity::None);
        assert!(verdict.reasoning.contains("Unknown check"));
    }

    #[tokio::test]
    async fn reasoning_carries_simulated_loop_trace() {
        let verdict = judge_length(&"a".repeat(9)).await;
        assert!(verdict.reasoning.contains("Action: get_criteria"));
        assert!(verdict.reasoning.contains("Action: submit_judgment"));
    }
}
