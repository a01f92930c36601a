//! Built-in checks and the check contract.
//!
//! Checks are stateless collaborators: they inspect the subject text and
//! return an open key/value result map that always includes `raw_result`.
//! Invalid configuration is reported through an `error` entry in the result
//! map, not by failing the call; a returned `Err` is folded into the run by
//! the executor.

use serde_json::{json, Value};

use crate::model::CheckOutput;

/// A named, stateless capability that inspects the subject text.
pub trait Check: Send + Sync {
    /// Stable name used for registration, planning and criteria lookup.
    fn name(&self) -> &str;

    /// Human-readable description, surfaced in plans and reports.
    fn description(&self) -> String;

    /// Run the check. `params` carries the step's parameter bag minus the
    /// subject text, and may override the check's configured defaults.
    fn run(&self, text: &str, params: &CheckOutput) -> anyhow::Result<CheckOutput>;
}

impl std::fmt::Debug for dyn Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("name", &self.name()).finish()
    }
}

/// Verifies the subject length falls inside a configured range.
#[derive(Debug, Clone)]
pub struct LengthCheck {
    pub min_length: u64,
    pub max_length: u64,
}

impl Default for LengthCheck {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 10_000,
        }
    }
}

impl Check for LengthCheck {
    fn name(&self) -> &str {
        "length_check"
    }

    fn description(&self) -> String {
        format!(
            "Verify the text length is within {}..={} characters",
            self.min_length, self.max_length
        )
    }

    fn run(&self, text: &str, params: &CheckOutput) -> anyhow::Result<CheckOutput> {
        let min = param_u64(params, "min_length").unwrap_or(self.min_length);
        let max = param_u64(params, "max_length").unwrap_or(self.max_length);

        let mut out = CheckOutput::new();
        if min > max {
            out.insert("raw_result".into(), Value::Null);
            out.insert(
                "error".into(),
                json!(format!("invalid bounds: min {min} > max {max}")),
            );
            return Ok(out);
        }

        let length = text.chars().count() as u64;
        let is_within_range = (min..=max).contains(&length);
        let length_diff = if length < min {
            min - length
        } else if length > max {
            length - max
        } else {
            0
        };

        out.insert("raw_result".into(), json!(length));
        out.insert("is_within_range".into(), json!(is_within_range));
        out.insert("min_length".into(), json!(min));
        out.insert("max_length".into(), json!(max));
        out.insert("length_diff".into(), json!(length_diff));
        Ok(out)
    }
}

/// Searches the subject for forbidden substrings.
#[derive(Debug, Clone)]
pub struct KeywordCheck {
    pub forbidden: Vec<String>,
    pub case_sensitive: bool,
}

impl Default for KeywordCheck {
    fn default() -> Self {
        Self {
            forbidden: ["spam", "scam", "advert", "gambling", "profanity"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            case_sensitive: false,
        }
    }
}

impl Check for KeywordCheck {
    fn name(&self) -> &str {
        "keyword_check"
    }

    fn description(&self) -> String {
        "Verify the text contains no forbidden keywords".to_string()
    }

    fn run(&self, text: &str, params: &CheckOutput) -> anyhow::Result<CheckOutput> {
        let forbidden: Vec<String> = params
            .get("forbidden_keywords")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_else(|| self.forbidden.clone());
        let case_sensitive = params
            .get("case_sensitive")
            .and_then(Value::as_bool)
            .unwrap_or(self.case_sensitive);

        let haystack = if case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };

        let mut found: Vec<String> = Vec::new();
        let mut positions = serde_json::Map::new();
        for keyword in &forbidden {
            let needle = if case_sensitive {
                keyword.clone()
            } else {
                keyword.to_lowercase()
            };
            if needle.is_empty() {
                continue;
            }
            let hits: Vec<usize> = haystack
                .match_indices(&needle)
                .map(|(byte_idx, _)| haystack[..byte_idx].chars().count())
                .collect();
            if !hits.is_empty() {
                found.push(keyword.clone());
                positions.insert(keyword.clone(), json!(hits));
            }
        }

        let mut out = CheckOutput::new();
        out.insert("raw_result".into(), json!(found));
        out.insert("has_forbidden_keywords".into(), json!(!found.is_empty()));
        out.insert("keyword_count".into(), json!(found.len()));
        out.insert("keyword_positions".into(), Value::Object(positions));
        out.insert("checked_keywords".into(), json!(forbidden));
        Ok(out)
    }
}

fn param_u64(params: &CheckOutput, key: &str) -> Option<u64> {
    params.get(key).and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_params() -> CheckOutput {
        CheckOutput::new()
    }

    #[test]
    fn length_within_range_at_exact_bound() {
        let check = LengthCheck::default();
        let out = check.run(&"a".repeat(10), &no_params()).unwrap();
        assert_eq!(out["raw_result"], json!(10));
        assert_eq!(out["is_within_range"], json!(true));
        assert_eq!(out["length_diff"], json!(0));
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let check = LengthCheck::default();
        let out = check.run("짧", &no_params()).unwrap();
        assert_eq!(out["raw_result"], json!(1));
        assert_eq!(out["length_diff"], json!(9));
        assert_eq!(out["is_within_range"], json!(false));
    }

    #[test]
    fn length_params_override_bounds() {
        let check = LengthCheck::default();
        let mut params = CheckOutput::new();
        params.insert("min_length".into(), json!(2));
        params.insert("max_length".into(), json!(3));
        let out = check.run("abcd", &params).unwrap();
        assert_eq!(out["is_within_range"], json!(false));
        assert_eq!(out["length_diff"], json!(1));
    }

    #[test]
    fn length_invalid_bounds_reported_as_error_entry() {
        let check = LengthCheck::default();
        let mut params = CheckOutput::new();
        params.insert("min_length".into(), json!(100));
        params.insert("max_length".into(), json!(10));
        let out = check.run("abc", &params).unwrap();
        assert!(out.contains_key("error"));
        assert_eq!(out["raw_result"], Value::Null);
    }

    #[test]
    fn keyword_reports_matches_and_positions() {
        let check = KeywordCheck {
            forbidden: vec!["spam".into(), "scam".into()],
            case_sensitive: false,
        };
        let out = check.run("This SPAM is pure spam", &no_params()).unwrap();
        assert_eq!(out["raw_result"], json!(["spam"]));
        assert_eq!(out["keyword_count"], json!(1));
        assert_eq!(out["has_forbidden_keywords"], json!(true));
        assert_eq!(out["keyword_positions"]["spam"], json!([5, 18]));
    }

    #[test]
    fn keyword_case_sensitive_mode() {
        let check = KeywordCheck {
            forbidden: vec!["Spam".into()],
            case_sensitive: true,
        };
        let out = check.run("spam spam", &no_params()).unwrap();
        assert_eq!(out["keyword_count"], json!(0));
        assert_eq!(out["has_forbidden_keywords"], json!(false));
    }

    #[test]
    fn keyword_params_override_list() {
        let check = KeywordCheck::default();
        let mut params = CheckOutput::new();
        params.insert("forbidden_keywords".into(), json!(["rust"]));
        let out = check.run("rust is fine here", &params).unwrap();
        assert_eq!(out["raw_result"], json!(["rust"]));
        assert_eq!(out["checked_keywords"], json!(["rust"]));
    }
}
