//! Parser for the model's free-text Thought/Action/Action Input turns.
//!
//! Pure function over untrusted, semi-structured input: malformed or partial
//! text is never an error. A turn with no recognizable action is a normal
//! outcome the loop answers with a nudge.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Prose after "Thought:" up to the next "Action:" or end of text.
    static ref THOUGHT: Regex = Regex::new(r"(?s)Thought:\s*(.+?)\s*(?:Action:|$)").unwrap();
    /// Bare identifier after "Action:".
    static ref ACTION: Regex = Regex::new(r"Action:\s*(\w+)").unwrap();
    /// Payload after "Action Input:" up to the next section or end of text.
    static ref ACTION_INPUT: Regex =
        Regex::new(r"(?s)Action Input:\s*(.+?)\s*(?:Thought:|Observation:|$)").unwrap();
}

/// Action argument: structured when it parses as JSON, opaque text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionInput {
    Json(serde_json::Value),
    Text(String),
}

impl ActionInput {
    /// The argument as a JSON object, if it is one.
    pub fn as_object(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Self::Json(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Result of parsing one model turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTurn {
    /// The turn named an action (possibly with reasoning and an argument).
    Action {
        reasoning: Option<String>,
        name: String,
        input: Option<ActionInput>,
    },
    /// No recognizable action in the turn.
    NoAction { reasoning: Option<String> },
}

impl ParsedTurn {
    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Self::Action { reasoning, .. } | Self::NoAction { reasoning } => reasoning.as_deref(),
        }
    }
}

/// Parse a free-text model turn into its reasoning/action/argument parts.
pub fn parse_turn(text: &str) -> ParsedTurn {
    let reasoning = THOUGHT
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty());

    let Some(action) = ACTION.captures(text).map(|c| c[1].to_string()) else {
        return ParsedTurn::NoAction { reasoning };
    };

    let input = ACTION_INPUT
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|raw| match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => ActionInput::Json(value),
            Err(_) => ActionInput::Text(raw),
        });

    ParsedTurn::Action {
        reasoning,
        name: action,
        input,
    }
}
