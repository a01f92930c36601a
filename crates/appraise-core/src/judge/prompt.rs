//! Prompts for the action-observation judge loop.

/// System instructions describing the loop protocol and the available tools.
pub const SYSTEM_PROMPT: &str = r#"You are a judge that evaluates check results using the Reasoning + Acting pattern.

## Available Tools

1. **get_criteria** - Load the judgment criteria document for the check under evaluation
   - Input: none required
   - Output: The criteria document content

2. **check_threshold** - Check if a value meets a threshold condition
   - Input: {"value": number, "threshold": number, "operator": "gt"|"gte"|"lt"|"lte"|"eq"}
   - Output: {"result": true/false, "comparison": "value operator threshold"}

3. **calculate_percentage** - Calculate what percentage one value is of another
   - Input: {"value": number, "total": number}
   - Output: {"percentage": number, "calculation": "value/total*100"}

4. **submit_judgment** - Submit your final judgment (use this when you've reached a conclusion)
   - Input: {"has_problem": true/false, "severity": "none"|"warning"|"critical", "reasoning": "...", "summary": "..."}
   - Output: Judgment recorded

## Response Format

You MUST follow this exact format for EVERY response:

Thought: [Your reasoning about what to do next]
Action: [tool_name]
Action Input: [input for the tool - must be valid JSON for tools that require it]

After receiving an observation, continue with another Thought/Action/Action Input cycle until you're ready to submit your judgment.

## Important Rules
1. Always start by getting the criteria document
2. Analyze the check result against the criteria
3. Use check_threshold and calculate_percentage to verify conditions
4. Base your judgment on specific criteria from the document
5. You MUST eventually call submit_judgment to complete the evaluation
"#;

/// Message appended when a turn carried no recognizable action.
pub const NUDGE: &str =
    "Please provide an Action. Use submit_judgment when ready to provide your final verdict.";

/// Message appended when submit_judgment arrived without a JSON object.
pub const MALFORMED_SUBMISSION: &str = "Error: submit_judgment requires JSON input with has_problem, severity, reasoning, and summary fields.";

/// Initial user prompt carrying the check output under evaluation.
pub fn evaluation_prompt(check_name: &str, output_json: &str) -> String {
    format!(
        "Evaluate the following check result:\n\n\
         ## Check: {check_name}\n\n\
         ## Execution Result:\n\
         ```json\n\
         {output_json}\n\
         ```\n\n\
         Start by getting the criteria document, then analyze the result and submit your judgment."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_prompt_embeds_check_and_result() {
        let prompt = evaluation_prompt("length_check", "{\"raw_result\": 9}");
        assert!(prompt.contains("## Check: length_check"));
        assert!(prompt.contains("\"raw_result\": 9"));
    }

    #[test]
    fn system_prompt_describes_every_tool() {
        for name in super::super::tools::VALID_ACTIONS {
            assert!(SYSTEM_PROMPT.contains(name), "missing {name}");
        }
    }
}
