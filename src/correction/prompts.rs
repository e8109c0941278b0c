use super::models::CorrectionRequest;

/// Marker the retry prompt opens with
pub const RETRY_PREAMBLE: &str = "Your previous response was not valid JSON. You MUST try again.";

const EXAMPLE_RESPONSE: &str = r#"{
  "corrected_command": "ls -a",
  "explanation": "The command 'lsa' was likely a typo for 'ls'."
}"#;

/// Build the first-attempt prompt for a failed command
pub fn build_prompt(request: &CorrectionRequest) -> String {
    format!(
        "You are a command-line expert. A user's command failed.\n\
         - Command: {command}\n\
         - Exit Code: {exit_code}\n\
         - Command Output: {output}\n\n\
         Analyze the command, exit code, and output. An exit code of 127 typically means \"command not found\".\n\
         Your response MUST be a single, raw JSON object with two keys: \"corrected_command\" and \"explanation\".\n\
         Do NOT include any other text, markdown, or conversational filler.\n\n\
         Example Response:\n\
         {example}",
        command = request.command,
        exit_code = request.exit_code,
        output = request.output,
        example = EXAMPLE_RESPONSE,
    )
}

/// Build the stricter prompt used after the first attempt failed.
/// No worked example here.
pub fn build_retry_prompt(request: &CorrectionRequest) -> String {
    format!(
        "{preamble}\n\
         The user's command was: {command}\n\
         It failed with exit code: {exit_code}\n\
         The command output was: {output}\n\n\
         Provide a direct JSON object response with the keys \"corrected_command\" and \"explanation\".\n\
         DO NOT write any text other than the JSON object itself.",
        preamble = RETRY_PREAMBLE,
        command = request.command,
        exit_code = request.exit_code,
        output = request.output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CorrectionRequest {
        CorrectionRequest::new("lsa -l", "lsa: command not found", 127)
    }

    #[test]
    fn test_standard_prompt_contents() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("- Command: lsa -l"));
        assert!(prompt.contains("- Exit Code: 127"));
        assert!(prompt.contains("- Command Output: lsa: command not found"));
        assert!(prompt.contains("command not found"));
        assert!(prompt.contains("\"corrected_command\""));
        assert!(prompt.contains("\"explanation\""));
        assert!(prompt.contains("Example Response:"));
        assert!(!prompt.contains(RETRY_PREAMBLE));
    }

    #[test]
    fn test_retry_prompt_is_stricter_and_has_no_example() {
        let prompt = build_retry_prompt(&request());
        assert!(prompt.starts_with(RETRY_PREAMBLE));
        assert!(prompt.contains("The user's command was: lsa -l"));
        assert!(prompt.contains("It failed with exit code: 127"));
        assert!(prompt.contains("The command output was: lsa: command not found"));
        assert!(!prompt.contains("Example Response"));
        assert!(!prompt.contains("ls -a"));
        assert_ne!(prompt, build_prompt(&request()));
    }

    #[test]
    fn test_arbitrary_input_is_embedded_verbatim() {
        let nasty = CorrectionRequest::new(
            "echo '{}' %s $(rm -rf /) \"quoted\"",
            "line one\nline two\twith tab ünïcödé {{ }}",
            -1,
        );
        let prompt = build_prompt(&nasty);
        assert!(prompt.contains(&nasty.command));
        assert!(prompt.contains(&nasty.output));
        assert!(prompt.contains("- Exit Code: -1"));

        let retry = build_retry_prompt(&nasty);
        assert!(retry.contains(&nasty.command));
        assert!(retry.contains(&nasty.output));
    }
}
