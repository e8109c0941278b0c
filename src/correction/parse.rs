use super::error::AttemptError;
use super::models::Correction;

/// Extract a JSON fragment between matching delimiters.
///
/// Takes the outermost span from the first `open` to the last `close`;
/// the span is not validated.
fn extract_json_fragment(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if start <= end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Extract the JSON object from a model reply, skipping any prose or fences around it
pub fn extract_json_object(response: &str) -> Option<&str> {
    extract_json_fragment(response, '{', '}')
}

/// Try to fix common JSON issues from LLM responses
fn fix_json_issues(json: &str) -> String {
    let mut fixed = json.to_string();

    // Remove trailing commas before ] or }
    fixed = fixed.replace(",]", "]");
    fixed = fixed.replace(",}", "}");

    // Smart quotes to regular quotes
    fixed = fixed.replace(['\u{201C}', '\u{201D}'], "\"");
    fixed = fixed.replace(['\u{2018}', '\u{2019}'], "'");

    fixed
}

/// Decode a raw model reply into a [`Correction`].
///
/// Does not judge whether the correction is actionable; an empty
/// `corrected_command` decodes successfully.
pub fn parse_correction(response: &str) -> Result<Correction, AttemptError> {
    if response.is_empty() {
        return Err(AttemptError::EmptyResponse);
    }

    let json_str = extract_json_object(response).ok_or(AttemptError::NoJsonFound)?;

    match serde_json::from_str::<Correction>(json_str) {
        Ok(correction) => Ok(correction),
        Err(initial_error) => {
            let fixed = fix_json_issues(json_str);
            if fixed != json_str {
                if let Ok(correction) = serde_json::from_str::<Correction>(&fixed) {
                    return Ok(correction);
                }
            }
            Err(AttemptError::MalformedJson(initial_error))
        }
    }
}
