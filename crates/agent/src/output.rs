//! Structured output: the typed final answer of an agent.
//!
//! An agent declares its output type `O: AgentOutput`. Every model turn asks
//! the provider for a JSON object matching `O::json_schema()`, and the final
//! assistant message must parse into `O` or the run fails.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tellerbot_core::provider::ResponseFormat;

/// A type an agent can produce as its final answer.
pub trait AgentOutput: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Schema name sent with the response format.
    fn schema_name() -> &'static str;

    /// JSON Schema of the serialized form.
    fn json_schema() -> serde_json::Value;

    /// Response format requested from the provider, `None` for free text.
    fn response_format() -> Option<ResponseFormat> {
        Some(ResponseFormat::json_schema(Self::schema_name(), Self::json_schema()))
    }

    /// Parse the model's final message. The error is a human-readable reason.
    fn parse(text: &str) -> Result<Self, String> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err("empty response".into());
        }
        serde_json::from_str(body).map_err(|e| e.to_string())
    }
}

/// Plain-text agents: whatever the model says is the answer.
impl AgentOutput for String {
    fn schema_name() -> &'static str {
        "text"
    }

    fn json_schema() -> serde_json::Value {
        serde_json::json!({ "type": "string" })
    }

    fn response_format() -> Option<ResponseFormat> {
        None
    }

    fn parse(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }
}

/// The note appended to an agent's instructions describing its output.
pub fn output_instructions<O: AgentOutput>() -> Option<String> {
    O::response_format().map(|format| {
        format!(
            "Your final answer must be a single JSON object matching the schema \
             `{}` below, with no surrounding prose:\n{}",
            format.name, format.schema
        )
    })
}

/// Drop a surrounding markdown code fence (```json ... ```), if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    // The opening fence line may carry a language tag
    match rest.find('\n') {
        Some(i) if rest[..i].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            rest[i + 1..].trim()
        }
        _ => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Answer {
        value: String,
    }

    impl AgentOutput for Answer {
        fn schema_name() -> &'static str {
            "Answer"
        }

        fn json_schema() -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "value": { "type": "string" } },
                "required": ["value"],
                "additionalProperties": false
            })
        }
    }

    #[test]
    fn parses_bare_json() {
        let answer = Answer::parse(r#"{"value":"42"}"#).unwrap();
        assert_eq!(answer.value, "42");
    }

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"value\": \"42\"}\n```";
        assert_eq!(Answer::parse(text).unwrap().value, "42");

        let text = "```\n{\"value\": \"7\"}\n```";
        assert_eq!(Answer::parse(text).unwrap().value, "7");

        let text = "```{\"value\": \"1\"}```";
        assert_eq!(Answer::parse(text).unwrap().value, "1");
    }

    #[test]
    fn rejects_prose_and_missing_fields() {
        assert!(Answer::parse("The balance is 100000").is_err());
        let reason = Answer::parse(r#"{"other":"x"}"#).unwrap_err();
        assert!(reason.contains("value"), "{reason}");
        assert_eq!(Answer::parse("   ").unwrap_err(), "empty response");
    }

    #[test]
    fn text_output_is_unconstrained() {
        assert!(String::response_format().is_none());
        assert!(output_instructions::<String>().is_none());
        assert_eq!(String::parse("hello").unwrap(), "hello");
    }

    #[test]
    fn instructions_embed_schema() {
        let note = output_instructions::<Answer>().unwrap();
        assert!(note.contains("`Answer`"));
        assert!(note.contains("\"required\""));
    }
}
