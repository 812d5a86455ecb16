//! Ollama request and response bodies.

use serde::{Deserialize, Serialize};

/// Which generation API the endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStyle {
    /// `POST /api/generate`
    Generate,
    /// `POST /api/chat`
    Chat,
}

impl ApiStyle {
    /// Chooses the style from the endpoint URL's path; anything other than a
    /// path ending in `/api/chat` is treated as `/api/generate`.
    pub fn from_endpoint(endpoint: &str) -> Self {
        let path = endpoint.split(['?', '#']).next().unwrap_or_default();
        if path.trim_end_matches('/').ends_with("/api/chat") {
            ApiStyle::Chat
        } else {
            ApiStyle::Generate
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Response of either API. Both fields are optional; whichever is present
/// carries the generated text.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl GenerationResponse {
    /// The generated text, trimmed; empty when neither field is present.
    pub fn into_text(self) -> String {
        self.response
            .or_else(|| self.message.and_then(|m| m.content))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_follows_endpoint_path() {
        assert_eq!(
            ApiStyle::from_endpoint("http://localhost:11434/api/generate"),
            ApiStyle::Generate
        );
        assert_eq!(
            ApiStyle::from_endpoint("http://localhost:11434/api/chat/"),
            ApiStyle::Chat
        );
        assert_eq!(
            ApiStyle::from_endpoint("http://localhost:11434/api/chat?x=1"),
            ApiStyle::Chat
        );
    }

    #[test]
    fn text_is_read_from_either_shape() {
        let generate: GenerationResponse =
            serde_json::from_str(r#"{"response": "  Done.  ", "done": true}"#).unwrap();
        assert_eq!(generate.into_text(), "Done.");

        let chat: GenerationResponse =
            serde_json::from_str(r#"{"message": {"role": "assistant", "content": "Hi"}}"#)
                .unwrap();
        assert_eq!(chat.into_text(), "Hi");
    }

    #[test]
    fn missing_text_is_empty() {
        let empty: GenerationResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert_eq!(empty.into_text(), "");
    }

    #[test]
    fn requests_disable_streaming() {
        let body = serde_json::to_value(GenerateRequest {
            model: "llama3",
            prompt: "p",
            stream: false,
        })
        .unwrap();
        assert_eq!(body["stream"], false);
        assert_eq!(body["model"], "llama3");
    }
}
