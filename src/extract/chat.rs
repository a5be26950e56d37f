//! Chat-completions wire types and request plumbing
//!
//! Shared by the inline and raster strategies, which differ only in how they
//! attach the document to the message content.

use serde::{Deserialize, Serialize};

use super::ExtractError;

/// Instruction sent alongside the document/page attachments.
pub const EXTRACTION_PROMPT: &str = "Analyze this document and extract all text in a structured \
     way. Preserve the original formatting, line breaks, and content hierarchy. Return only the \
     extracted text, without additional commentary.";

const MAX_TOKENS: u32 = 8000;
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    /// One user message carrying the extraction instruction plus attachments.
    pub fn for_extraction(model: &str, attachments: Vec<ContentPart>) -> Self {
        let mut content = vec![ContentPart::Text {
            text: EXTRACTION_PROMPT.to_string(),
        }];
        content.extend(attachments);

        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn data_url(url: String) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

/// Send a chat request and return the parsed response.
pub async fn post_chat(
    http: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    request: &ChatRequest,
) -> Result<ChatResponse, ExtractError> {
    let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

    let response = http
        .post(&url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await
        .map_err(|e| ExtractError::ProviderUnavailable(format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ExtractError::ProviderUnavailable(format!(
            "provider returned {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ExtractError::MalformedResponse(format!("invalid response body: {}", e)))
}

/// Extract the text of the first choice; only the first choice is consulted.
pub fn first_choice_text(response: ChatResponse) -> Result<String, ExtractError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            ExtractError::MalformedResponse("response has no choices with message content".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_choice_text_happy_path() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"extracted text"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "extracted text");
    }

    #[test]
    fn test_empty_content_is_valid() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "");
    }

    #[test]
    fn test_missing_choices_is_malformed() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice_text(response),
            Err(ExtractError::MalformedResponse(_))
        ));

        let response: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            first_choice_text(response),
            Err(ExtractError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_message_content_is_malformed() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{}}]}"#).unwrap();
        assert!(matches!(
            first_choice_text(response),
            Err(ExtractError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest::for_extraction(
            "pixtral-12b-2409",
            vec![ContentPart::data_url("data:application/pdf;base64,AAAA".into())],
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "pixtral-12b-2409");
        assert_eq!(json["max_tokens"], 8000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:application/pdf;base64,AAAA"
        );
    }
}
