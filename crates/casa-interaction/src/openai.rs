//! OpenAiClassifier - Chat Completions implementation of the intent
//! classifier.
//!
//! Sends the bounded transcript (system prompt prepended) to the OpenAI
//! Chat Completions API with a single declared function,
//! `process_user_input`, and a forced function call, then parses the
//! function-call arguments into a [`ClassifierResponse`].

use crate::config::ClassifierConfig;
use async_trait::async_trait;
use casa_core::classify::{ActionKind, ClassifierResponse, IntentClassifier};
use casa_core::session::Turn;
use casa_core::{CasaError, Result};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// System instructions for the shopping-assistant classification role.
const SYSTEM_PROMPT: &str = "\
You are an AI shopping assistant for an e-commerce website. Your role is to:
1. Understand user queries and determine their intent
2. When users ask about specific product types (e.g., \"televisions\", \"laptops\"), use the SHOW_PRODUCTS action with an appropriate productType parameter
3. Extract relevant product attributes and preferences from user queries
4. Provide helpful, concise responses
5. Remember context and maintain conversation flow

Examples:
- If the user asks \"show me televisions\", set productType: \"television\" in the SHOW_PRODUCTS action
- If the user asks about specific features, include them in the search parameters
- Always try to narrow down product selection based on the user's query

The only topics that should be answered are e-commerce related questions.
If the user asks about anything else, respond with \"I'm sorry, I don't have an answer for that, but I can help you with questions related to this shopping website or our company.\"

Topics:
- Product search
- Product query
- Product advice
- Return policy
- Payment methods
- Comparison between products";

/// JSON schema of the `process_user_input` function, matching the
/// structured payload the pipeline consumes.
static FUNCTION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "intent": {
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": [
                            "PRODUCT_SEARCH",
                            "PRODUCT_QUERY",
                            "GENERAL_QUERY",
                            "COMPARISON",
                            "CART_ACTION",
                            "GREETING",
                            "UNKNOWN"
                        ]
                    },
                    "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
                    "entities": {
                        "type": "object",
                        "properties": {
                            "productType": { "type": "string" },
                            "category": { "type": "string" },
                            "features": { "type": "array", "items": { "type": "string" } },
                            "priceRange": {
                                "type": "object",
                                "properties": {
                                    "min": { "type": "number" },
                                    "max": { "type": "number" }
                                }
                            }
                        },
                        "additionalProperties": true
                    }
                },
                "required": ["type", "confidence"]
            },
            "actions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": {
                            "type": "string",
                            "enum": [
                                "NO_ACTION",
                                "SHOW_PRODUCTS",
                                "SHOW_PRODUCT_DETAILS",
                                "UPDATE_CART",
                                "SHOW_CATEGORIES",
                                "SHOW_COMPARISON",
                                "UPDATE_UI"
                            ]
                        },
                        "parameters": { "type": "object", "additionalProperties": true },
                        "priority": { "type": "number", "minimum": 1 }
                    },
                    "required": ["type", "parameters", "priority"]
                }
            },
            "immediateResponse": {
                "type": "object",
                "properties": {
                    "message": { "type": "string" },
                    "tone": {
                        "type": "string",
                        "enum": ["informative", "helpful", "apologetic", "enthusiastic"]
                    },
                    "shouldBlock": { "type": "boolean" }
                },
                "required": ["message", "tone", "shouldBlock"]
            },
            "context": {
                "type": "object",
                "properties": {
                    "rememberedItems": { "type": "array", "items": { "type": "string" } },
                    "followUpSuggestions": { "type": "array", "items": { "type": "string" } }
                }
            }
        },
        "required": ["intent", "actions", "immediateResponse", "context"]
    })
});

/// Classifier implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl OpenAiClassifier {
    /// Creates a classifier with the provided configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `OPENAI_API_KEY` is missing.
    pub fn try_from_env() -> Result<Self> {
        Ok(Self::new(ClassifierConfig::from_env()?))
    }

    fn build_messages(turns: &[Turn]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend(turns.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: turn.content.clone(),
        }));
        messages
    }

    fn build_request(&self, turns: &[Turn]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: Self::build_messages(turns),
            functions: vec![FunctionSpec {
                name: "process_user_input",
                description: "Process user input and determine intent, actions, and response",
                parameters: &FUNCTION_SCHEMA,
            }],
            function_call: FunctionCallTarget {
                name: "process_user_input",
            },
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| CasaError::transport(format!("Chat API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response
            .json()
            .await
            .map_err(|err| CasaError::malformed(format!("Failed to parse chat response: {err}")))
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClassifier {
    async fn classify(&self, turns: &[Turn]) -> Result<ClassifierResponse> {
        let request = self.build_request(turns);
        let response = self.send_request(&request).await?;

        let arguments = extract_function_arguments(response)?;
        let parsed: ClassifierResponse = serde_json::from_str(&arguments).map_err(|err| {
            CasaError::malformed(format!("Function-call arguments did not parse: {err}"))
        })?;

        Ok(merge_intent_entities(parsed))
    }
}

/// Copies the intent's extracted entities into the parameters of every
/// `SHOW_PRODUCTS` action, entities winning on key collision, so the
/// product filter sees what the intent recognizer extracted even when the
/// backend left the action parameters sparse.
pub(crate) fn merge_intent_entities(mut response: ClassifierResponse) -> ClassifierResponse {
    if response.intent.entities.is_empty() {
        return response;
    }
    for action in &mut response.actions {
        if action.kind == ActionKind::ShowProducts {
            for (key, value) in &response.intent.entities {
                action.parameters.insert(key.clone(), value.clone());
            }
        }
    }
    response
}

fn extract_function_arguments(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.function_call)
        .map(|call| call.arguments)
        .ok_or_else(|| CasaError::malformed("No function call in chat response"))
}

fn map_http_error(status: StatusCode, body: String) -> CasaError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        CasaError::rate_limited(message)
    } else {
        CasaError::backend_status(status.as_u16(), message)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    functions: Vec<FunctionSpec>,
    function_call: FunctionCallTarget,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct FunctionSpec {
    name: &'static str,
    description: &'static str,
    parameters: &'static Value,
}

#[derive(Serialize)]
struct FunctionCallTarget {
    name: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
struct FunctionCall {
    arguments: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use casa_core::classify::{Action, IntentKind};
    use casa_core::session::TurnRole;
    use serde_json::json;

    fn sample_response(actions: Vec<Action>, entities: serde_json::Map<String, Value>) -> ClassifierResponse {
        let mut response = ClassifierResponse::fallback();
        response.intent.kind = IntentKind::ProductSearch;
        response.intent.entities = entities;
        response.actions = actions;
        response
    }

    #[test]
    fn test_request_body_declares_forced_function_call() {
        let classifier = OpenAiClassifier::new(ClassifierConfig::new("test-key"));
        let turns = vec![Turn::user("show me televisions")];

        let body = serde_json::to_value(classifier.build_request(&turns)).unwrap();

        assert_eq!(body["model"], json!("gpt-4o-mini"));
        assert_eq!(body["function_call"]["name"], json!("process_user_input"));
        assert_eq!(body["functions"][0]["name"], json!("process_user_input"));
        // System prompt is prepended before the transcript
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][1]["role"], json!("user"));
        assert_eq!(body["messages"][1]["content"], json!("show me televisions"));
    }

    #[test]
    fn test_build_messages_preserves_turn_order_and_roles() {
        let turns = vec![
            Turn::user("hi"),
            Turn::assistant("hello"),
            Turn::user("show me laptops"),
        ];
        let messages = OpenAiClassifier::build_messages(&turns);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, TurnRole::User.as_str());
        assert_eq!(messages[2].role, TurnRole::Assistant.as_str());
        assert_eq!(messages[3].content, "show me laptops");
    }

    #[test]
    fn test_merge_intent_entities_targets_show_products_only() {
        let mut entities = serde_json::Map::new();
        entities.insert("productType".to_string(), json!("television"));

        let mut show = Action::new(ActionKind::ShowProducts, 1);
        show.parameters.insert("limit".to_string(), json!(5));
        let ui = Action::new(ActionKind::UpdateUi, 2);

        let merged = merge_intent_entities(sample_response(vec![show, ui], entities));

        assert_eq!(merged.actions[0].parameters["productType"], json!("television"));
        assert_eq!(merged.actions[0].parameters["limit"], json!(5));
        assert!(merged.actions[1].parameters.is_empty());
    }

    #[test]
    fn test_merge_intent_entities_overwrites_colliding_keys() {
        let mut entities = serde_json::Map::new();
        entities.insert("category".to_string(), json!("electronics"));

        let mut show = Action::new(ActionKind::ShowProducts, 1);
        show.parameters.insert("category".to_string(), json!("stale"));

        let merged = merge_intent_entities(sample_response(vec![show], entities));
        assert_eq!(merged.actions[0].parameters["category"], json!("electronics"));
    }

    #[test]
    fn test_missing_function_call_is_malformed_payload() {
        let response = ChatCompletionResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    function_call: None,
                },
            }],
        };
        let err = extract_function_arguments(response).unwrap_err();
        assert!(matches!(err, CasaError::MalformedPayload(_)));
    }

    #[test]
    fn test_http_429_maps_to_rate_limited() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "Rate limit exceeded" } }).to_string(),
        );
        assert!(err.is_rate_limited());

        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert!(!err.is_rate_limited());
        assert!(err.is_classification_fault());
    }
}
