//! Classification payload types.
//!
//! These mirror the structured object the classification backend returns:
//! `intent`, `actions[]`, `immediateResponse` and `context`. Field and
//! variant renames follow the backend JSON schema exactly.

use crate::session::ConversationContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The fixed apologetic reply used whenever classification degrades.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I'm having trouble processing your request. Could you please try again?";

/// The kind of user intent the backend recognized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentKind {
    ProductSearch,
    ProductQuery,
    GeneralQuery,
    Comparison,
    CartAction,
    Greeting,
    Error,
    Unknown,
}

/// The structured interpretation of the user's latest input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Recognized intent kind.
    #[serde(rename = "type")]
    pub kind: IntentKind,
    /// Backend confidence in [0, 1].
    pub confidence: f64,
    /// Extracted entities (product type, category, features, price range, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub entities: Map<String, Value>,
}

/// The fixed set of side effects the dispatcher knows how to execute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    ShowProducts,
    ShowProductDetails,
    UpdateCart,
    ShowCategories,
    ShowComparison,
    UpdateUi,
    NoAction,
}

/// A discrete, typed side effect to perform as a consequence of a
/// classification.
///
/// Each action is executed at most once per cycle; lower priority executes
/// first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The action kind, keying the executor registry.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Free-form executor parameters.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Execution priority; lower executes first, ties keep emission order.
    pub priority: i64,
}

impl Action {
    /// Creates an action with empty parameters.
    pub fn new(kind: ActionKind, priority: i64) -> Self {
        Self {
            kind,
            parameters: Map::new(),
            priority,
        }
    }

    /// Creates an action with the given parameters object.
    pub fn with_parameters(kind: ActionKind, priority: i64, parameters: Map<String, Value>) -> Self {
        Self {
            kind,
            parameters,
            priority,
        }
    }
}

/// Tone of the immediate reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResponseTone {
    Informative,
    Helpful,
    Apologetic,
    Enthusiastic,
}

/// The natural-language reply shown to the user right away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmediateResponse {
    /// The reply text.
    pub message: String,
    /// Reply tone.
    pub tone: ResponseTone,
    /// When true, the cycle is complete only after all actions finished.
    pub should_block: bool,
}

/// The full structured response of one classification cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierResponse {
    /// Recognized intent.
    pub intent: Intent,
    /// Actions to execute this cycle, zero or more.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Reply shown to the user immediately.
    pub immediate_response: ImmediateResponse,
    /// Context update to merge into the session.
    #[serde(default)]
    pub context: ConversationContext,
}

impl ClassifierResponse {
    /// The fixed degraded response used when classification fails.
    ///
    /// Intent `UNKNOWN` with confidence 0, no actions, apologetic
    /// non-blocking reply. The user never sees the underlying failure.
    pub fn fallback() -> Self {
        Self {
            intent: Intent {
                kind: IntentKind::Unknown,
                confidence: 0.0,
                entities: Map::new(),
            },
            actions: Vec::new(),
            immediate_response: ImmediateResponse {
                message: FALLBACK_MESSAGE.to_string(),
                tone: ResponseTone::Apologetic,
                should_block: false,
            },
            context: ConversationContext::default(),
        }
    }
}
