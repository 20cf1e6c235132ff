//! Accumulated conversation context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Context accumulated across classification cycles.
///
/// The backend schema allows arbitrary context keys
/// (`additionalProperties: true`); the known keys are typed and everything
/// else lands in the flattened `extra` bag so nothing the backend sends is
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    /// Items the assistant chose to remember across turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remembered_items: Option<Vec<String>>,
    /// Follow-up suggestions for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_suggestions: Option<Vec<String>>,
    /// Escape hatch for context keys the schema does not type.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationContext {
    /// Merges `update` into `self`, last write wins per key.
    ///
    /// Non-destructive: keys absent from the update are kept. A `None`
    /// typed field in the update means "no new value", not "clear".
    pub fn merge(&mut self, update: ConversationContext) {
        if update.remembered_items.is_some() {
            self.remembered_items = update.remembered_items;
        }
        if update.follow_up_suggestions.is_some() {
            self.follow_up_suggestions = update.follow_up_suggestions;
        }
        for (key, value) in update.extra {
            self.extra.insert(key, value);
        }
    }

    /// Returns true if no context has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.remembered_items.is_none()
            && self.follow_up_suggestions.is_none()
            && self.extra.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extra(pairs: &[(&str, Value)]) -> ConversationContext {
        ConversationContext {
            extra: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_last_write_wins_per_key() {
        let mut ctx = extra(&[("a", json!(1))]);
        ctx.merge(extra(&[("a", json!(2))]));
        assert_eq!(ctx.extra["a"], json!(2));
    }

    #[test]
    fn test_merge_keeps_absent_keys() {
        let mut ctx = extra(&[("a", json!(1))]);
        ctx.merge(extra(&[("b", json!(2))]));
        assert_eq!(ctx.extra["a"], json!(1));
        assert_eq!(ctx.extra["b"], json!(2));
    }

    #[test]
    fn test_merge_none_does_not_clear_typed_fields() {
        let mut ctx = ConversationContext {
            remembered_items: Some(vec!["red tv".to_string()]),
            ..Default::default()
        };
        ctx.merge(ConversationContext::default());
        assert_eq!(ctx.remembered_items, Some(vec!["red tv".to_string()]));
    }

    #[test]
    fn test_unknown_backend_keys_round_trip_through_flatten() {
        let ctx: ConversationContext = serde_json::from_value(json!({
            "rememberedItems": ["laptop"],
            "lastCategory": "electronics"
        }))
        .unwrap();

        assert_eq!(ctx.remembered_items, Some(vec!["laptop".to_string()]));
        assert_eq!(ctx.extra["lastCategory"], json!("electronics"));
    }
}
