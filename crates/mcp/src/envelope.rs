//! Uniform result envelope returned by every tool.
//!
//! Outcomes are JSON text inside a single text content item:
//! `{"ok":true,"message":..,"data":..}` or `{"ok":false,"error":{"code":..,"details":..}}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidParams,
    InvalidCategory,
    InvalidIngredient,
    InvalidMode,
    InvalidQuantity,
    InvalidPizzaId,
    ItemNotFound,
    CartEmpty,
    UnknownTool,
    UnexpectedError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidParams => "INVALID_PARAMS",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::InvalidIngredient => "INVALID_INGREDIENT",
            Self::InvalidMode => "INVALID_MODE",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InvalidPizzaId => "INVALID_PIZZA_ID",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::CartEmpty => "CART_EMPTY",
            Self::UnknownTool => "UNKNOWN_TOOL",
            Self::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { text: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Serialize)]
struct SuccessPayload<'a> {
    ok: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
struct FailurePayload<'a> {
    ok: bool,
    error: FailureDetail<'a>,
}

#[derive(Debug, Serialize)]
struct FailureDetail<'a> {
    code: ErrorCode,
    details: &'a str,
}

impl ToolResult {
    pub fn success(message: &str, data: Option<&Value>) -> Self {
        let payload = SuccessPayload { ok: true, message, data };
        Self::text_result(serde_json::to_string(&payload).unwrap_or_else(|error| {
            serialization_fallback(&error)
        }))
    }

    pub fn failure(code: ErrorCode, details: &str) -> Self {
        let payload = FailurePayload { ok: false, error: FailureDetail { code, details } };
        Self::text_result(serde_json::to_string(&payload).unwrap_or_else(|error| {
            serialization_fallback(&error)
        }))
    }

    fn text_result(text: String) -> Self {
        Self { content: vec![ContentItem::Text { text }] }
    }

    pub fn text(&self) -> &str {
        self.content
            .iter()
            .map(|item| match item {
                ContentItem::Text { text } => text.as_str(),
            })
            .next()
            .unwrap_or_default()
    }

    /// Parsed envelope, `Value::Null` if the text is not JSON.
    pub fn payload(&self) -> Value {
        serde_json::from_str(self.text()).unwrap_or(Value::Null)
    }

    pub fn is_ok(&self) -> bool {
        self.payload()["ok"].as_bool().unwrap_or(false)
    }

    pub fn error_code(&self) -> Option<String> {
        self.payload()["error"]["code"].as_str().map(str::to_string)
    }
}

fn serialization_fallback(error: &serde_json::Error) -> String {
    format!(
        "{{\"ok\":false,\"error\":{{\"code\":\"UNEXPECTED_ERROR\",\"details\":\"{}\"}}}}",
        error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ErrorCode, ToolResult};

    #[test]
    fn success_omits_absent_data() {
        let result = ToolResult::success("Cart cleared", None);

        assert_eq!(result.text(), r#"{"ok":true,"message":"Cart cleared"}"#);
        assert!(result.is_ok());
    }

    #[test]
    fn success_embeds_data() {
        let result = ToolResult::success("Catalog returned", Some(&json!({"categories": []})));

        assert_eq!(result.payload()["data"]["categories"], json!([]));
    }

    #[test]
    fn failure_carries_code_and_details() {
        let result = ToolResult::failure(ErrorCode::CartEmpty, "Cannot place order.");

        assert_eq!(
            result.text(),
            r#"{"ok":false,"error":{"code":"CART_EMPTY","details":"Cannot place order."}}"#
        );
        assert!(!result.is_ok());
        assert_eq!(result.error_code().as_deref(), Some("CART_EMPTY"));
    }

    #[test]
    fn content_is_a_single_text_item() {
        let json = serde_json::to_value(ToolResult::success("ok", None)).expect("serialize");

        assert_eq!(json["content"][0]["type"], "text");
        assert!(json["content"][0]["text"].is_string());
    }

    #[test]
    fn display_matches_wire_code() {
        for code in [ErrorCode::InvalidPizzaId, ErrorCode::UnexpectedError] {
            let wire = serde_json::to_value(code).expect("serialize code");
            assert_eq!(wire, code.to_string());
        }
    }
}
