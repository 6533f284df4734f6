//! Tool registration surface and the in-process host that implements it.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{ErrorCode, ToolResult};

/// Everything a host needs to advertise a tool.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
}

impl ToolDefinition {
    pub fn is_read_only(&self) -> bool {
        self.annotations
            .as_ref()
            .and_then(|annotations| annotations.get("readOnlyHint"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Runs the tool. Every outcome, including faults, is an envelope.
    async fn execute(&self, params: Value) -> ToolResult;
}

#[derive(Clone)]
pub struct RegisteredTool {
    pub definition: ToolDefinition,
    pub executor: Arc<dyn ToolExecutor>,
}

impl RegisteredTool {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub async fn execute(&self, params: Value) -> ToolResult {
        self.executor.execute(params).await
    }
}

/// The registration surface a host offers to the tool adapter.
pub trait ModelContext: Send + Sync {
    fn register_tool(&self, tool: RegisteredTool);
    fn unregister_tool(&self, name: &str);
}

/// In-process host keeping tools in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<Vec<Arc<RegisteredTool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<RegisteredTool>> {
        self.read(|tools| tools.iter().find(|tool| tool.name() == name).cloned())
    }

    pub fn names(&self) -> Vec<String> {
        self.read(|tools| tools.iter().map(|tool| tool.name().to_string()).collect())
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.read(|tools| tools.iter().map(|tool| tool.definition.clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.read(|tools| tools.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes a registered tool; unknown names produce an `UNKNOWN_TOOL` envelope.
    pub async fn call(&self, name: &str, params: Value) -> ToolResult {
        match self.get(name) {
            Some(tool) => tool.execute(params).await,
            None => ToolResult::failure(ErrorCode::UnknownTool, &format!("No tool named `{name}`.")),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Vec<Arc<RegisteredTool>>) -> T) -> T {
        match self.tools.read() {
            Ok(tools) => f(&tools),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    fn write(&self, f: impl FnOnce(&mut Vec<Arc<RegisteredTool>>)) {
        match self.tools.write() {
            Ok(mut tools) => f(&mut tools),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl ModelContext for ToolRegistry {
    fn register_tool(&self, tool: RegisteredTool) {
        let name = tool.name().to_string();
        self.write(|tools| {
            tools.retain(|existing| existing.name() != name);
            tools.push(Arc::new(tool));
        });
        debug!(event_name = "forno.tools.host_registered", tool = %name, "tool registered");
    }

    fn unregister_tool(&self, name: &str) {
        self.write(|tools| tools.retain(|existing| existing.name() != name));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::envelope::ToolResult;

    use super::{ModelContext, RegisteredTool, ToolDefinition, ToolExecutor, ToolRegistry};

    struct Echo;

    #[async_trait]
    impl ToolExecutor for Echo {
        async fn execute(&self, params: Value) -> ToolResult {
            ToolResult::success("echo", Some(&params))
        }
    }

    fn echo(name: &str, annotations: Option<Value>) -> RegisteredTool {
        RegisteredTool {
            definition: ToolDefinition {
                name: name.to_string(),
                description: "Echo the parameters".to_string(),
                input_schema: json!({"type": "object", "properties": {}}),
                annotations,
            },
            executor: Arc::new(Echo),
        }
    }

    #[tokio::test]
    async fn calls_registered_tools_by_name() {
        let registry = ToolRegistry::new();
        registry.register_tool(echo("test.echo", None));

        let result = registry.call("test.echo", json!({"a": 1})).await;

        assert_eq!(result.payload()["data"]["a"], 1);
    }

    #[tokio::test]
    async fn unknown_tools_fail_with_a_code() {
        let registry = ToolRegistry::new();

        let result = registry.call("test.missing", Value::Null).await;

        assert_eq!(result.error_code().as_deref(), Some("UNKNOWN_TOOL"));
    }

    #[test]
    fn re_registering_replaces_and_unregister_removes() {
        let registry = ToolRegistry::new();
        registry.register_tool(echo("a", None));
        registry.register_tool(echo("b", None));
        registry.register_tool(echo("a", Some(json!({"readOnlyHint": true}))));

        assert_eq!(registry.names(), vec!["b", "a"]);
        assert!(registry.definitions()[1].is_read_only());

        registry.unregister_tool("b");
        assert_eq!(registry.names(), vec!["a"]);
    }

    #[test]
    fn definitions_serialize_with_input_schema_key() {
        let json = serde_json::to_value(echo("a", None).definition).expect("serialize");

        assert!(json.get("inputSchema").is_some());
        assert!(json.get("annotations").is_none());
    }
}
