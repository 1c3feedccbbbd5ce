use phantom_tools::{echo, http, slack, ToolEnv, ToolOutput, ToolSpec};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::registry::{Connector, Registry};

/// Runs one pass over the requested tools. Has no failure mode of its own:
/// each connector folds its problems into its own output.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Registry,
    env: ToolEnv,
}

impl Dispatcher {
    pub fn new(env: ToolEnv) -> Self {
        Self {
            registry: Registry::new(),
            env,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// One output per spec, in input order. No specs at all means a single echo.
    pub async fn dispatch(
        &self,
        instruction: &str,
        context: Option<&Map<String, Value>>,
        tool_specs: Option<&[ToolSpec]>,
    ) -> Vec<ToolOutput> {
        let supplied = tool_specs.unwrap_or_default();
        let default_spec = [ToolSpec::new(echo::TOOL_NAME, Value::Object(Map::new()))];
        let specs: &[ToolSpec] = if supplied.is_empty() { &default_spec } else { supplied };

        let mut outputs = Vec::with_capacity(specs.len());
        for spec in specs {
            let name = spec.normalized_name();
            let resolved = self.registry.resolve(&name);
            debug!("Dispatching '{}' -> {:?}", name, resolved.connector);

            let output = match resolved.connector {
                Connector::HttpRequest => http::run(spec, &self.env).await,
                Connector::SlackWebhook => slack::run(spec, &self.env, instruction).await,
                Connector::Echo => echo::run(instruction, context, supplied, resolved.unmatched),
            };

            info!("Tool '{}' finished with status {}", output.tool, output.status);
            outputs.push(output);
        }

        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use axum::http::StatusCode;
    use axum::routing::any;
    use axum::Router;
    use phantom_tools::ToolStatus;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ToolEnv::default())
    }

    #[tokio::test]
    async fn no_specs_means_one_echo() {
        let context = json!({"foo": "bar"});
        let empty: Vec<ToolSpec> = Vec::new();

        for specs in [None, Some(empty.as_slice())] {
            let outputs = dispatcher().dispatch("demo instruction", context.as_object(), specs).await;

            assert_eq!(outputs.len(), 1);
            assert_eq!(outputs[0].tool, "echo");
            assert_eq!(outputs[0].field("instruction"), Some(&json!("demo instruction")));
            assert_eq!(outputs[0].field("context"), Some(&context));
            assert!(outputs[0].field("unmatched_tool").is_none());
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_echoed_not_failed() {
        let specs = vec![ToolSpec::new("Jira", json!({"ticket": 7}))];

        let outputs = dispatcher().dispatch("open ticket", None, Some(&specs)).await;

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].tool, "echo");
        assert_eq!(outputs[0].field("unmatched_tool"), Some(&json!("jira")));
        assert_eq!(outputs[0].field("tool_specs").unwrap()[0]["name"], json!("Jira"));
    }

    #[tokio::test]
    async fn keeps_input_order_and_continues_past_failures() {
        let app = Router::new().route("/", any(|| async { StatusCode::ACCEPTED }));
        let base = spawn_stub(app).await;

        let specs = vec![
            ToolSpec::new("slack_webhook", json!({"message": "hello"})),
            ToolSpec::new("HTTP_REQUEST", json!({"url": "http://127.0.0.1:1/unreachable"})),
            ToolSpec::new("mystery", Value::Null),
            ToolSpec::new("http_request", json!({ "url": format!("{}/", base) })),
        ];

        let outputs = dispatcher().dispatch("notify", None, Some(&specs)).await;

        let tools: Vec<_> = outputs.iter().map(|o| o.tool.as_str()).collect();
        assert_eq!(tools, vec!["slack_webhook", "http_request", "echo", "http_request"]);
        assert_eq!(outputs[0].status, ToolStatus::Skipped);
        assert_eq!(outputs[1].status, ToolStatus::Error);
        assert_eq!(outputs[2].status, ToolStatus::Code(200));
        assert_eq!(outputs[3].status, ToolStatus::Code(202));
    }

    #[tokio::test]
    async fn webhook_defaults_to_instruction() {
        let specs = vec![ToolSpec::new("slack_webhook", Value::Null)];

        let outputs = dispatcher().dispatch("ship it", None, Some(&specs)).await;

        assert_eq!(outputs[0].field("message"), Some(&json!("ship it")));
    }
}
