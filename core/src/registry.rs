use phantom_tools::{echo, http, slack};
use serde::Serialize;
use std::collections::HashMap;

/// Every connector the dispatcher knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    HttpRequest,
    SlackWebhook,
    Echo,
}

impl Connector {
    pub const ALL: [Connector; 3] = [Connector::HttpRequest, Connector::SlackWebhook, Connector::Echo];

    pub fn name(self) -> &'static str {
        match self {
            Connector::HttpRequest => http::TOOL_NAME,
            Connector::SlackWebhook => slack::TOOL_NAME,
            Connector::Echo => echo::TOOL_NAME,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Connector::HttpRequest => http::DESCRIPTION,
            Connector::SlackWebhook => slack::DESCRIPTION,
            Connector::Echo => echo::DESCRIPTION,
        }
    }
}

// The shape of one catalog entry (served by GET /tools)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRecord {
    pub name: &'static str,
    pub description: &'static str,
}

/// Outcome of a lookup. `unmatched` is set when the fallback answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub connector: Connector,
    pub unmatched: Option<&'a str>,
}

/// Fixed name -> connector table with a guaranteed fallback entry, so every
/// lookup resolves to something runnable.
#[derive(Debug, Clone)]
pub struct Registry {
    table: HashMap<&'static str, Connector>,
    fallback: Connector,
}

impl Registry {
    pub fn new() -> Self {
        let table = Connector::ALL
            .iter()
            .map(|connector| (connector.name(), *connector))
            .collect();

        Self {
            table,
            fallback: Connector::Echo,
        }
    }

    /// `name` must already be normalized (see `ToolSpec::normalized_name`).
    pub fn resolve<'a>(&self, name: &'a str) -> Resolved<'a> {
        match self.table.get(name) {
            Some(connector) => Resolved {
                connector: *connector,
                unmatched: None,
            },
            None => Resolved {
                connector: self.fallback,
                unmatched: Some(name),
            },
        }
    }

    pub fn catalog(&self) -> Vec<ToolRecord> {
        Connector::ALL
            .iter()
            .map(|connector| ToolRecord {
                name: connector.name(),
                description: connector.description(),
            })
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
