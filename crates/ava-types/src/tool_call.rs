//! Tool-call and call-summary payloads published by the voice agent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle point of a remote tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    /// The agent has asked for the tool to run.
    Started,
    /// The tool finished and `result` holds its output.
    Completed,
    /// The tool failed and `result` holds the error details.
    Error,
}

impl ToolCallStatus {
    /// Returns the wire label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Whether this status closes a previously started call.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl std::fmt::Display for ToolCallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ToolCallStatus {
    type Err = ParseToolCallStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(Self::Started),
            "completed" => Ok(Self::Completed),
            "error" => Ok(Self::Error),
            _ => Err(ParseToolCallStatusError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown tool-call status string.
#[derive(Debug, Clone)]
pub struct ParseToolCallStatusError(pub String);

impl std::fmt::Display for ParseToolCallStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown tool call status: {}", self.0)
    }
}

impl std::error::Error for ParseToolCallStatusError {}

/// One lifecycle point of a tool invocation made by the voice agent.
///
/// Events carry no call identifier. A later event with the same
/// `tool_name` supersedes an earlier one; see the client's tool-call log for
/// how the two are paired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallEvent {
    pub tool_name: String,
    pub status: ToolCallStatus,
    /// Arguments the agent passed to the tool. Absent is read as empty.
    #[serde(default)]
    pub arguments: Map<String, Value>,
    /// Tool output on completion, error details on failure.
    #[serde(default)]
    pub result: Option<Map<String, Value>>,
    /// ISO-8601 time the agent emitted the event.
    pub timestamp: String,
}

impl ToolCallEvent {
    /// Builds an event with no arguments and no result.
    pub fn new(
        tool_name: impl Into<String>,
        status: ToolCallStatus,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            status,
            arguments: Map::new(),
            result: None,
            timestamp: timestamp.into(),
        }
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_result(mut self, result: Map<String, Value>) -> Self {
        self.result = Some(result);
        self
    }
}

/// End-of-call summary. Exactly one is expected per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSummaryData {
    pub summary: String,
}
