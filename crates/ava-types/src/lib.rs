//! Shared wire types for the Ava voice-call client.
//!
//! These are the shapes that cross a process boundary: the payloads the
//! remote voice agent publishes on the room's data channels, and the
//! request/response bodies of the token endpoint. Both the server and the
//! client crates depend on this crate so the two sides cannot drift apart.

mod token;
mod tool_call;

pub use token::{ErrorBody, TokenRequest, TokenResponse};
pub use tool_call::{CallSummaryData, ParseToolCallStatusError, ToolCallEvent, ToolCallStatus};

/// Data-channel topic carrying UTF-8 JSON [`ToolCallEvent`] messages.
pub const TOOL_CALL_TOPIC: &str = "tool_call";

/// Data-channel topic carrying UTF-8 JSON [`CallSummaryData`] messages.
pub const CALL_SUMMARY_TOPIC: &str = "call_summary";

/// Path of the token endpoint, relative to the server base URL.
pub const TOKEN_PATH: &str = "/api/token";
