//! Inbound room events, and their line-oriented text form used by the
//! terminal client.
//!
//! ```text
//! tool_call {"tool_name":"fetch_slots","status":"started",...}
//! call_summary {"summary":"Booked an appointment for Tuesday."}
//! transcript agent-AJ_x9 Hello, I'm Dr. Ava.
//! agent_state listening
//! disconnect
//! ```

use crate::session::DataMessage;
use crate::transcript::{AgentState, ParseAgentStateError, TranscriptEntry};
use ava_types::{CALL_SUMMARY_TOPIC, TOOL_CALL_TOPIC};
use thiserror::Error;

/// Something the room told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    Data(DataMessage),
    Transcription(TranscriptEntry),
    AgentStateChanged(AgentState),
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ParseRoomEventError {
    #[error("unknown room event: {0}")]
    UnknownKind(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    AgentState(#[from] ParseAgentStateError),
}

/// Parses one line. Blank lines yield `None`.
pub fn parse_room_event(line: &str) -> Result<Option<RoomEvent>, ParseRoomEventError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (kind, rest) = match line.split_once(char::is_whitespace) {
        Some((kind, rest)) => (kind, rest.trim_start()),
        None => (line, ""),
    };

    let event = match kind {
        TOOL_CALL_TOPIC | CALL_SUMMARY_TOPIC => {
            RoomEvent::Data(DataMessage::new(kind, rest.as_bytes().to_vec()))
        }
        "transcript" => {
            let (identity, text) = rest
                .split_once(char::is_whitespace)
                .ok_or(ParseRoomEventError::MissingArgument("transcript"))?;
            RoomEvent::Transcription(TranscriptEntry::new(identity, text.trim_start()))
        }
        "agent_state" => {
            if rest.is_empty() {
                return Err(ParseRoomEventError::MissingArgument("agent_state"));
            }
            RoomEvent::AgentStateChanged(rest.parse()?)
        }
        "disconnect" => RoomEvent::Disconnected,
        other => return Err(ParseRoomEventError::UnknownKind(other.to_string())),
    };
    Ok(Some(event))
}
