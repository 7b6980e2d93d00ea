//! Call session state machine.
//!
//! The session owns everything derived from one call: the credential, the
//! tool-call log, the summary and the transcript. [`ConnectionState`] is the
//! single source of truth for which screen is shown.

use crate::room::RoomEvent;
use crate::summary::SummaryState;
use crate::token::{TokenClient, TokenError};
use crate::tool_calls::ToolCallLog;
use crate::transcript::{AgentState, Transcript, TranscriptEntry};
use ava_types::{TokenResponse, CALL_SUMMARY_TOPIC, TOOL_CALL_TOPIC};

/// Which screen the client is on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Waiting for the caller to enter a phone number.
    #[default]
    Welcome,
    /// A credential request is in flight.
    Connecting,
    /// In the room with this credential.
    Connected(TokenResponse),
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Connecting => "connecting",
            Self::Connected(_) => "connected",
        }
    }
}

/// A message delivered on the room's data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMessage {
    pub topic: Option<String>,
    pub payload: Vec<u8>,
}

impl DataMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: Some(topic.into()),
            payload: payload.into(),
        }
    }
}

#[derive(Debug)]
pub struct CallSession {
    state: ConnectionState,
    token_client: TokenClient,
    tool_calls: ToolCallLog,
    summary: SummaryState,
    transcript: Transcript,
    agent_state: AgentState,
}

impl CallSession {
    pub fn new(token_client: TokenClient) -> Self {
        Self {
            state: ConnectionState::Welcome,
            token_client,
            tool_calls: ToolCallLog::new(),
            summary: SummaryState::new(),
            transcript: Transcript::new(),
            agent_state: AgentState::default(),
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn credential(&self) -> Option<&TokenResponse> {
        match &self.state {
            ConnectionState::Connected(credential) => Some(credential),
            _ => None,
        }
    }

    pub fn tool_calls(&self) -> &ToolCallLog {
        &self.tool_calls
    }

    pub fn summary(&self) -> &SummaryState {
        &self.summary
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn agent_state(&self) -> AgentState {
        self.agent_state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ConnectionState::Connecting) || self.token_client.is_loading()
    }

    /// Last credential error, shown on the welcome screen.
    pub fn error(&self) -> Option<&str> {
        self.token_client.error()
    }

    /// Requests a credential and enters the room.
    ///
    /// On failure the session returns to the welcome screen and the error is
    /// available through [`CallSession::error`]. Connecting while already in
    /// a call ends that call first. Dropping the returned future before it
    /// completes also returns to the welcome screen.
    pub async fn connect(&mut self, phone_number: &str) -> Result<(), TokenError> {
        if !matches!(self.state, ConnectionState::Welcome) {
            tracing::debug!(state = self.state.as_str(), "connect requested mid-call, resetting");
            self.disconnect();
        }
        self.clear_call_state();

        let pending = PendingConnect::begin(&mut self.state);
        let credential = self.token_client.request_token(phone_number).await?;
        tracing::info!(url = %credential.url, "joined call");
        pending.complete(credential);
        Ok(())
    }

    /// Routes a data-channel message to its reducer. Returns whether any view
    /// state changed.
    pub fn handle_data(&mut self, message: &DataMessage) -> bool {
        if self.credential().is_none() {
            tracing::debug!(state = self.state.as_str(), "dropping data message outside a call");
            return false;
        }

        match message.topic.as_deref() {
            Some(TOOL_CALL_TOPIC) => self.tool_calls.on_data(&message.payload),
            Some(CALL_SUMMARY_TOPIC) => self.summary.on_data(&message.payload),
            other => {
                tracing::debug!(topic = ?other, "ignoring data message on unknown topic");
                false
            }
        }
    }

    pub fn handle_transcription(&mut self, entry: TranscriptEntry) {
        if self.credential().is_none() {
            return;
        }
        self.transcript.push(entry);
    }

    pub fn set_agent_state(&mut self, state: AgentState) {
        if self.credential().is_none() {
            tracing::debug!(state = self.state.as_str(), "dropping agent state outside a call");
            return;
        }
        self.agent_state = state;
    }

    /// Applies one room event. Returns whether the call is still running.
    pub fn handle_room_event(&mut self, event: RoomEvent) -> bool {
        match event {
            RoomEvent::Data(message) => {
                self.handle_data(&message);
            }
            RoomEvent::Transcription(entry) => self.handle_transcription(entry),
            RoomEvent::AgentStateChanged(state) => self.set_agent_state(state),
            RoomEvent::Disconnected => self.disconnect(),
        }
        self.credential().is_some()
    }

    /// Leaves the call and drops everything derived from it, so the next
    /// call starts from an empty log.
    pub fn disconnect(&mut self) {
        if let ConnectionState::Connected(credential) = &self.state {
            tracing::info!(url = %credential.url, "left call");
        }
        self.state = ConnectionState::Welcome;
        self.clear_call_state();
    }

    fn clear_call_state(&mut self) {
        self.tool_calls.clear();
        self.summary.clear();
        self.transcript.clear();
        self.agent_state = AgentState::default();
    }
}

/// Keeps the session in `Connecting` while a credential request is pending.
/// Unless completed, dropping it falls back to `Welcome`.
struct PendingConnect<'a> {
    state: &'a mut ConnectionState,
}

impl<'a> PendingConnect<'a> {
    fn begin(state: &'a mut ConnectionState) -> Self {
        *state = ConnectionState::Connecting;
        Self { state }
    }

    fn complete(self, credential: TokenResponse) {
        *self.state = ConnectionState::Connected(credential);
    }
}

impl Drop for PendingConnect<'_> {
    fn drop(&mut self) {
        if matches!(*self.state, ConnectionState::Connecting) {
            *self.state = ConnectionState::Welcome;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CallSession {
        CallSession::new(TokenClient::new("http://127.0.0.1:9"))
    }

    #[tokio::test]
    async fn empty_phone_number_stays_on_welcome() {
        let mut session = session();

        assert!(session.connect("").await.is_err());
        assert_eq!(session.state(), &ConnectionState::Welcome);
        assert_eq!(session.error(), Some("Phone number is required"));
        assert!(!session.is_loading());
    }

    #[test]
    fn data_outside_a_call_is_dropped() {
        let mut session = session();
        let message = DataMessage::new(CALL_SUMMARY_TOPIC, br#"{"summary":"done"}"#.to_vec());

        assert!(!session.handle_data(&message));
        assert!(session.summary().get().is_none());

        session.handle_transcription(TranscriptEntry::new("agent", "hello"));
        assert!(session.transcript().is_empty());

        session.set_agent_state(AgentState::Speaking);
        assert_eq!(session.agent_state(), AgentState::Connecting);
    }

    fn connected_session() -> CallSession {
        let mut session = session();
        session.state = ConnectionState::Connected(TokenResponse {
            token: "jwt".to_string(),
            url: "wss://ava-test.livekit.cloud".to_string(),
        });
        session
    }

    fn tool_message(tool: &str, status: &str) -> DataMessage {
        let payload = serde_json::json!({
            "tool_name": tool,
            "status": status,
            "arguments": {},
            "result": null,
            "timestamp": "2025-03-04T09:00:00+00:00"
        });
        DataMessage::new(TOOL_CALL_TOPIC, payload.to_string())
    }

    #[test]
    fn routes_messages_by_topic() {
        let mut session = connected_session();

        assert!(session.handle_data(&tool_message("fetch_slots", "started")));
        assert!(session.handle_data(&tool_message("fetch_slots", "completed")));
        assert!(session.handle_data(&DataMessage::new(
            CALL_SUMMARY_TOPIC,
            r#"{"summary":"Booked an appointment for Tuesday."}"#
        )));
        assert!(!session.handle_data(&DataMessage::new("lk-chat-topic", "hi")));
        assert!(!session.handle_data(&DataMessage {
            topic: None,
            payload: b"{}".to_vec(),
        }));

        assert_eq!(session.tool_calls().len(), 1);
        assert_eq!(
            session.summary().get().map(|s| s.summary.as_str()),
            Some("Booked an appointment for Tuesday.")
        );
    }

    #[test]
    fn disconnect_clears_derived_state() {
        let mut session = connected_session();
        session.handle_data(&tool_message("identify_user", "started"));
        session.handle_data(&DataMessage::new(CALL_SUMMARY_TOPIC, r#"{"summary":"done"}"#));
        session.handle_transcription(TranscriptEntry::new("user-+15550100", "Hi"));
        session.set_agent_state(AgentState::Speaking);

        session.disconnect();

        assert_eq!(session.state(), &ConnectionState::Welcome);
        assert!(session.credential().is_none());
        assert!(session.tool_calls().is_empty());
        assert!(session.summary().get().is_none());
        assert!(session.transcript().is_empty());
        assert_eq!(session.agent_state(), AgentState::Connecting);
    }
}
