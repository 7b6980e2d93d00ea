//! Client side of an Ava voice call.
//!
//! Obtains a room credential from the Ava server, then folds the messages the
//! room delivers (tool-call events, the call summary, transcript segments and
//! agent state changes) into view state that the text renderer draws.
//!
//! Everything here reacts to one discrete event at a time and owns its state
//! exclusively; the room transport and its delivery order belong to LiveKit.
//!
//! ```rust,ignore
//! use ava_client::{CallSession, DataMessage, TokenClient};
//!
//! let mut session = CallSession::new(TokenClient::new("http://localhost:3000"));
//! session.connect("+15550100").await?;
//! session.handle_data(&DataMessage::new("tool_call", payload));
//! println!("{}", ava_client::render::render_session(&session, chrono::Utc::now(), false));
//! ```

pub mod format;
pub mod payload;
pub mod render;
pub mod room;
pub mod session;
pub mod summary;
pub mod token;
pub mod tool_calls;
pub mod transcript;

pub use payload::{decode_payload, PayloadError};
pub use room::{parse_room_event, RoomEvent};
pub use session::{CallSession, ConnectionState, DataMessage};
pub use summary::SummaryState;
pub use token::{TokenClient, TokenError};
pub use tool_calls::ToolCallLog;
pub use transcript::{AgentState, Speaker, Transcript, TranscriptEntry};
