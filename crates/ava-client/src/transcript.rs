//! Live transcript and agent activity state.

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Agent,
    Caller,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Self::Agent => "Dr. Ava",
            Self::Caller => "You",
        }
    }
}

/// One transcribed utterance from the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub participant_identity: String,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(participant_identity: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            participant_identity: participant_identity.into(),
            text: text.into(),
        }
    }

    /// Callers join as `user-<phone>`; every other participant is the agent.
    pub fn speaker(&self) -> Speaker {
        if self.participant_identity.starts_with("user") {
            Speaker::Caller
        } else {
            Speaker::Agent
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// What the voice agent is doing, as reported by the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    /// The agent has not joined yet.
    #[default]
    Connecting,
    Idle,
    Listening,
    Thinking,
    Speaking,
}

impl AgentState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Idle => "Idle",
            Self::Listening => "Listening",
            Self::Thinking => "Thinking",
            Self::Speaking => "Speaking",
        }
    }
}

impl std::str::FromStr for AgentState {
    type Err = ParseAgentStateError;

    /// Accepts the room's agent state names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disconnected" | "connecting" => Ok(Self::Connecting),
            "initializing" | "idle" => Ok(Self::Idle),
            "listening" => Ok(Self::Listening),
            "thinking" => Ok(Self::Thinking),
            "speaking" => Ok(Self::Speaking),
            _ => Err(ParseAgentStateError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown agent state string.
#[derive(Debug, Clone)]
pub struct ParseAgentStateError(pub String);

impl std::fmt::Display for ParseAgentStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown agent state: {}", self.0)
    }
}

impl std::error::Error for ParseAgentStateError {}
