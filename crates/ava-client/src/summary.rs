//! End-of-call summary state.

use crate::payload::{decode_payload, PayloadError};
use ava_types::CallSummaryData;

pub fn decode_summary(payload: &[u8]) -> Result<CallSummaryData, PayloadError> {
    decode_payload("call summary", payload)
}

/// Holds the single summary the agent publishes when the call ends.
///
/// A newer summary replaces the old one outright; a payload that fails to
/// decode leaves the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryState {
    current: Option<CallSummaryData>,
}

impl SummaryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&CallSummaryData> {
        self.current.as_ref()
    }

    /// Handles a raw `call_summary` data-channel message. Returns whether the
    /// summary changed.
    pub fn on_data(&mut self, payload: &[u8]) -> bool {
        match decode_summary(payload) {
            Ok(summary) => {
                tracing::info!(chars = summary.summary.len(), "received call summary");
                self.current = Some(summary);
                true
            }
            Err(e) => {
                tracing::warn!(bytes = payload.len(), "failed to parse call summary: {}", e);
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_replaced_not_merged() {
        let mut state = SummaryState::new();
        assert!(state.get().is_none());

        assert!(state.on_data(br#"{"summary":"Booked an appointment for Tuesday."}"#));
        assert_eq!(
            state.get().map(|s| s.summary.as_str()),
            Some("Booked an appointment for Tuesday.")
        );

        assert!(state.on_data(br#"{"summary":"Cancelled the Tuesday appointment."}"#));
        assert_eq!(
            state.get().map(|s| s.summary.as_str()),
            Some("Cancelled the Tuesday appointment.")
        );
    }

    #[test]
    fn malformed_summary_keeps_previous_value() {
        let mut state = SummaryState::new();
        state.on_data(br#"{"summary":"Booked an appointment for Tuesday."}"#);
        let before = state.clone();

        assert!(!state.on_data(b"Booked an appointment"));
        assert!(!state.on_data(br#"{"summary":42}"#));
        assert!(!state.on_data(&[0xff]));
        assert_eq!(state, before);

        state.clear();
        assert!(state.get().is_none());
    }
}
