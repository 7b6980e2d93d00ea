//! Running log of the agent's tool calls.
//!
//! Events carry no call identifier, so a `completed` or `error` event is
//! paired with the earliest still-open `started` entry for the same tool name
//! and replaces it in place. Anything unpaired is appended. Pairing is FIFO
//! and relies on the room delivering messages in order; two overlapping calls
//! to one tool that finish out of order will be mispaired.

use crate::payload::{decode_payload, PayloadError};
use ava_types::{ToolCallEvent, ToolCallStatus};

/// Folds one event into `log`.
///
/// `started` always appends. `completed` and `error` replace the first entry
/// with the same `tool_name` that is still `started`, or append when there is
/// none.
pub fn reduce(mut log: Vec<ToolCallEvent>, event: ToolCallEvent) -> Vec<ToolCallEvent> {
    if event.status.is_terminal() {
        let open = log
            .iter()
            .position(|e| e.tool_name == event.tool_name && e.status == ToolCallStatus::Started);
        if let Some(idx) = open {
            log[idx] = event;
            return log;
        }
    }
    log.push(event);
    log
}

/// Decodes a raw `tool_call` payload and folds it into `log`.
///
/// A payload that is not a UTF-8 JSON tool-call event is logged and dropped;
/// the log comes back unchanged.
pub fn apply(log: Vec<ToolCallEvent>, payload: &[u8]) -> Vec<ToolCallEvent> {
    let mut log = ToolCallLog { entries: log };
    log.on_data(payload);
    log.entries
}

pub fn decode_tool_call(payload: &[u8]) -> Result<ToolCallEvent, PayloadError> {
    decode_payload("tool call event", payload)
}

/// Tool-call log for one call session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallLog {
    entries: Vec<ToolCallEvent>,
}

impl ToolCallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ToolCallEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, event: ToolCallEvent) {
        tracing::debug!(
            tool = %event.tool_name,
            status = event.status.as_str(),
            "tool call event"
        );
        self.entries = reduce(std::mem::take(&mut self.entries), event);
    }

    /// Handles a raw `tool_call` data-channel message. Returns whether the
    /// log changed. Undecodable payloads are logged and dropped.
    pub fn on_data(&mut self, payload: &[u8]) -> bool {
        match decode_tool_call(payload) {
            Ok(event) => {
                self.record(event);
                true
            }
            Err(e) => {
                tracing::warn!(bytes = payload.len(), "failed to parse tool call event: {}", e);
                false
            }
        }
    }

    /// Entries whose tool finished successfully, in log order.
    pub fn completed(&self) -> impl Iterator<Item = &ToolCallEvent> {
        self.entries
            .iter()
            .filter(|e| e.status == ToolCallStatus::Completed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    const TS: &str = "2025-03-04T09:00:00+00:00";

    fn event(tool: &str, status: ToolCallStatus) -> ToolCallEvent {
        ToolCallEvent::new(tool, status, TS)
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn fold(events: &[ToolCallEvent]) -> Vec<ToolCallEvent> {
        events.iter().cloned().fold(Vec::new(), reduce)
    }

    fn statuses(log: &[ToolCallEvent]) -> Vec<(&str, ToolCallStatus)> {
        log.iter().map(|e| (e.tool_name.as_str(), e.status)).collect()
    }

    #[test]
    fn completion_replaces_started_in_place() {
        let completed = event("fetch_slots", ToolCallStatus::Completed)
            .with_result(object(json!({"slots": ["09:00", "09:30"]})));
        let log = fold(&[event("fetch_slots", ToolCallStatus::Started), completed.clone()]);

        assert_eq!(log.len(), 1);
        assert_eq!(log[0], completed);
    }

    #[test]
    fn completion_matches_earliest_open_call() {
        let log = fold(&[
            event("book_appointment", ToolCallStatus::Started),
            event("book_appointment", ToolCallStatus::Started),
            event("book_appointment", ToolCallStatus::Completed),
        ]);

        assert_eq!(
            statuses(&log),
            vec![
                ("book_appointment", ToolCallStatus::Completed),
                ("book_appointment", ToolCallStatus::Started),
            ]
        );
    }

    #[test]
    fn unmatched_completion_is_appended() {
        let log = fold(&[
            event("identify_user", ToolCallStatus::Started),
            event("cancel_appointment", ToolCallStatus::Completed),
        ]);

        assert_eq!(
            statuses(&log),
            vec![
                ("identify_user", ToolCallStatus::Started),
                ("cancel_appointment", ToolCallStatus::Completed),
            ]
        );
    }

    #[test]
    fn error_closes_started_call() {
        let log = fold(&[
            event("modify_appointment", ToolCallStatus::Started),
            event("fetch_slots", ToolCallStatus::Started),
            event("modify_appointment", ToolCallStatus::Error)
                .with_result(object(json!({"error": "slot taken"}))),
        ]);

        assert_eq!(
            statuses(&log),
            vec![
                ("modify_appointment", ToolCallStatus::Error),
                ("fetch_slots", ToolCallStatus::Started),
            ]
        );
        assert_eq!(log[0].result.as_ref().unwrap()["error"], "slot taken");
    }

    #[test]
    fn closed_entries_are_never_reopened_or_replaced() {
        let log = fold(&[
            event("fetch_slots", ToolCallStatus::Started),
            event("fetch_slots", ToolCallStatus::Completed),
            event("fetch_slots", ToolCallStatus::Completed),
        ]);

        assert_eq!(
            statuses(&log),
            vec![
                ("fetch_slots", ToolCallStatus::Completed),
                ("fetch_slots", ToolCallStatus::Completed),
            ]
        );
    }

    /// Every sequence of up to five events over two tools must pair each
    /// terminal event with the oldest open call for its tool.
    #[test]
    fn terminal_events_always_resolve_oldest_open_call() {
        let tools = ["fetch_slots", "book_appointment"];
        let statuses = [
            ToolCallStatus::Started,
            ToolCallStatus::Completed,
            ToolCallStatus::Error,
        ];
        let alphabet: Vec<(usize, ToolCallStatus)> = tools
            .iter()
            .enumerate()
            .flat_map(|(t, _)| statuses.iter().map(move |s| (t, *s)))
            .collect();

        for len in 0..=5u32 {
            for mut code in 0..alphabet.len().pow(len) {
                let mut log = Vec::new();
                // Expected log, with each event tagged by its arrival index.
                let mut expected: Vec<(usize, ToolCallStatus, usize)> = Vec::new();

                for step in 0..len as usize {
                    let (tool, status) = alphabet[code % alphabet.len()];
                    code /= alphabet.len();

                    let mut ev = event(tools[tool], status);
                    ev.timestamp = step.to_string();
                    log = reduce(log, ev);

                    let open = expected
                        .iter()
                        .position(|(t, s, _)| *t == tool && *s == ToolCallStatus::Started);
                    match (status.is_terminal(), open) {
                        (true, Some(idx)) => expected[idx] = (tool, status, step),
                        _ => expected.push((tool, status, step)),
                    }
                }

                let actual: Vec<(usize, ToolCallStatus, usize)> = log
                    .iter()
                    .map(|e| {
                        let tool = tools.iter().position(|t| *t == e.tool_name).unwrap();
                        (tool, e.status, e.timestamp.parse().unwrap())
                    })
                    .collect();
                assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn apply_decodes_payload() {
        let payload = json!({
            "tool_name": "identify_user",
            "status": "started",
            "arguments": {"phone_number": "+15550100"},
            "result": null,
            "timestamp": TS
        })
        .to_string();

        let log = apply(Vec::new(), payload.as_bytes());
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].arguments["phone_number"], "+15550100");
    }

    #[test]
    fn malformed_payloads_leave_log_unchanged() {
        let before = fold(&[event("fetch_slots", ToolCallStatus::Started)]);

        for payload in [
            &b"not json"[..],
            &[0xc3, 0x28][..],
            &br#"{"tool_name":"fetch_slots"}"#[..],
            &br#"{"tool_name":"fetch_slots","status":"done","arguments":{},"timestamp":"x"}"#[..],
            &br#"["fetch_slots","completed"]"#[..],
        ] {
            assert_eq!(apply(before.clone(), payload), before);
        }

        let mut log = ToolCallLog::new();
        log.record(event("fetch_slots", ToolCallStatus::Started));
        assert!(!log.on_data(b"{"));
        assert_eq!(log.entries(), before.as_slice());
    }

    #[test]
    fn apply_and_on_data_share_one_path() {
        let payloads = [
            json!({"tool_name": "fetch_slots", "status": "started", "timestamp": TS}).to_string(),
            "{".to_string(),
            json!({"tool_name": "fetch_slots", "status": "completed", "timestamp": TS}).to_string(),
        ];

        let mut log = ToolCallLog::new();
        let mut folded = Vec::new();
        for payload in &payloads {
            log.on_data(payload.as_bytes());
            folded = apply(folded, payload.as_bytes());
        }

        assert_eq!(log.entries(), folded.as_slice());
        assert_eq!(statuses(&folded), vec![("fetch_slots", ToolCallStatus::Completed)]);
    }

    #[test]
    fn completed_lists_only_successful_calls() {
        let mut log = ToolCallLog::new();
        log.record(event("identify_user", ToolCallStatus::Started));
        log.record(event("identify_user", ToolCallStatus::Completed));
        log.record(event("book_appointment", ToolCallStatus::Started));
        log.record(event("cancel_appointment", ToolCallStatus::Error));

        let done: Vec<&str> = log.completed().map(|e| e.tool_name.as_str()).collect();
        assert_eq!(done, vec!["identify_user"]);

        log.clear();
        assert!(log.is_empty());
    }
}
