//! Plain-text rendering of the client screens.
//!
//! Every function returns a `String` so the terminal binary and the tests
//! share one code path. `color` switches ANSI badge colors on or off.

use crate::format::{
    format_argument, format_relative_time, format_result, format_tool_name, tool_color,
};
use crate::session::{CallSession, ConnectionState};
use crate::tool_calls::ToolCallLog;
use crate::transcript::{AgentState, Transcript};
use ava_types::{CallSummaryData, ToolCallEvent, ToolCallStatus};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const AGENT_TITLE: &str = "Dr. Ava - Appointment Assistant";

fn badge(tool_name: &str, color: bool) -> String {
    let label = format_tool_name(tool_name);
    if color {
        format!("\x1b[{}m[{}]\x1b[0m", tool_color(tool_name).ansi_code(), label)
    } else {
        format!("[{}]", label)
    }
}

fn status_marker(status: ToolCallStatus) -> &'static str {
    match status {
        ToolCallStatus::Started => "...",
        ToolCallStatus::Completed => "ok",
        ToolCallStatus::Error => "!!",
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_welcome(error: Option<&str>, is_loading: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dr. Ava");
    let _ = writeln!(out, "AI Appointment Scheduling Assistant");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Enter your phone number to start a voice conversation with Dr. Ava."
    );
    if let Some(error) = error {
        let _ = writeln!(out, "Error: {}", error);
    }
    if is_loading {
        let _ = writeln!(out, "Connecting...");
    }
    out
}

pub fn render_agent_state(state: AgentState) -> String {
    format!("Dr. Ava ({})", state.label())
}

pub fn render_transcript(transcript: &Transcript) -> String {
    let mut out = String::from("Transcript\n");
    if transcript.is_empty() {
        out.push_str("  Waiting for conversation...\n");
        return out;
    }
    for entry in transcript.entries() {
        let _ = writeln!(out, "  {}: {}", entry.speaker().label(), entry.text);
    }
    out
}

pub fn render_tool_call(event: &ToolCallEvent, now: DateTime<Utc>, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}",
        badge(&event.tool_name, color),
        status_marker(event.status),
        format_relative_time(&event.timestamp, now)
    );

    if !event.arguments.is_empty() {
        let _ = writeln!(out, "  Arguments");
        for (key, value) in &event.arguments {
            let _ = writeln!(out, "    {}: {}", key, format_argument(value));
        }
    }

    if let Some(result) = &event.result {
        let heading = match event.status {
            ToolCallStatus::Completed => Some("Result"),
            ToolCallStatus::Error => Some("Error"),
            ToolCallStatus::Started => None,
        };
        if let Some(heading) = heading {
            let _ = writeln!(out, "  {}", heading);
            let _ = writeln!(out, "{}", indent(&format_result(result), "    "));
        }
    }
    out
}

pub fn render_tool_calls(log: &ToolCallLog, now: DateTime<Utc>, color: bool) -> String {
    let mut out = String::new();
    if log.is_empty() {
        out.push_str("Tool Calls\n");
        out.push_str("  No tool calls yet\n");
        out.push_str("  Tool calls will appear here as the agent works\n");
        return out;
    }

    let _ = writeln!(out, "Tool Calls ({})", log.len());
    for event in log.entries() {
        out.push_str(&indent(&render_tool_call(event, now, color), "  "));
        out.push('\n');
    }
    out
}

pub fn render_summary(summary: &CallSummaryData, log: &ToolCallLog, color: bool) -> String {
    let mut out = String::from("Call Summary\n");
    let _ = writeln!(out, "  {}", summary.summary);

    let completed: Vec<&ToolCallEvent> = log.completed().collect();
    if !completed.is_empty() {
        let _ = writeln!(out, "  Actions performed ({})", completed.len());
        let badges: Vec<String> = completed
            .iter()
            .map(|event| badge(&event.tool_name, color))
            .collect();
        let _ = writeln!(out, "    {}", badges.join(" "));
    }
    out.push_str("  Type `disconnect` to end the call.\n");
    out
}

/// Renders the screen for the session's current state.
pub fn render_session(session: &CallSession, now: DateTime<Utc>, color: bool) -> String {
    match session.state() {
        ConnectionState::Welcome | ConnectionState::Connecting => {
            render_welcome(session.error(), session.is_loading())
        }
        ConnectionState::Connected(_) => {
            let mut out = String::new();
            let _ = writeln!(out, "* {}", AGENT_TITLE);
            let _ = writeln!(out, "{}", render_agent_state(session.agent_state()));
            let _ = writeln!(out);
            out.push_str(&render_transcript(session.transcript()));
            let _ = writeln!(out);
            out.push_str(&render_tool_calls(session.tool_calls(), now, color));
            if let Some(summary) = session.summary().get() {
                let _ = writeln!(out);
                out.push_str(&render_summary(summary, session.tool_calls(), color));
            }
            out
        }
    }
}
