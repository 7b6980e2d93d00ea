//! Terminal client for an Ava voice call.
//!
//! Requests a room credential from the Ava server, then replays room events
//! read from stdin (one per line, see [`ava_client::room`]) and redraws the
//! call screen after each one. Logs go to stderr; the screen goes to stdout.

use ava_client::render::render_session;
use ava_client::{parse_room_event, CallSession, TokenClient};
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ava-client <server-url> <phone-number>";

fn draw(session: &CallSession, color: bool) {
    println!("{}", render_session(session, chrono::Utc::now(), color));
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(server_url), Some(phone_number)) = (args.next(), args.next()) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let color = std::io::stdout().is_terminal();
    let mut session = CallSession::new(TokenClient::new(&server_url));

    if session.connect(&phone_number).await.is_err() {
        draw(&session, color);
        std::process::exit(1);
    }
    draw(&session, color);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("failed to read room events from stdin: {}", e);
                break;
            }
        };

        let event = match parse_room_event(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(line = %line, "skipping room event: {}", e);
                continue;
            }
        };

        let still_connected = session.handle_room_event(event);
        draw(&session, color);
        if !still_connected {
            return;
        }
    }

    session.disconnect();
    draw(&session, color);
}
