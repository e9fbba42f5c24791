//! Line commands for the terminal client.

use crate::driver::ClientInput;
use crate::protocol::ControlAction;
use lunar_core::{NodeId, PhaseValue};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Parses one line of input. Returns `None` for anything unrecognised.
///
/// ```text
/// select <0-7>   pick a card from the hand
/// place <node>   place the selected card
/// undo | redo | reset
/// anim           toggle animations
/// quit
/// ```
pub fn parse_command(line: &str) -> Option<ClientInput> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_lowercase();
    let argument = parts.next();

    match (command.as_str(), argument) {
        ("select" | "card", Some(raw)) => raw
            .parse::<u8>()
            .ok()
            .and_then(PhaseValue::new)
            .map(ClientInput::CardSelected),
        ("place" | "click", Some(node)) => Some(ClientInput::SquareClicked(NodeId::from(node))),
        ("undo", None) => Some(ClientInput::Control(ControlAction::Undo)),
        ("redo", None) => Some(ClientInput::Control(ControlAction::Redo)),
        ("reset" | "new", None) => Some(ClientInput::Control(ControlAction::Reset)),
        ("anim" | "animations", None) => Some(ClientInput::ToggleAnimations),
        ("quit" | "exit", None) => Some(ClientInput::Shutdown),
        _ => None,
    }
}

/// Reads stdin line by line into the driver's channel until EOF or `quit`.
pub async fn read_stdin(tx: mpsc::UnboundedSender<ClientInput>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("Commands: select <v>, place <node>, undo, redo, reset, anim, quit");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some(input) = parse_command(&line) else {
            warn!(line = %line.trim(), "Unknown command");
            continue;
        };
        debug!(input = ?input, "Console input");
        let quit = input == ClientInput::Shutdown;
        if tx.send(input).is_err() || quit {
            return;
        }
    }

    let _ = tx.send(ClientInput::Shutdown);
}
