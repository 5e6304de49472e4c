//! Poll scheduler — drives [`EngineCore`] from a fixed-rate ticker and a
//! command queue.
//!
//! DESIGN
//! ======
//! One task owns the engine and the host. A `tokio::time::interval` fires at
//! the configured poll rate and runs [`EngineCore::tick`]; commands (joystick
//! samples, toggles, one-shot edits) arrive on an mpsc channel and are handled
//! as soon as they are received. Both are multiplexed with `select!`, so
//! nothing ever runs concurrently with anything else and each handler's reads
//! happen before its own writes.
//!
//! Late ticks are skipped, not bunched.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::engine::{Action, EngineCore};
use crate::input::InputSample;
use crate::scene::SceneAccessor;

/// Messages accepted by the poll loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Input { sample: InputSample },
    ToggleLinkedList,
    ToggleJoystick,
    ToggleCrayon,
    BeautifyCurves,
    AddCaps,
    Shutdown,
}

/// Counters for one run of the poll loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub ticks: u64,
    pub commands: u64,
    /// Actions other than [`Action::None`].
    pub actions: u64,
}

/// Handle one command against the host. Returns `None` for `Shutdown`.
pub fn dispatch(core: &mut EngineCore, host: &mut impl SceneAccessor, command: Command) -> Option<Action> {
    let action = match command {
        Command::Input { sample } => core.on_input(host, sample),
        Command::ToggleLinkedList => {
            core.toggle_linked_list_mode();
            Action::None
        }
        Command::ToggleJoystick => {
            core.toggle_joystick_mode();
            Action::None
        }
        Command::ToggleCrayon => {
            core.toggle_crayon_effect();
            Action::None
        }
        Command::BeautifyCurves => core.beautify_curves(host),
        Command::AddCaps => core.add_caps(host),
        Command::Shutdown => return None,
    };
    Some(action)
}

/// Run until `Shutdown` arrives or every sender is dropped.
pub async fn run_poll_loop(
    core: &mut EngineCore,
    host: &mut impl SceneAccessor,
    mut commands: mpsc::Receiver<Command>,
) -> LoopStats {
    let mut stats = LoopStats::default();
    let mut ticker = tokio::time::interval(core.config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(poll_hz = core.config.poll_hz, "poll loop started");

    loop {
        tokio::select! {
            maybe_command = commands.recv() => {
                let Some(command) = maybe_command else {
                    debug!("command channel closed");
                    break;
                };
                stats.commands += 1;
                match dispatch(core, host, command) {
                    Some(Action::None) => {}
                    Some(action) => {
                        debug!(?action, "command handled");
                        stats.actions += 1;
                    }
                    None => break,
                }
            }
            _ = ticker.tick() => {
                stats.ticks += 1;
                if core.tick(host) != Action::None {
                    stats.actions += 1;
                }
            }
        }
    }

    info!(ticks = stats.ticks, commands = stats.commands, actions = stats.actions, "poll loop stopped");
    stats
}
