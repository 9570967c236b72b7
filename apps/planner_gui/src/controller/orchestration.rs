//! Command orchestration helpers from session effects to backend command queue.

use client_core::Effect;
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

pub fn dispatch_effects(
    cmd_tx: &Sender<BackendCommand>,
    effects: Vec<Effect>,
    banner: &mut Option<UiError>,
) {
    for effect in effects {
        dispatch_backend_command(cmd_tx, BackendCommand::Execute(effect), banner);
    }
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    banner: &mut Option<UiError>,
) {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *banner = Some(UiError::from_message(
                UiErrorContext::CommandQueue,
                "UI command queue is full; please retry",
            ));
        }
        Err(TrySendError::Disconnected(_)) => {
            *banner = Some(UiError::from_message(
                UiErrorContext::CommandQueue,
                "Backend command processor disconnected (possible startup/runtime failure); restart the app",
            ));
        }
    }
}
