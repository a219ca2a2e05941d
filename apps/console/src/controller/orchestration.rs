//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = format!("UI command queue is full; {cmd_name} dropped, please retry");
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected (possible runtime failure); restart the console"
                .to_string();
        }
    }
}

pub fn dispatch_all(
    cmd_tx: &Sender<BackendCommand>,
    cmds: impl IntoIterator<Item = BackendCommand>,
    status: &mut String,
) {
    for cmd in cmds {
        dispatch_backend_command(cmd_tx, cmd, status);
    }
}
