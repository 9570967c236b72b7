//! Runtime bridge between UI command queue and backend event intake.

use std::{path::PathBuf, sync::Arc, thread};

use client_core::{execute, ClientSettings, Completion, DirectoryArtifactSink, HttpCatalogClient};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Artifacts land where a browser download would.
pub fn resolve_download_dir(settings: &ClientSettings) -> PathBuf {
    settings
        .download_dir
        .clone()
        .or_else(dirs::download_dir)
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Never blocks the runtime thread; a completion the UI cannot take is dropped.
pub fn forward_completion(ui_tx: &Sender<UiEvent>, completion: Completion) -> bool {
    match ui_tx.try_send(UiEvent::Completed(completion)) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!("ui event queue is full; dropping completion");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!("ui event channel closed; dropping completion");
            false
        }
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let service = match HttpCatalogClient::from_settings(&settings) {
            Ok(client) => Arc::new(client),
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                tracing::error!(server_url = %settings.server_url, "invalid catalog client: {err}");
                return;
            }
        };
        let download_dir = resolve_download_dir(&settings);
        tracing::info!(
            server_url = %service.base_url(),
            download_dir = %download_dir.display(),
            "backend worker ready"
        );
        let sink = Arc::new(DirectoryArtifactSink::new(download_dir));
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let BackendCommand::Execute(effect) = cmd;
                tracing::debug!(effect = effect.name(), "backend: execute");
                // Effects run concurrently; the session orders their completions.
                let service = Arc::clone(&service);
                let sink = Arc::clone(&sink);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let completion = execute(service.as_ref(), sink.as_ref(), effect).await;
                    forward_completion(&ui_tx, completion);
                });
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use client_core::Ticket;
    use crossbeam_channel::bounded;

    use super::*;

    fn dismissal() -> Completion {
        // Any completion works; tickets only come from a session.
        let mut session = client_core::PlannerSession::default();
        let effects = session.toggle_degree(shared::domain::DegreeId::from("CS"));
        let ticket: Ticket = match effects.as_slice() {
            [client_core::Effect::ResolveCampuses { ticket, .. }] => *ticket,
            other => panic!("unexpected effects {other:?}"),
        };
        Completion::DismissDue { ticket }
    }

    #[test]
    fn full_ui_queue_drops_instead_of_blocking() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        assert!(forward_completion(&ui_tx, dismissal()));
        assert!(!forward_completion(&ui_tx, dismissal()));
        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::Completed(_))));
        assert!(ui_rx.try_recv().is_err());
    }

    #[test]
    fn closed_ui_queue_is_reported() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        drop(ui_rx);
        assert!(!forward_completion(&ui_tx, dismissal()));
    }
}
