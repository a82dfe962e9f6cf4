//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{EstimateController, HttpPriceClient, LocationLoader, PriceApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(client: HttpPriceClient, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                return;
            }
        };

        let client = Arc::new(client);
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Using estimation server {}",
            client.server_url()
        )));

        runtime.block_on(async move {
            // Each command runs on its own task so a slow request never
            // holds back a newer one.
            while let Ok(cmd) = cmd_rx.recv() {
                let client = Arc::clone(&client);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = handle_command(client.as_ref(), cmd).await;
                    if ui_tx.try_send(event).is_err() {
                        tracing::debug!("ui event queue closed or full; dropping backend result");
                    }
                });
            }
            tracing::info!("backend command channel closed; worker exiting");
        });
    });
}

pub async fn handle_command<A: PriceApi + ?Sized>(api: &A, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::EstimatePrice { ticket, request } => UiEvent::EstimateFinished {
            ticket,
            outcome: EstimateController::request(api, &request).await,
        },
        BackendCommand::LoadLocations { ticket } => UiEvent::LocationsLoaded {
            ticket,
            list: LocationLoader::fetch(api).await,
        },
    }
}
