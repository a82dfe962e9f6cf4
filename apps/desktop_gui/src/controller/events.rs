//! Events sent from the backend worker to the UI thread.

use client_core::{EstimateOutcome, Ticket};
use shared::domain::LocationList;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    EstimateFinished {
        ticket: Ticket,
        outcome: EstimateOutcome,
    },
    LocationsLoaded {
        ticket: Ticket,
        list: LocationList,
    },
    BackendFailed(String),
}
