//! Backend commands queued from UI to backend worker.

use client_core::Ticket;
use shared::domain::EstimateRequest;

#[derive(Debug, Clone)]
pub enum BackendCommand {
    EstimatePrice {
        ticket: Ticket,
        request: EstimateRequest,
    },
    LoadLocations {
        ticket: Ticket,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EstimatePrice { .. } => "estimate_price",
            Self::LoadLocations { .. } => "load_locations",
        }
    }
}
