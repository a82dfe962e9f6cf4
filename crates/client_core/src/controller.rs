//! Page controllers: validate input, talk to the estimator, render results.
//!
//! Both controllers split an action into `begin` (synchronous, touches the
//! page), a network call that needs no page access, and `finish` (renders
//! only if the action was not superseded). Front-ends that keep the page on
//! a UI thread drive the three steps themselves; `submit`/`load` run them in
//! sequence.

use shared::domain::{EstimateRequest, LocationList, LOCATION_PLACEHOLDER};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    outcome::{EstimateOutcome, CALCULATING_TEXT},
    page::EstimatePage,
    PriceApi,
};

/// Identifies one action. Only the most recently issued ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    fn issue(&mut self) -> Ticket {
        self.latest = self.latest.wrapping_add(1);
        Ticket(self.latest)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid square footage")]
    InvalidSquareFootage,
    #[error("Please select a location")]
    MissingLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingEstimate {
    pub ticket: Ticket,
    pub request: EstimateRequest,
}

#[derive(Debug, Default)]
pub struct EstimateController {
    generation: RequestGeneration,
}

impl EstimateController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_request(page: &EstimatePage) -> Result<EstimateRequest, ValidationError> {
        let total_sqft = page
            .square_footage
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|sqft| sqft.is_finite())
            .ok_or(ValidationError::InvalidSquareFootage)?;

        let location = page.locations.value();
        if location.is_empty() || location == LOCATION_PLACEHOLDER {
            return Err(ValidationError::MissingLocation);
        }

        Ok(EstimateRequest {
            total_sqft,
            bhk: page.bhk_count(),
            bath: page.bath_count(),
            location: location.to_string(),
        })
    }

    /// Validates the page and, if valid, marks the output as calculating.
    /// An invalid page gets an alert and no ticket is issued.
    pub fn begin(&mut self, page: &mut EstimatePage) -> Result<PendingEstimate, ValidationError> {
        let request = match Self::build_request(page) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "estimate rejected before sending");
                page.raise_alert(err.to_string());
                return Err(err);
            }
        };

        let ticket = self.generation.issue();
        page.price.set(CALCULATING_TEXT);
        info!(
            total_sqft = request.total_sqft,
            bhk = request.bhk,
            bath = request.bath,
            location = %request.location,
            "submitting price estimate"
        );
        Ok(PendingEstimate { ticket, request })
    }

    pub async fn request<A: PriceApi + ?Sized>(
        api: &A,
        request: &EstimateRequest,
    ) -> EstimateOutcome {
        let reply = api.estimate_price(request).await;
        if let Err(err) = &reply {
            error!(%err, "price estimate request failed");
        }
        let outcome = EstimateOutcome::from_reply(reply);
        if let EstimateOutcome::ServerError(message) = &outcome {
            error!(%message, "server reported an estimate error");
        }
        outcome
    }

    /// Renders `outcome` unless a newer estimate has been started since
    /// `ticket` was issued. Returns whether the page was updated.
    pub fn finish(&self, page: &mut EstimatePage, ticket: Ticket, outcome: &EstimateOutcome) -> bool {
        if !self.generation.is_current(ticket) {
            debug!(?ticket, "discarding superseded estimate result");
            return false;
        }
        page.price.set(outcome.to_string());
        true
    }

    pub async fn submit<A: PriceApi + ?Sized>(
        &mut self,
        page: &mut EstimatePage,
        api: &A,
    ) -> Result<EstimateOutcome, ValidationError> {
        let pending = self.begin(page)?;
        let outcome = Self::request(api, &pending.request).await;
        self.finish(page, pending.ticket, &outcome);
        Ok(outcome)
    }
}

#[derive(Debug, Default)]
pub struct LocationLoader {
    generation: RequestGeneration,
}

impl LocationLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        self.generation.issue()
    }

    /// Never fails: anything but a non-empty server list yields the fallback.
    pub async fn fetch<A: PriceApi + ?Sized>(api: &A) -> LocationList {
        match api.location_names().await {
            Ok(response) if !response.locations.is_empty() => {
                info!(count = response.locations.len(), "loaded locations from server");
                LocationList::from_server(response.locations)
            }
            Ok(_) => {
                warn!("no valid locations data received; using fallback list");
                LocationList::fallback()
            }
            Err(err) => {
                warn!(%err, "error fetching locations; using fallback list");
                LocationList::fallback()
            }
        }
    }

    pub fn finish(&self, page: &mut EstimatePage, ticket: Ticket, list: &LocationList) -> bool {
        if !self.generation.is_current(ticket) {
            debug!(?ticket, "discarding superseded location list");
            return false;
        }
        page.locations.replace_options(list);
        debug!(count = list.len(), source = ?list.source, "location options replaced");
        true
    }

    pub async fn load<A: PriceApi + ?Sized>(
        &mut self,
        page: &mut EstimatePage,
        api: &A,
    ) -> LocationList {
        let ticket = self.begin();
        let list = Self::fetch(api).await;
        self.finish(page, ticket, &list);
        list
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
