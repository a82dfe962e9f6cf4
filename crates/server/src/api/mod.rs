use std::collections::HashMap;

use shared::{
    error::{ApiException, ErrorCode},
    protocol::{EstimateResponse, LocationsResponse},
};
use tracing::info;

use crate::model::PriceModel;

#[derive(Clone)]
pub struct ApiContext {
    pub model: PriceModel,
}

/// Parsed prediction form. Absent fields read as zero or empty, matching
/// what browsers send for blank inputs; validation happens afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInput {
    pub total_sqft: f64,
    pub location: String,
    pub bhk: i64,
    pub bath: i64,
}

impl PredictionInput {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, ApiException> {
        let field = |name: &str, default: &'static str| {
            fields
                .get(name)
                .map(|value| value.trim())
                .unwrap_or(default)
                .to_string()
        };
        let missing = || ApiException::new(ErrorCode::MissingInput, "Missing input parameters");

        Ok(Self {
            total_sqft: field("total_sqft", "0").parse().map_err(|_| missing())?,
            location: field("location", ""),
            bhk: field("bhk", "0").parse().map_err(|_| missing())?,
            bath: field("bath", "0").parse().map_err(|_| missing())?,
        })
    }

    pub fn validate(&self) -> Result<(), ApiException> {
        if !self.total_sqft.is_finite()
            || self.total_sqft <= 0.0
            || self.location.is_empty()
            || self.bhk <= 0
            || self.bath <= 0
        {
            return Err(ApiException::new(
                ErrorCode::Validation,
                "Invalid input parameters",
            ));
        }
        Ok(())
    }
}

pub fn list_locations(ctx: &ApiContext) -> LocationsResponse {
    let locations = ctx.model.locations().to_vec();
    info!(count = locations.len(), "returning locations");
    LocationsResponse { locations }
}

pub fn estimate_price(
    ctx: &ApiContext,
    fields: &HashMap<String, String>,
) -> Result<EstimateResponse, ApiException> {
    let input = PredictionInput::from_fields(fields)?;
    input.validate()?;
    info!(
        total_sqft = input.total_sqft,
        location = %input.location,
        bhk = input.bhk,
        bath = input.bath,
        "processing prediction request"
    );

    let estimated_price = ctx
        .model
        .predict(&input.location, input.total_sqft, input.bhk, input.bath)
        .ok_or_else(|| {
            ApiException::new(ErrorCode::Internal, "model produced a non-finite price")
        })?;
    info!(estimated_price, "estimated price");
    Ok(EstimateResponse::price(estimated_price))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
