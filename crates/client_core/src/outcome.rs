//! Interpretation of a price estimate reply into the text shown to the user.

use std::fmt;

use shared::{
    domain::PRICE_UNIT,
    protocol::{EstimateResponse, PriceValue},
};

use crate::FetchError;

/// Shown in the price output while a request is in flight.
pub const CALCULATING_TEXT: &str = "Calculating...";

#[derive(Debug, Clone, PartialEq)]
pub enum EstimateOutcome {
    Price(f64),
    /// A numeric price the server sent as text, shown as written.
    QuotedPrice(String),
    /// The server answered with the `"Error"` price sentinel.
    CalculationFailed,
    ServerError(String),
    InvalidResponse,
    ConnectionFailed,
}

impl EstimateOutcome {
    pub fn from_reply(reply: Result<EstimateResponse, FetchError>) -> Self {
        match reply {
            Ok(response) => Self::from_response(response),
            Err(FetchError::UnexpectedShape(_)) => Self::InvalidResponse,
            Err(_) => Self::ConnectionFailed,
        }
    }

    /// A price takes precedence over an `error` field; the sentinel
    /// takes precedence over both.
    pub fn from_response(response: EstimateResponse) -> Self {
        match response.estimated_price {
            Some(ref value) if value.is_error_sentinel() => return Self::CalculationFailed,
            Some(PriceValue::Amount(amount)) if amount.is_finite() => return Self::Price(amount),
            Some(PriceValue::Text(ref text)) => {
                let text = text.trim();
                if text.parse::<f64>().is_ok_and(f64::is_finite) {
                    return Self::QuotedPrice(text.to_string());
                }
            }
            _ => {}
        }

        match response.error {
            Some(error) => Self::ServerError(error),
            None => Self::InvalidResponse,
        }
    }

    pub fn is_price(&self) -> bool {
        matches!(self, Self::Price(_) | Self::QuotedPrice(_))
    }
}

impl fmt::Display for EstimateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price(amount) => write!(f, "{amount} {PRICE_UNIT}"),
            Self::QuotedPrice(text) => write!(f, "{text} {PRICE_UNIT}"),
            Self::CalculationFailed => f.write_str("Error calculating price"),
            Self::ServerError(error) => write!(f, "Error: {error}"),
            Self::InvalidResponse => f.write_str("Invalid response"),
            Self::ConnectionFailed => f.write_str("Error connecting to server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> EstimateResponse {
        serde_json::from_value(json).expect("response json")
    }

    #[test]
    fn renders_price_with_unit() {
        let outcome = EstimateOutcome::from_response(response(serde_json::json!({
            "estimated_price": 83.2
        })));
        assert_eq!(outcome, EstimateOutcome::Price(83.2));
        assert_eq!(outcome.to_string(), "83.2 Lakh");
    }

    #[test]
    fn whole_prices_render_without_fraction() {
        assert_eq!(EstimateOutcome::Price(50.0).to_string(), "50 Lakh");
    }

    #[test]
    fn numeric_text_price_is_accepted() {
        let outcome = EstimateOutcome::from_response(response(serde_json::json!({
            "estimated_price": "64.75"
        })));
        assert!(outcome.is_price());
        assert_eq!(outcome.to_string(), "64.75 Lakh");
    }

    #[test]
    fn text_price_is_shown_as_sent() {
        let outcome = EstimateOutcome::from_response(response(serde_json::json!({
            "estimated_price": " 64.750 "
        })));
        assert_eq!(outcome, EstimateOutcome::QuotedPrice("64.750".into()));
        assert_eq!(outcome.to_string(), "64.750 Lakh");
    }

    #[test]
    fn zero_price_is_a_price() {
        let outcome = EstimateOutcome::from_response(response(serde_json::json!({
            "estimated_price": 0
        })));
        assert_eq!(outcome, EstimateOutcome::Price(0.0));
        assert_eq!(outcome.to_string(), "0 Lakh");

        let quoted = EstimateOutcome::from_response(response(serde_json::json!({
            "estimated_price": "0"
        })));
        assert_eq!(quoted.to_string(), "0 Lakh");
    }

    #[test]
    fn sentinel_wins_over_error_field() {
        let outcome = EstimateOutcome::from_response(response(serde_json::json!({
            "estimated_price": "Error",
            "error": "Invalid input parameters"
        })));
        assert_eq!(outcome.to_string(), "Error calculating price");
    }

    #[test]
    fn error_field_renders_server_message() {
        let outcome = EstimateOutcome::from_response(response(serde_json::json!({
            "error": "model unavailable"
        })));
        assert_eq!(outcome.to_string(), "Error: model unavailable");
    }

    #[test]
    fn unrecognized_bodies_are_invalid() {
        assert_eq!(
            EstimateOutcome::from_response(EstimateResponse::default()).to_string(),
            "Invalid response"
        );
        assert_eq!(
            EstimateOutcome::from_response(response(serde_json::json!({
                "estimated_price": "soon"
            }))),
            EstimateOutcome::InvalidResponse
        );
        assert_eq!(
            EstimateOutcome::from_reply(Err(FetchError::UnexpectedShape("array".into()))),
            EstimateOutcome::InvalidResponse
        );
    }

    #[test]
    fn transport_status_and_decode_failures_are_connection_errors() {
        for error in [
            FetchError::Transport("refused".into()),
            FetchError::Status(500),
            FetchError::Decode("eof".into()),
        ] {
            assert_eq!(
                EstimateOutcome::from_reply(Err(error)).to_string(),
                "Error connecting to server"
            );
        }
    }
}
