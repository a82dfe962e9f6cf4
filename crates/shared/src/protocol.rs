use serde::{Deserialize, Serialize};

/// Literal the server puts in `estimated_price` when it could not price a request.
pub const PRICE_ERROR_SENTINEL: &str = "Error";

pub const PREDICT_PATH: &str = "/predict_home_price";
pub const LOCATIONS_PATH: &str = "/get_location_names";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Amount(f64),
    Text(String),
}

impl PriceValue {
    pub fn error_sentinel() -> Self {
        Self::Text(PRICE_ERROR_SENTINEL.to_string())
    }

    pub fn is_error_sentinel(&self) -> bool {
        matches!(self, Self::Text(text) if text == PRICE_ERROR_SENTINEL)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<PriceValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EstimateResponse {
    pub fn price(amount: f64) -> Self {
        Self {
            estimated_price: Some(PriceValue::Amount(amount)),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub locations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_value_accepts_number_or_sentinel() {
        let priced: EstimateResponse =
            serde_json::from_str(r#"{"estimated_price": 83.2}"#).expect("json");
        assert_eq!(priced.estimated_price, Some(PriceValue::Amount(83.2)));

        let failed: EstimateResponse =
            serde_json::from_str(r#"{"estimated_price": "Error", "error": "bad"}"#).expect("json");
        assert!(failed
            .estimated_price
            .as_ref()
            .is_some_and(PriceValue::is_error_sentinel));
        assert_eq!(failed.error.as_deref(), Some("bad"));
    }

    #[test]
    fn empty_object_decodes_to_empty_response() {
        let empty: EstimateResponse = serde_json::from_str("{}").expect("json");
        assert_eq!(empty, EstimateResponse::default());
    }

    #[test]
    fn price_response_serializes_without_error_key() {
        let body = serde_json::to_value(EstimateResponse::price(51.5)).expect("json");
        assert_eq!(body, serde_json::json!({ "estimated_price": 51.5 }));
    }
}
