use serde::{Deserialize, Serialize};

/// Text of the disabled first entry of every location dropdown.
pub const LOCATION_PLACEHOLDER: &str = "Select a location";

/// Unit suffix appended to a rendered price (1 Lakh = 100,000).
pub const PRICE_UNIT: &str = "Lakh";

/// Bedroom and bathroom count used when no radio choice is checked.
pub const DEFAULT_ROOM_COUNT: u32 = 2;

/// Choices offered by the BHK and bathroom radio groups.
pub const ROOM_COUNT_CHOICES: [u32; 5] = [1, 2, 3, 4, 5];

/// Locations shown when the server list cannot be loaded.
pub const FALLBACK_LOCATIONS: [&str; 10] = [
    "1st Block Jayanagar",
    "1st Phase JP Nagar",
    "Electronic City",
    "Whitefield",
    "Sarjapur Road",
    "HSR Layout",
    "Koramangala",
    "Bannerghatta Road",
    "MG Road",
    "Indiranagar",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub total_sqft: f64,
    pub bhk: u32,
    pub bath: u32,
    pub location: String,
}

impl EstimateRequest {
    /// Multipart field names paired with their string values, in wire order.
    pub fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            ("total_sqft", self.total_sqft.to_string()),
            ("bhk", self.bhk.to_string()),
            ("bath", self.bath.to_string()),
            ("location", self.location.clone()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Server,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationList {
    pub names: Vec<String>,
    pub source: LocationSource,
}

impl LocationList {
    pub fn from_server(names: Vec<String>) -> Self {
        Self {
            names,
            source: LocationSource::Server,
        }
    }

    pub fn fallback() -> Self {
        Self {
            names: FALLBACK_LOCATIONS.iter().map(|name| name.to_string()).collect(),
            source: LocationSource::Fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
