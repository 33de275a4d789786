//! Google Maps Distance Matrix API as a [`DistanceProvider`].
//!
//! Origins and destinations are the same location list, so the response rows
//! map one-to-one onto the solver's matrix. Distances arrive in metres and are
//! converted to kilometres.

use serde::Deserialize;

use crate::domain::{
    distance::DistanceMatrix,
    distance_provider::ProviderError,
};

#[cfg(feature = "google-maps")]
use crate::domain::distance_provider::DistanceProvider;
#[cfg(feature = "google-maps")]
use log::debug;
#[cfg(feature = "google-maps")]
use std::time::Duration;

pub const DISTANCE_MATRIX_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

const METRES_PER_KILOMETRE: f64 = 1000.0;

/// The API separates places with `|`, so a name containing one cannot be sent.
const PLACE_SEPARATOR: char = '|';

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<ResponseRow>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseRow {
    pub elements: Vec<ResponseElement>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseElement {
    pub status: String,
    #[serde(default)]
    pub distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub struct TextValue {
    pub value: f64,
}

/// Joins location names into one `origins`/`destinations` query value.
pub fn join_places(locations: &[String]) -> Result<String, ProviderError> {
    if let Some(name) = locations.iter().find(|l| l.contains(PLACE_SEPARATOR)) {
        return Err(ProviderError::Request(format!(
            "location '{}' contains the reserved separator '{}'",
            name, PLACE_SEPARATOR
        )));
    }
    Ok(locations.join(&PLACE_SEPARATOR.to_string()))
}

/// Turns a decoded API response into a kilometre matrix of `expected` locations.
pub fn parse_distance_matrix(
    response: DistanceMatrixResponse,
    expected: usize,
) -> Result<DistanceMatrix, ProviderError> {
    if response.status != "OK" {
        return Err(ProviderError::Api {
            message: response
                .error_message
                .unwrap_or_else(|| "distance matrix request rejected".to_string()),
            status: response.status,
        });
    }

    if response.rows.len() != expected {
        return Err(ProviderError::LocationCountMismatch {
            requested: expected,
            available: response.rows.len(),
        });
    }

    let mut data = Vec::with_capacity(expected * expected);
    for (i, row) in response.rows.into_iter().enumerate() {
        if row.elements.len() != expected {
            return Err(ProviderError::LocationCountMismatch {
                requested: expected,
                available: row.elements.len(),
            });
        }
        for (j, element) in row.elements.into_iter().enumerate() {
            match (element.status.as_str(), element.distance) {
                ("OK", Some(distance)) => data.push(distance.value / METRES_PER_KILOMETRE),
                (status, _) => {
                    return Err(ProviderError::Api {
                        status: status.to_string(),
                        message: format!("no distance from location {} to location {}", i, j),
                    })
                }
            }
        }
    }

    Ok(DistanceMatrix::from_data(expected, data)?)
}

/// Driving distances between addresses or place names.
#[cfg(feature = "google-maps")]
pub struct GoogleMapsDistanceProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    mode: String,
}

#[cfg(feature = "google-maps")]
impl GoogleMapsDistanceProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: DISTANCE_MATRIX_ENDPOINT.to_string(),
            mode: "driving".to_string(),
        })
    }

    /// Travel mode passed to the API (`driving`, `walking`, `bicycling`, `transit`)
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(feature = "google-maps")]
#[tonic::async_trait]
impl DistanceProvider for GoogleMapsDistanceProvider {
    async fn distance_matrix(
        &self,
        locations: &[String],
    ) -> Result<DistanceMatrix, ProviderError> {
        let places = join_places(locations)?;
        debug!("Requesting {}x{} distance matrix", locations.len(), locations.len());

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("origins", places.as_str()),
                ("destinations", places.as_str()),
                ("mode", self.mode.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProviderError::Request(e.without_url().to_string()))?;

        let body: DistanceMatrixResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        parse_distance_matrix(body, locations.len())
    }

    fn name(&self) -> &str {
        "Google Maps"
    }
}
