//! HTTP handlers for country and subdivision lookups.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use country_states::{Dataset, LookupError};

/// Application state shared across handlers
pub struct AppState {
    pub dataset: Dataset,
}

type HandlerResult<T> = Result<Json<T>, (StatusCode, String)>;

fn not_found(err: LookupError) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, err.to_string())
}

/// Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        countries: state.dataset.len(),
        subdivisions: state.dataset.subdivision_count(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub countries: usize,
    pub subdivisions: usize,
}

/// Country metadata by alpha-2 code
pub async fn country_handler(
    State(state): State<Arc<AppState>>,
    Path(alpha2): Path<String>,
) -> HandlerResult<CountryResponse> {
    let country = state
        .dataset
        .country(&alpha2)
        .ok_or_else(|| not_found(LookupError::InvalidCountryAlpha2))?;

    let record = &country.record;
    Ok(Json(CountryResponse {
        alpha_2: record.alpha_2.clone(),
        alpha_3: record.alpha_3.clone(),
        name: record.name.clone(),
        official_name: record.official_name.clone(),
        common_name: record.common_name.clone(),
        numeric: record.numeric.clone(),
        subdivisions: country.subdivision_count(),
    }))
}

#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub alpha_2: String,
    pub alpha_3: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    pub numeric: String,
    pub subdivisions: usize,
}

#[derive(Debug, Deserialize)]
pub struct CountryNameParams {
    pub name: String,
}

/// Alpha-2 code for a country name
pub async fn country_alpha2_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CountryNameParams>,
) -> HandlerResult<Alpha2Response> {
    let alpha2 = state
        .dataset
        .country_name_to_alpha2(&params.name)
        .map_err(not_found)?;

    Ok(Json(Alpha2Response {
        alpha2: alpha2.to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct Alpha2Response {
    pub alpha2: String,
}

#[derive(Debug, Deserialize)]
pub struct SubdivisionNameParams {
    /// Alpha-2 code or country name
    pub country: String,
    pub name: String,
}

/// Subdivision code for a subdivision name
pub async fn subdivision_code_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubdivisionNameParams>,
) -> HandlerResult<SubdivisionCodeResponse> {
    let code = state
        .dataset
        .subdivision_name_to_code(&params.country, &params.name)
        .map_err(not_found)?;

    debug!("{} / {} -> {}", params.country, params.name, code);

    Ok(Json(SubdivisionCodeResponse {
        code: code.to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SubdivisionCodeResponse {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct SubdivisionCodeParams {
    /// Alpha-2 code or country name
    pub country: String,
    pub code: String,
}

/// Subdivision names and type for a subdivision code
pub async fn subdivision_name_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubdivisionCodeParams>,
) -> HandlerResult<SubdivisionResponse> {
    let node = state
        .dataset
        .subdivision(&params.country, &params.code)
        .map_err(not_found)?;

    Ok(Json(SubdivisionResponse {
        code: params.code,
        name: node.name.clone(),
        local_name: node.local_name.clone(),
        language_code: node.language_code.clone(),
        kind: node.kind.clone(),
        children: node.children.keys().cloned().collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SubdivisionResponse {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// Local codes of direct children
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

/// Whether a subdivision code exists in a country
pub async fn subdivision_valid_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubdivisionCodeParams>,
) -> Json<ValidResponse> {
    Json(ValidResponse {
        valid: state
            .dataset
            .valid_subdivision_code(&params.country, &params.code),
    })
}

#[derive(Debug, Serialize)]
pub struct ValidResponse {
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use country_states::{build_dataset, BuildOptions, CountryRecord, SubdivisionRecord};

    fn state() -> Arc<AppState> {
        let countries = vec![CountryRecord {
            alpha_2: "GB".to_string(),
            alpha_3: "GBR".to_string(),
            name: "United Kingdom".to_string(),
            official_name: Some("United Kingdom of Great Britain and Northern Ireland".to_string()),
            common_name: None,
            numeric: "826".to_string(),
        }];
        let subdivisions = vec![
            SubdivisionRecord {
                code: "GB-ENG".to_string(),
                name: "England".to_string(),
                local_name: None,
                language_code: None,
                parent: None,
                kind: "Country".to_string(),
            },
            SubdivisionRecord {
                code: "GB-LND".to_string(),
                name: "London, City of".to_string(),
                local_name: None,
                language_code: None,
                parent: Some("GB-ENG".to_string()),
                kind: "City corporation".to_string(),
            },
        ];
        let dataset = build_dataset(&countries, &subdivisions, &BuildOptions::default()).unwrap();
        Arc::new(AppState { dataset })
    }

    #[tokio::test]
    async fn test_health() {
        let Json(health) = health_handler(State(state())).await;
        assert_eq!(health.countries, 1);
        assert_eq!(health.subdivisions, 2);
    }

    #[tokio::test]
    async fn test_country_by_alpha2() {
        let Json(country) = country_handler(State(state()), Path("gb".to_string()))
            .await
            .unwrap();
        assert_eq!(country.alpha_3, "GBR");
        assert_eq!(country.subdivisions, 2);
    }

    #[tokio::test]
    async fn test_unknown_country_is_not_found() {
        let (status, message) = country_handler(State(state()), Path("ZZ".to_string()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "invalid country alpha2");
    }

    #[tokio::test]
    async fn test_subdivision_code_by_country_name() {
        let params = SubdivisionNameParams {
            country: "united kingdom".to_string(),
            name: "london, city of".to_string(),
        };
        let Json(response) = subdivision_code_handler(State(state()), Query(params))
            .await
            .unwrap();
        assert_eq!(response.code, "LND");
    }

    #[tokio::test]
    async fn test_subdivision_name_lists_children() {
        let params = SubdivisionCodeParams {
            country: "GB".to_string(),
            code: "ENG".to_string(),
        };
        let Json(response) = subdivision_name_handler(State(state()), Query(params))
            .await
            .unwrap();
        assert_eq!(response.name, "England");
        assert_eq!(response.children, ["LND"]);
    }

    #[tokio::test]
    async fn test_subdivision_valid() {
        let params = SubdivisionCodeParams {
            country: "GB".to_string(),
            code: "ZZ".to_string(),
        };
        let Json(response) = subdivision_valid_handler(State(state()), Query(params)).await;
        assert!(!response.valid);
    }
}
