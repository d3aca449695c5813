//! HTTP request handlers for the PIAWE engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_piawe_with_rules;
use crate::models::Jurisdiction;

use super::request::PiaweRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/piawe/calculate", post(calculate_handler))
        .route("/jurisdictions/:code", get(jurisdiction_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn rejection_to_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for POST /piawe/calculate.
///
/// Accepts payslips, an injury date, a jurisdiction, and optional
/// adjustments, and returns the full calculation record.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<PiaweRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing PIAWE calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = rejection_to_error(rejection, correlation_id);
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let start_time = Instant::now();
    match calculate_piawe_with_rules(
        state.rules(),
        &request.payslips,
        &request.injury_date,
        &request.jurisdiction,
        &request.adjustments,
    ) {
        Ok(calculation) => {
            info!(
                correlation_id = %correlation_id,
                calculation_id = %calculation.id,
                jurisdiction = %calculation.jurisdiction,
                payslips_count = request.payslips.len(),
                final_piawe = %calculation.final_piawe,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, calculation)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /jurisdictions/:code.
///
/// Returns the rule set the engine applies for a jurisdiction.
async fn jurisdiction_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    match code.parse::<Jurisdiction>() {
        Ok(jurisdiction) => json_response(StatusCode::OK, state.rules().get_rules(jurisdiction)),
        Err(err) => {
            warn!(code = %code, "Unknown jurisdiction requested");
            ApiErrorResponse::from(err).into_response()
        }
    }
}
