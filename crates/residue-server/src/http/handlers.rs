use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use residue_api::{
    parse_manifest_params, ApiError, ApiErrorCode, HealthResponse, ReportAck, ReportSubmission,
};
use residue_model::resolve_delta;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use tracing::{error, info};

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    let body = Json(json!({"error": err}));
    (status, body).into_response()
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let resp = Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
    .into_response();
    with_request_id(resp, &request_id)
}

pub(crate) async fn config_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let resp = Json(state.service.to_response()).into_response();
    with_request_id(resp, &request_id)
}

pub(crate) async fn manifest_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);

    let params = match parse_manifest_params(&query) {
        Ok(params) => params,
        Err(err) => {
            return with_request_id(
                api_error_response(
                    StatusCode::BAD_REQUEST,
                    err.with_request_id(request_id.clone()),
                ),
                &request_id,
            );
        }
    };

    let manifest = match state.store.load() {
        Ok(manifest) => manifest,
        Err(err) => {
            error!(request_id = %request_id, "manifest load failed: {err}");
            return with_request_id(
                api_error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiError::new(
                        ApiErrorCode::ManifestUnavailable,
                        "manifest is currently unavailable",
                        json!({"reason": err.message}),
                        request_id.clone(),
                    ),
                ),
                &request_id,
            );
        }
    };

    let payload = resolve_delta(&manifest, params.last_manifest_version);
    info!(
        request_id = %request_id,
        platform = %params.platform,
        locale = %params.locale,
        manifest_version = manifest.manifest_version,
        client_last_version = ?params.last_manifest_version,
        delta_assets = payload.assets.len(),
        "manifest resolved"
    );
    with_request_id(Json(payload).into_response(), &request_id)
}

pub(crate) async fn report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(submission): Json<ReportSubmission>,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);

    // reported_at is authoritative from the server clock; client-supplied
    // values never enter the record.
    let report = match submission.into_report(Utc::now()) {
        Ok(report) => report,
        Err(err) => {
            return with_request_id(
                api_error_response(
                    StatusCode::BAD_REQUEST,
                    ApiError::validation_failed(&err.0).with_request_id(request_id.clone()),
                ),
                &request_id,
            );
        }
    };

    match state.reports.append(&report).await {
        Ok(()) => {
            info!(
                request_id = %request_id,
                asset_id = %report.asset_id,
                error_code = %report.error_code,
                network_type = report.network_type.as_str(),
                "asset error report accepted"
            );
            with_request_id(Json(ReportAck { accepted: true }).into_response(), &request_id)
        }
        Err(err) => {
            error!(request_id = %request_id, "report append failed: {err}");
            with_request_id(
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ReportAck { accepted: false }),
                )
                    .into_response(),
                &request_id,
            )
        }
    }
}
