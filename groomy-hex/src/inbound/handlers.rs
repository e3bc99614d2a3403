//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use groomy_types::{
    AppError, PaymentCancelRequest, PaymentConfirmRequest, PaymentGateway,
    ReservationRepository,
};

use crate::ReservationPaymentService;

/// Application state shared across handlers.
pub struct AppState<R: ReservationRepository, G: PaymentGateway> {
    pub service: ReservationPaymentService<R, G>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Confirm a checkout payment and create the reservation.
#[tracing::instrument(skip(state, req), fields(order_id = %req.order_id, quote_id = %req.quote_id))]
pub async fn confirm_payment<R: ReservationRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<PaymentConfirmRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.confirm_payment(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Cancel an approved payment and its reservation.
#[tracing::instrument(skip(state, req), fields(payment_key = %req.payment_key))]
pub async fn cancel_payment<R: ReservationRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Json(req): Json<PaymentCancelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.cancel_payment(req).await?;
    Ok(Json(response))
}

/// Payment detail lookup by provider key.
#[tracing::instrument(skip(state), fields(payment_key = %payment_key))]
pub async fn get_payment<R: ReservationRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(payment_key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.get_payment(&payment_key).await?;
    Ok(Json(response))
}

/// Logically delete a payment from the user's history.
#[tracing::instrument(skip(state), fields(payment_key = %payment_key))]
pub async fn delete_payment<R: ReservationRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Path(payment_key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_payment(&payment_key).await?;
    Ok(StatusCode::NO_CONTENT)
}
