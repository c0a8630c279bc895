/*
 * Responsibility
 * - GET / (疎通用, guard なし)
 */
use axum::Json;

use crate::api::dto::drinks::StatusResponse;

pub async fn home() -> Json<StatusResponse> {
    Json(StatusResponse { success: true })
}
