// src/handlers/complaints.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::workflow::{ComplaintDetail, CreateComplaintPayload},
};

#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body = CreateComplaintPayload,
    responses(
        (status = 201, description = "Denúncia registrada", body = ComplaintDetail),
        (status = 404, description = "Tutor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_complaint(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state.complaint_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    responses(
        (status = 200, description = "Todas as denúncias", body = Vec<ComplaintDetail>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_complaints(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<ComplaintDetail>>, AppError> {
    Ok(Json(app_state.complaint_service.list_all(&user.caller()).await?))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da denúncia")),
    responses(
        (status = 200, description = "Denúncia", body = ComplaintDetail),
        (status = 404, description = "Denúncia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_complaint(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplaintDetail>, AppError> {
    Ok(Json(app_state.complaint_service.get(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/analyze",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da denúncia")),
    responses((status = 200, description = "Denúncia em análise", body = ComplaintDetail)),
    security(("api_jwt" = []))
)]
pub async fn analyze_complaint(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplaintDetail>, AppError> {
    Ok(Json(app_state.complaint_service.analyze(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/resolve",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da denúncia")),
    responses((status = 200, description = "Denúncia resolvida", body = ComplaintDetail)),
    security(("api_jwt" = []))
)]
pub async fn resolve_complaint(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplaintDetail>, AppError> {
    Ok(Json(app_state.complaint_service.resolve(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/discard",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da denúncia")),
    responses((status = 200, description = "Denúncia descartada", body = ComplaintDetail)),
    security(("api_jwt" = []))
)]
pub async fn discard_complaint(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplaintDetail>, AppError> {
    Ok(Json(app_state.complaint_service.discard(&user.caller(), id).await?))
}
