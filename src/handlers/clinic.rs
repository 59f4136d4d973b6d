// src/handlers/clinic.rs

use axum::{
    extract::{Path, Query, State},
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
    models::clinic::{
        ConsultationDetail, ConsultationFilter, CreateConsultationPayload, CreateSurgeryPayload,
        SurgeryDetail, SurgeryFilter,
    },
};

// --- CONSULTAS ---

#[utoipa::path(
    post,
    path = "/api/consultations",
    tag = "Clinic",
    request_body = CreateConsultationPayload,
    responses(
        (status = 201, description = "Consulta registrada", body = ConsultationDetail),
        (status = 404, description = "Animal, veterinário ou tutor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_consultation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateConsultationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let consultation = app_state.clinic_service.create_consultation(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

#[utoipa::path(
    get,
    path = "/api/consultations",
    tag = "Clinic",
    params(ConsultationFilter),
    responses((status = 200, description = "Consultas, da mais recente para a mais antiga", body = Vec<ConsultationDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_consultations(
    State(app_state): State<AppState>,
    Query(filter): Query<ConsultationFilter>,
) -> Result<Json<Vec<ConsultationDetail>>, AppError> {
    Ok(Json(app_state.clinic_service.list_consultations(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/consultations/{id}",
    tag = "Clinic",
    params(("id" = Uuid, Path, description = "ID da consulta")),
    responses(
        (status = 200, description = "Consulta", body = ConsultationDetail),
        (status = 404, description = "Consulta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_consultation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultationDetail>, AppError> {
    Ok(Json(app_state.clinic_service.get_consultation(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/consultations/{id}",
    tag = "Clinic",
    params(("id" = Uuid, Path, description = "ID da consulta")),
    responses((status = 204, description = "Consulta removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_consultation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.clinic_service.delete_consultation(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- CIRURGIAS ---

#[utoipa::path(
    post,
    path = "/api/surgeries",
    tag = "Clinic",
    request_body = CreateSurgeryPayload,
    responses(
        (status = 201, description = "Cirurgia registrada", body = SurgeryDetail),
        (status = 404, description = "Animal ou veterinário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_surgery(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateSurgeryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let surgery = app_state.clinic_service.create_surgery(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(surgery)))
}

#[utoipa::path(
    get,
    path = "/api/surgeries",
    tag = "Clinic",
    params(SurgeryFilter),
    responses((status = 200, description = "Cirurgias, da mais recente para a mais antiga", body = Vec<SurgeryDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_surgeries(
    State(app_state): State<AppState>,
    Query(filter): Query<SurgeryFilter>,
) -> Result<Json<Vec<SurgeryDetail>>, AppError> {
    Ok(Json(app_state.clinic_service.list_surgeries(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/surgeries/{id}",
    tag = "Clinic",
    params(("id" = Uuid, Path, description = "ID da cirurgia")),
    responses(
        (status = 200, description = "Cirurgia", body = SurgeryDetail),
        (status = 404, description = "Cirurgia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_surgery(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SurgeryDetail>, AppError> {
    Ok(Json(app_state.clinic_service.get_surgery(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/surgeries/{id}",
    tag = "Clinic",
    params(("id" = Uuid, Path, description = "ID da cirurgia")),
    responses((status = 204, description = "Cirurgia removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_surgery(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.clinic_service.delete_surgery(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
