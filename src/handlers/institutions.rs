// src/handlers/institutions.rs

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
    models::registry::{
        CreateInstitutionPayload, Institution, InstitutionDetail, UpdateInstitutionPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/institutions",
    tag = "Institutions",
    request_body = CreateInstitutionPayload,
    responses(
        (status = 201, description = "Instituição criada", body = Institution),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_institution(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateInstitutionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let institution = app_state.institution_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(institution)))
}

#[utoipa::path(
    get,
    path = "/api/institutions",
    tag = "Institutions",
    responses((status = 200, description = "Instituições", body = Vec<InstitutionDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_institutions(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<InstitutionDetail>>, AppError> {
    Ok(Json(app_state.institution_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/institutions/{id}",
    tag = "Institutions",
    params(("id" = Uuid, Path, description = "ID da instituição")),
    responses(
        (status = 200, description = "Instituição com seus animais", body = InstitutionDetail),
        (status = 404, description = "Instituição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_institution(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InstitutionDetail>, AppError> {
    Ok(Json(app_state.institution_service.get(id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/institutions/{id}",
    tag = "Institutions",
    params(("id" = Uuid, Path, description = "ID da instituição")),
    request_body = UpdateInstitutionPayload,
    responses(
        (status = 200, description = "Instituição atualizada", body = Institution),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_institution(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInstitutionPayload>,
) -> Result<Json<Institution>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.institution_service.update(&user.caller(), id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/institutions/{id}",
    tag = "Institutions",
    params(("id" = Uuid, Path, description = "ID da instituição")),
    responses(
        (status = 204, description = "Instituição removida"),
        (status = 400, description = "Instituição com animais vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_institution(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.institution_service.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
