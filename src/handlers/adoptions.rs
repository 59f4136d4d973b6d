// src/handlers/adoptions.rs

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
    models::workflow::{AdoptionDetail, CreateAdoptionPayload},
};

#[utoipa::path(
    post,
    path = "/api/adoptions",
    tag = "Adoptions",
    request_body = CreateAdoptionPayload,
    responses(
        (status = 201, description = "Pedido de adoção criado como PENDENTE", body = AdoptionDetail),
        (status = 400, description = "Animal não está disponível para adoção"),
        (status = 404, description = "Animal não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_adoption(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateAdoptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let adoption = app_state.adoption_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(adoption)))
}

#[utoipa::path(
    get,
    path = "/api/adoptions",
    tag = "Adoptions",
    responses(
        (status = 200, description = "Todas as adoções", body = Vec<AdoptionDetail>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_adoptions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<AdoptionDetail>>, AppError> {
    Ok(Json(app_state.adoption_service.list_all(&user.caller()).await?))
}

#[utoipa::path(
    get,
    path = "/api/adoptions/mine",
    tag = "Adoptions",
    responses((status = 200, description = "Adoções do usuário logado", body = Vec<AdoptionDetail>)),
    security(("api_jwt" = []))
)]
pub async fn my_adoptions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<AdoptionDetail>>, AppError> {
    Ok(Json(app_state.adoption_service.mine(&user.caller()).await?))
}

#[utoipa::path(
    get,
    path = "/api/adoptions/{id}",
    tag = "Adoptions",
    params(("id" = Uuid, Path, description = "ID da adoção")),
    responses(
        (status = 200, description = "Adoção", body = AdoptionDetail),
        (status = 403, description = "Adoção de outro usuário"),
        (status = 404, description = "Adoção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_adoption(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdoptionDetail>, AppError> {
    Ok(Json(app_state.adoption_service.get(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/adoptions/{id}/approve",
    tag = "Adoptions",
    params(("id" = Uuid, Path, description = "ID da adoção")),
    responses(
        (status = 200, description = "Adoção aprovada; o animal passa a ADOTADO", body = AdoptionDetail),
        (status = 400, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_adoption(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdoptionDetail>, AppError> {
    Ok(Json(app_state.adoption_service.approve(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/adoptions/{id}/reject",
    tag = "Adoptions",
    params(("id" = Uuid, Path, description = "ID da adoção")),
    responses(
        (status = 200, description = "Adoção rejeitada", body = AdoptionDetail),
        (status = 400, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_adoption(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdoptionDetail>, AppError> {
    Ok(Json(app_state.adoption_service.reject(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/adoptions/{id}/complete",
    tag = "Adoptions",
    params(("id" = Uuid, Path, description = "ID da adoção")),
    responses(
        (status = 200, description = "Adoção concluída; o animal passa a ADOTADO", body = AdoptionDetail),
        (status = 400, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_adoption(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdoptionDetail>, AppError> {
    Ok(Json(app_state.adoption_service.complete(&user.caller(), id).await?))
}
