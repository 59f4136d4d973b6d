// src/handlers/donations.rs

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
    models::workflow::{CreateDonationPayload, DonationDetail},
};

#[utoipa::path(
    post,
    path = "/api/donations",
    tag = "Donations",
    request_body = CreateDonationPayload,
    responses(
        (status = 201, description = "Doação registrada como PENDENTE", body = DonationDetail),
        (status = 404, description = "Instituição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_donation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateDonationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let donation = app_state.donation_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

#[utoipa::path(
    get,
    path = "/api/donations",
    tag = "Donations",
    responses(
        (status = 200, description = "Todas as doações", body = Vec<DonationDetail>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_donations(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<DonationDetail>>, AppError> {
    Ok(Json(app_state.donation_service.list_all(&user.caller()).await?))
}

#[utoipa::path(
    get,
    path = "/api/donations/mine",
    tag = "Donations",
    responses((status = 200, description = "Doações do usuário logado", body = Vec<DonationDetail>)),
    security(("api_jwt" = []))
)]
pub async fn my_donations(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<DonationDetail>>, AppError> {
    Ok(Json(app_state.donation_service.mine(&user.caller()).await?))
}

#[utoipa::path(
    get,
    path = "/api/donations/{id}",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "ID da doação")),
    responses(
        (status = 200, description = "Doação", body = DonationDetail),
        (status = 404, description = "Doação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_donation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DonationDetail>, AppError> {
    Ok(Json(app_state.donation_service.get(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/donations/{id}/confirm",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "ID da doação")),
    responses((status = 200, description = "Doação confirmada", body = DonationDetail)),
    security(("api_jwt" = []))
)]
pub async fn confirm_donation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DonationDetail>, AppError> {
    Ok(Json(app_state.donation_service.confirm(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/donations/{id}/deliver",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "ID da doação")),
    responses((status = 200, description = "Doação entregue", body = DonationDetail)),
    security(("api_jwt" = []))
)]
pub async fn deliver_donation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DonationDetail>, AppError> {
    Ok(Json(app_state.donation_service.deliver(&user.caller(), id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/donations/{id}/cancel",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "ID da doação")),
    responses((status = 200, description = "Doação cancelada", body = DonationDetail)),
    security(("api_jwt" = []))
)]
pub async fn cancel_donation(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DonationDetail>, AppError> {
    Ok(Json(app_state.donation_service.cancel(&user.caller(), id).await?))
}
