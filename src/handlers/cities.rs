// src/handlers/cities.rs

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
    models::registry::{City, CityDetail, CreateCityPayload, UpdateCityPayload},
};

#[utoipa::path(
    post,
    path = "/api/cities",
    tag = "Cities",
    request_body = CreateCityPayload,
    responses(
        (status = 201, description = "Cidade criada", body = City),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_city(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let city = app_state.city_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

#[utoipa::path(
    get,
    path = "/api/cities",
    tag = "Cities",
    responses((status = 200, description = "Cidades com contagem de tutores e veterinários", body = Vec<CityDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_cities(State(app_state): State<AppState>) -> Result<Json<Vec<CityDetail>>, AppError> {
    Ok(Json(app_state.city_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/cities/{id}",
    tag = "Cities",
    params(("id" = Uuid, Path, description = "ID da cidade")),
    responses(
        (status = 200, description = "Cidade", body = CityDetail),
        (status = 404, description = "Cidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_city(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CityDetail>, AppError> {
    Ok(Json(app_state.city_service.get(id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/cities/{id}",
    tag = "Cities",
    params(("id" = Uuid, Path, description = "ID da cidade")),
    request_body = UpdateCityPayload,
    responses(
        (status = 200, description = "Cidade atualizada", body = City),
        (status = 400, description = "Cidade com tutores ou veterinários vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_city(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCityPayload>,
) -> Result<Json<City>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.city_service.update(&user.caller(), id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cities/{id}",
    tag = "Cities",
    params(("id" = Uuid, Path, description = "ID da cidade")),
    responses(
        (status = 204, description = "Cidade removida"),
        (status = 400, description = "Cidade com tutores ou veterinários vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_city(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.city_service.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
