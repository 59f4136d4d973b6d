// src/handlers/animals.rs

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
    models::animal::{AnimalDetail, CreateAnimalPayload, UpdateAnimalPayload},
};

#[utoipa::path(
    post,
    path = "/api/animals",
    tag = "Animals",
    request_body = CreateAnimalPayload,
    responses(
        (status = 201, description = "Animal cadastrado", body = AnimalDetail),
        (status = 404, description = "Tutor ou instituição não encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_animal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateAnimalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let animal = app_state.animal_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(animal)))
}

#[utoipa::path(
    get,
    path = "/api/animals",
    tag = "Animals",
    responses((status = 200, description = "Todos os animais", body = Vec<AnimalDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_animals(State(app_state): State<AppState>) -> Result<Json<Vec<AnimalDetail>>, AppError> {
    Ok(Json(app_state.animal_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/animals/available",
    tag = "Animals",
    responses((status = 200, description = "Animais disponíveis para adoção", body = Vec<AnimalDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_available_animals(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<AnimalDetail>>, AppError> {
    Ok(Json(app_state.animal_service.available().await?))
}

#[utoipa::path(
    get,
    path = "/api/animals/{id}",
    tag = "Animals",
    params(("id" = Uuid, Path, description = "ID do animal")),
    responses(
        (status = 200, description = "Animal com histórico clínico", body = AnimalDetail),
        (status = 404, description = "Animal não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_animal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnimalDetail>, AppError> {
    Ok(Json(app_state.animal_service.get(id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/animals/{id}",
    tag = "Animals",
    params(("id" = Uuid, Path, description = "ID do animal")),
    request_body = UpdateAnimalPayload,
    responses(
        (status = 200, description = "Animal atualizado", body = AnimalDetail),
        (status = 400, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_animal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAnimalPayload>,
) -> Result<Json<AnimalDetail>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.animal_service.update(&user.caller(), id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/animals/{id}",
    tag = "Animals",
    params(("id" = Uuid, Path, description = "ID do animal")),
    responses(
        (status = 204, description = "Animal removido"),
        (status = 400, description = "Animal com consultas ou cirurgias vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_animal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.animal_service.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
