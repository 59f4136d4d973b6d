// src/handlers/tutors.rs

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
    models::registry::{CreateTutorPayload, TutorDetail, UpdateTutorPayload},
};

#[utoipa::path(
    post,
    path = "/api/tutors",
    tag = "Tutors",
    request_body = CreateTutorPayload,
    responses(
        (status = 201, description = "Perfil de tutor criado para o usuário logado", body = TutorDetail),
        (status = 409, description = "Usuário já possui perfil de tutor")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tutor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTutorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tutor = app_state.tutor_service.create(&user.caller(), &payload).await?;
    Ok((StatusCode::CREATED, Json(tutor)))
}

#[utoipa::path(
    get,
    path = "/api/tutors",
    tag = "Tutors",
    responses((status = 200, description = "Tutores", body = Vec<TutorDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_tutors(State(app_state): State<AppState>) -> Result<Json<Vec<TutorDetail>>, AppError> {
    Ok(Json(app_state.tutor_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/tutors/me",
    tag = "Tutors",
    responses(
        (status = 200, description = "Perfil de tutor do usuário logado", body = TutorDetail),
        (status = 404, description = "Usuário sem perfil de tutor")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_tutor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TutorDetail>, AppError> {
    Ok(Json(app_state.tutor_service.mine(&user.caller()).await?))
}

#[utoipa::path(
    get,
    path = "/api/tutors/{id}",
    tag = "Tutors",
    params(("id" = Uuid, Path, description = "ID do tutor")),
    responses(
        (status = 200, description = "Tutor", body = TutorDetail),
        (status = 404, description = "Tutor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tutor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TutorDetail>, AppError> {
    Ok(Json(app_state.tutor_service.get(id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/tutors/{id}",
    tag = "Tutors",
    params(("id" = Uuid, Path, description = "ID do tutor")),
    request_body = UpdateTutorPayload,
    responses(
        (status = 200, description = "Tutor atualizado", body = TutorDetail),
        (status = 403, description = "Perfil de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tutor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTutorPayload>,
) -> Result<Json<TutorDetail>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.tutor_service.update(&user.caller(), id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/tutors/{id}",
    tag = "Tutors",
    params(("id" = Uuid, Path, description = "ID do tutor")),
    responses(
        (status = 204, description = "Tutor removido"),
        (status = 400, description = "Tutor com denúncias vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tutor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.tutor_service.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
