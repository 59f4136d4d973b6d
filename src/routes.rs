// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Todo o resto exige token
    let protected_routes = Router::new()
        .route("/auth/profile", get(handlers::auth::profile))
        .route("/users", get(handlers::users::list_users))
        .route("/users/{id}", get(handlers::users::get_user))
        .route(
            "/cities",
            post(handlers::cities::create_city).get(handlers::cities::list_cities),
        )
        .route(
            "/cities/{id}",
            get(handlers::cities::get_city)
                .patch(handlers::cities::update_city)
                .delete(handlers::cities::delete_city),
        )
        .route(
            "/institutions",
            post(handlers::institutions::create_institution).get(handlers::institutions::list_institutions),
        )
        .route(
            "/institutions/{id}",
            get(handlers::institutions::get_institution)
                .patch(handlers::institutions::update_institution)
                .delete(handlers::institutions::delete_institution),
        )
        .route(
            "/animals",
            post(handlers::animals::create_animal).get(handlers::animals::list_animals),
        )
        .route("/animals/available", get(handlers::animals::list_available_animals))
        .route(
            "/animals/{id}",
            get(handlers::animals::get_animal)
                .patch(handlers::animals::update_animal)
                .delete(handlers::animals::delete_animal),
        )
        .route(
            "/tutors",
            post(handlers::tutors::create_tutor).get(handlers::tutors::list_tutors),
        )
        .route("/tutors/me", get(handlers::tutors::my_tutor))
        .route(
            "/tutors/{id}",
            get(handlers::tutors::get_tutor)
                .patch(handlers::tutors::update_tutor)
                .delete(handlers::tutors::delete_tutor),
        )
        .route(
            "/veterinarians",
            post(handlers::veterinarians::create_veterinarian).get(handlers::veterinarians::list_veterinarians),
        )
        .route(
            "/veterinarians/{id}",
            get(handlers::veterinarians::get_veterinarian)
                .patch(handlers::veterinarians::update_veterinarian)
                .delete(handlers::veterinarians::delete_veterinarian),
        )
        .route(
            "/consultations",
            post(handlers::clinic::create_consultation).get(handlers::clinic::list_consultations),
        )
        .route(
            "/consultations/{id}",
            get(handlers::clinic::get_consultation).delete(handlers::clinic::delete_consultation),
        )
        .route(
            "/surgeries",
            post(handlers::clinic::create_surgery).get(handlers::clinic::list_surgeries),
        )
        .route(
            "/surgeries/{id}",
            get(handlers::clinic::get_surgery).delete(handlers::clinic::delete_surgery),
        )
        .route(
            "/adoptions",
            post(handlers::adoptions::create_adoption).get(handlers::adoptions::list_adoptions),
        )
        .route("/adoptions/mine", get(handlers::adoptions::my_adoptions))
        .route("/adoptions/{id}", get(handlers::adoptions::get_adoption))
        .route("/adoptions/{id}/approve", patch(handlers::adoptions::approve_adoption))
        .route("/adoptions/{id}/reject", patch(handlers::adoptions::reject_adoption))
        .route("/adoptions/{id}/complete", patch(handlers::adoptions::complete_adoption))
        .route(
            "/donations",
            post(handlers::donations::create_donation).get(handlers::donations::list_donations),
        )
        .route("/donations/mine", get(handlers::donations::my_donations))
        .route("/donations/{id}", get(handlers::donations::get_donation))
        .route("/donations/{id}/confirm", patch(handlers::donations::confirm_donation))
        .route("/donations/{id}/deliver", patch(handlers::donations::deliver_donation))
        .route("/donations/{id}/cancel", patch(handlers::donations::cancel_donation))
        .route(
            "/complaints",
            post(handlers::complaints::create_complaint).get(handlers::complaints::list_complaints),
        )
        .route("/complaints/{id}", get(handlers::complaints::get_complaint))
        .route("/complaints/{id}/analyze", patch(handlers::complaints::analyze_complaint))
        .route("/complaints/{id}/resolve", patch(handlers::complaints::resolve_complaint))
        .route("/complaints/{id}/discard", patch(handlers::complaints::discard_complaint))
        .route("/dashboard", get(handlers::dashboard::get_stats))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        // O painel roda em outra origem
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
