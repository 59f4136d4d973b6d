// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::profile,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,

        // --- Cidades ---
        handlers::cities::create_city,
        handlers::cities::list_cities,
        handlers::cities::get_city,
        handlers::cities::update_city,
        handlers::cities::delete_city,

        // --- Instituições ---
        handlers::institutions::create_institution,
        handlers::institutions::list_institutions,
        handlers::institutions::get_institution,
        handlers::institutions::update_institution,
        handlers::institutions::delete_institution,

        // --- Animais ---
        handlers::animals::create_animal,
        handlers::animals::list_animals,
        handlers::animals::list_available_animals,
        handlers::animals::get_animal,
        handlers::animals::update_animal,
        handlers::animals::delete_animal,

        // --- Tutores ---
        handlers::tutors::create_tutor,
        handlers::tutors::list_tutors,
        handlers::tutors::my_tutor,
        handlers::tutors::get_tutor,
        handlers::tutors::update_tutor,
        handlers::tutors::delete_tutor,

        // --- Veterinários ---
        handlers::veterinarians::create_veterinarian,
        handlers::veterinarians::list_veterinarians,
        handlers::veterinarians::get_veterinarian,
        handlers::veterinarians::update_veterinarian,
        handlers::veterinarians::delete_veterinarian,

        // --- Clínica ---
        handlers::clinic::create_consultation,
        handlers::clinic::list_consultations,
        handlers::clinic::get_consultation,
        handlers::clinic::delete_consultation,
        handlers::clinic::create_surgery,
        handlers::clinic::list_surgeries,
        handlers::clinic::get_surgery,
        handlers::clinic::delete_surgery,

        // --- Adoções ---
        handlers::adoptions::create_adoption,
        handlers::adoptions::list_adoptions,
        handlers::adoptions::my_adoptions,
        handlers::adoptions::get_adoption,
        handlers::adoptions::approve_adoption,
        handlers::adoptions::reject_adoption,
        handlers::adoptions::complete_adoption,

        // --- Doações ---
        handlers::donations::create_donation,
        handlers::donations::list_donations,
        handlers::donations::my_donations,
        handlers::donations::get_donation,
        handlers::donations::confirm_donation,
        handlers::donations::deliver_donation,
        handlers::donations::cancel_donation,

        // --- Denúncias ---
        handlers::complaints::create_complaint,
        handlers::complaints::list_complaints,
        handlers::complaints::get_complaint,
        handlers::complaints::analyze_complaint,
        handlers::complaints::resolve_complaint,
        handlers::complaints::discard_complaint,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserSummary,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Cadastros ---
            models::registry::City,
            models::registry::CityDetail,
            models::registry::CreateCityPayload,
            models::registry::UpdateCityPayload,
            models::registry::Institution,
            models::registry::InstitutionDetail,
            models::registry::CreateInstitutionPayload,
            models::registry::UpdateInstitutionPayload,
            models::registry::Tutor,
            models::registry::TutorDetail,
            models::registry::CreateTutorPayload,
            models::registry::UpdateTutorPayload,
            models::registry::Veterinarian,
            models::registry::VeterinarianDetail,
            models::registry::CreateVeterinarianPayload,
            models::registry::UpdateVeterinarianPayload,

            // --- Animais ---
            models::animal::AnimalStatus,
            models::animal::Animal,
            models::animal::AnimalDetail,
            models::animal::CreateAnimalPayload,
            models::animal::UpdateAnimalPayload,

            // --- Clínica ---
            models::clinic::Consultation,
            models::clinic::ConsultationDetail,
            models::clinic::CreateConsultationPayload,
            models::clinic::Surgery,
            models::clinic::SurgeryDetail,
            models::clinic::CreateSurgeryPayload,

            // --- Fluxos ---
            models::workflow::AdoptionStatus,
            models::workflow::Adoption,
            models::workflow::AdoptionDetail,
            models::workflow::CreateAdoptionPayload,
            models::workflow::DonationStatus,
            models::workflow::Donation,
            models::workflow::DonationDetail,
            models::workflow::CreateDonationPayload,
            models::workflow::ComplaintStatus,
            models::workflow::Complaint,
            models::workflow::ComplaintDetail,
            models::workflow::CreateComplaintPayload,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::AnimalStats,
            models::dashboard::AdoptionStats,
            models::dashboard::DonationStats,
            models::dashboard::ComplaintStats,
            models::dashboard::TotalOnly,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Contas de usuário"),
        (name = "Cities", description = "Cidades atendidas"),
        (name = "Institutions", description = "Abrigos e clínicas parceiras"),
        (name = "Animals", description = "Animais e seu status"),
        (name = "Tutors", description = "Perfis de tutor (adotantes)"),
        (name = "Veterinarians", description = "Veterinários"),
        (name = "Clinic", description = "Consultas e Cirurgias"),
        (name = "Adoptions", description = "Pedidos de adoção"),
        (name = "Donations", description = "Doações para instituições"),
        (name = "Complaints", description = "Denúncias contra tutores"),
        (name = "Dashboard", description = "Indicadores do painel administrativo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
