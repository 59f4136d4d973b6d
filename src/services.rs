pub mod adoption_service;
pub mod animal_service;
pub mod auth;
pub mod city_service;
pub mod clinic_service;
pub mod complaint_service;
pub mod dashboard_service;
pub mod donation_service;
pub mod institution_service;
pub mod tutor_service;
pub mod user_service;
pub mod veterinarian_service;
