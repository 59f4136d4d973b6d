pub mod animal;
pub mod auth;
pub mod clinic;
pub mod dashboard;
pub mod entity;
pub mod registry;
pub mod workflow;
