pub mod adoptions;
pub mod animals;
pub mod auth;
pub mod cities;
pub mod clinic;
pub mod complaints;
pub mod dashboard;
pub mod donations;
pub mod institutions;
pub mod tutors;
pub mod users;
pub mod veterinarians;
