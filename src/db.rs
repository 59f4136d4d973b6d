pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

// Implementações de cada domínio sobre o PgTx
mod animal_repo;
mod clinic_repo;
mod registry_repo;
mod user_repo;
mod workflow_repo;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, StoreTx};
