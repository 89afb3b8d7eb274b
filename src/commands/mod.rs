pub mod auth;
pub mod crop;
pub mod employee;
pub mod farm;
pub mod inventory;
pub mod livestock;
pub mod plot;
pub mod transaction;
pub mod vehicle;
pub mod vendor;
