pub mod colleges;
pub mod database;
pub mod error;
pub mod events;
pub mod registrations;
pub mod reports;
pub mod row_helpers;
pub mod schema;
pub mod students;

pub use database::Database;
pub use error::StoreError;
