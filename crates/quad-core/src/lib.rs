pub mod ids;

pub use ids::{CollegeId, EventId, RegId, StudentId};
