pub mod attendee_repo;
pub mod schema;
pub mod tracking_repo;
