pub mod attendees;
pub mod dashboard;
pub mod tracking;
