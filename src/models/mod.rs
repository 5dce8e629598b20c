#[allow(dead_code)]
pub mod attendees;
pub mod tracking;

pub use attendees::AttendeeRow;
pub use attendees::NewAttendee;
pub use tracking::EligibleAttendeeRow;
pub use tracking::TrackingEntryRow;
pub use tracking::TrackingPurpose;
