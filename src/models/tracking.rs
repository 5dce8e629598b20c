use std::fmt;

/// Category of completed action being deduplicated.
///
/// Stored as plain text in `tracking_entries.purpose` so new purposes can be
/// added without a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPurpose {
    Emailed,
    BadgePrinted,
}

impl TrackingPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingPurpose::Emailed => "emailed",
            TrackingPurpose::BadgePrinted => "badge_printed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "emailed" => Some(TrackingPurpose::Emailed),
            "badge_printed" => Some(TrackingPurpose::BadgePrinted),
            _ => None,
        }
    }
}

impl fmt::Display for TrackingPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackingEntryRow {
    pub barcode: String,
    pub purpose: String,
    pub completed_at: String,
}

/// Attendee that still needs the side effect for a purpose.
///
/// Name and email are guaranteed present by the eligibility filter, the rest
/// mirrors the nullable attendee columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EligibleAttendeeRow {
    pub barcode: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub order_date: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
}
