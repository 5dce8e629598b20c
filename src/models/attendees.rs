#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendeeRow {
    pub barcode: String,
    pub order_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub order_date: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub lunch_preference: Option<String>,
    pub coc_accepted: Option<i64>,
    pub volunteer_interest: Option<i64>,
    pub social_handles: Option<String>,
}

/// Attendee as delivered by the ticketing import, before it hits the store.
#[derive(Debug, Clone)]
pub struct NewAttendee {
    pub barcode: String,
    pub order_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub order_date: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub lunch_preference: Option<String>,
    pub coc_accepted: Option<i64>,
    pub volunteer_interest: Option<i64>,
    pub social_handles: Option<String>,
}
