pub mod backup_service;
pub mod collateral_service;
pub mod email_service;
pub mod import_service;
pub mod mailer_service;
pub mod session_service;
pub mod ticketing_service;
pub mod tracking_service;
