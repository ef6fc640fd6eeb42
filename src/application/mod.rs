pub mod services;
pub mod session;

pub use services::{DisbursementService, ReportService};
pub use session::{AuthError, AuthProvider, Session, SessionEvent, SessionStore, SharedSessionStore};
