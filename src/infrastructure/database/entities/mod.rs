//! Database entities module

pub mod audit_log;
pub mod classification_rule;
pub mod disbursement;
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use classification_rule::Entity as ClassificationRule;
pub use disbursement::Entity as Disbursement;
pub use user::Entity as User;
