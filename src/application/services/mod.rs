//! Application services

pub mod disbursement_service;
pub mod report_service;

pub use disbursement_service::DisbursementService;
pub use report_service::ReportService;
