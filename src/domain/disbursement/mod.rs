//! Disbursement aggregate

pub mod model;
pub mod repository;

pub use model::{
    summarize, Classification, Disbursement, DisbursementFilter, DisbursementSummary,
    DisbursementUpdate, NewDisbursement,
};
pub use repository::DisbursementRepository;
