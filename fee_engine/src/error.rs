//! Error types for the Fee Engine.
//!
//! The calculation functions themselves are total and never fail.
//! These errors belong to the validation layer in front of them (see
//! [`crate::engine::review`]), which rejects inputs the pure functions
//! would otherwise turn into `NaN` or infinite amounts.

use thiserror::Error;

/// A fee structure or review request the engine refuses to compute.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("number of semesters must be at least 1")]
    ZeroSemesters,

    #[error("instalments per semester must be at least 1")]
    ZeroInstalments,

    #[error("number of semesters must be at most {max}, got {got}")]
    TooManySemesters { got: u32, max: u32 },

    #[error("instalments per semester must be at most {max}, got {got}")]
    TooManyInstalments { got: u32, max: u32 },

    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },

    #[error("{field} must be a finite number")]
    NonFiniteAmount { field: &'static str },

    #[error("one-shot discount percentage must be between 0 and 100, got {0}")]
    DiscountOutOfRange(f64),

    #[error("admission fee base exceeds the total program fee")]
    AdmissionFeeExceedsProgramFee,

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("scholarship {id:?} awards {value}%, expected 0 to 100")]
    ScholarshipAmountOutOfRange { id: String, value: f64 },

    #[error("scholarship {id:?} band starts above where it ends")]
    InvertedScholarshipBand { id: String },

    #[error("unknown scholarship id {0:?}")]
    UnknownScholarship(String),

    #[error("invalid scholarship ranges: {}", .0.join("; "))]
    ScholarshipRanges(Vec<String>),
}

/// Top-level error type for the engine's validated entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeeEngineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}
