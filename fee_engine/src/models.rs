//! Data models for the Fee Engine.
//!
//! The `models` module defines the serialisable structs and enums
//! consumed and produced by the engine.  Inputs (`FeeStructure`,
//! `Scholarship`) mirror the columns of the backing store and are
//! snake_case on the wire; outputs (`PaymentBreakdown` and the
//! aggregates built from it) are camelCase because that is what the
//! presentation layer reads.  Every value here is transient: reviews
//! are recomputed from caller-supplied inputs on each call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fee configuration of a cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructure {
    /// GST-exclusive base fee across the whole program.
    pub total_program_fee: f64,
    /// Admission fee, GST-inclusive.  The admission fee's base is
    /// carved out of `total_program_fee` when computing the remaining
    /// balance; it is never added on top of it.
    pub admission_fee: f64,
    pub number_of_semesters: u32,
    pub instalments_per_semester: u32,
    /// Discount applied to the one-shot plan, as a percentage (e.g.
    /// `10.0` for 10%).
    pub one_shot_discount_percentage: f64,
}

/// A scholarship band.
///
/// A student whose test score falls within `start_percentage..=
/// end_percentage` is eligible for `amount_percentage` percent of the
/// program fee.  Bands within a set must not overlap and names must be
/// unique; see [`crate::scholarship::validate_scholarship_ranges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: String,
    pub name: String,
    pub start_percentage: f64,
    pub end_percentage: f64,
    pub amount_percentage: f64,
}

/// Selects which breakdown builder runs.  Not a persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    /// The whole remaining fee paid at cohort start, eligible for the
    /// one-shot discount.
    OneShot,
    /// One payment per semester.
    SemWise,
    /// Several instalments within each semester.
    InstalmentWise,
}

impl PaymentPlan {
    /// All plans, in the order they are presented for comparison.
    pub const ALL: [PaymentPlan; 3] = [
        PaymentPlan::OneShot,
        PaymentPlan::SemWise,
        PaymentPlan::InstalmentWise,
    ];
}

/// The atomic output unit: one payment on one date.
///
/// `amount_payable` is `max(0, base - discount - scholarship + gst)`,
/// with GST computed on the amount left after discount and
/// scholarship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    /// 1-based position within the owning semester.  Always 1 for the
    /// admission fee and the one-shot payment.
    pub installment_number: u32,
    pub payment_date: NaiveDate,
    /// GST-exclusive amount before any deduction.
    pub base_amount: f64,
    pub gst_amount: f64,
    pub scholarship_amount: f64,
    pub discount_amount: f64,
    pub amount_payable: f64,
}

/// The instalments of one semester plus semester-level sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterBreakdown {
    pub semester_number: u32,
    pub instalments: Vec<PaymentBreakdown>,
    pub base_amount: f64,
    pub gst_amount: f64,
    pub scholarship_amount: f64,
    pub discount_amount: f64,
    pub total_payable: f64,
}

/// Program-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    /// Program fee alone, i.e. the total program fee less the
    /// admission fee.
    pub total_program_fee: f64,
    pub admission_fee: f64,
    pub total_gst: f64,
    pub total_discount: f64,
    pub total_scholarship: f64,
    pub total_amount_payable: f64,
}

/// Top-level output, rendered read-only by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructureReview {
    pub payment_plan: PaymentPlan,
    pub selected_scholarship_id: Option<String>,
    pub admission_fee: PaymentBreakdown,
    /// Populated for the semester-wise and instalment-wise plans only.
    pub semesters: Vec<SemesterBreakdown>,
    /// Populated for the one-shot plan only.
    pub one_shot_payment: Option<PaymentBreakdown>,
    pub overall_summary: OverallSummary,
}

/// Input to the validated review entry point and the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub fee_structure: FeeStructure,
    #[serde(default)]
    pub scholarships: Vec<Scholarship>,
    pub payment_plan: PaymentPlan,
    /// Informational only; scholarship selection is by id.
    #[serde(default)]
    pub test_score: Option<f64>,
    /// Cohort start date as `YYYY-MM-DD`.
    pub cohort_start_date: String,
    #[serde(default)]
    pub selected_scholarship_id: Option<String>,
}

/// Outcome of [`crate::scholarship::validate_scholarship_ranges`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}
