//! Semester aggregates.
//!
//! Wraps the per-semester calculator from [`crate::payment_plan`] into
//! [`SemesterBreakdown`]s carrying semester-level totals, and builds the
//! admission fee breakdown.  No money rules live here.

use crate::models::{FeeStructure, PaymentBreakdown, SemesterBreakdown};
use crate::payment_plan::{admission_fee_split, calculate_semester_payment};
use chrono::NaiveDate;

/// The admission fee, due at cohort start.  Only its GST is split out;
/// discount and scholarship never apply to it.
pub fn calculate_admission_fee_breakdown(admission_fee: f64, cohort_start_date: NaiveDate) -> PaymentBreakdown {
    let (base, gst) = admission_fee_split(admission_fee);
    PaymentBreakdown {
        installment_number: 1,
        payment_date: cohort_start_date,
        base_amount: base,
        gst_amount: gst,
        scholarship_amount: 0.0,
        discount_amount: 0.0,
        amount_payable: admission_fee,
    }
}

/// Sums a semester's instalments into a [`SemesterBreakdown`].
pub fn summarize_semester(semester_number: u32, instalments: Vec<PaymentBreakdown>) -> SemesterBreakdown {
    let sum = |f: fn(&PaymentBreakdown) -> f64| -> f64 { instalments.iter().map(f).sum() };
    SemesterBreakdown {
        semester_number,
        base_amount: sum(|p| p.base_amount),
        gst_amount: sum(|p| p.gst_amount),
        scholarship_amount: sum(|p| p.scholarship_amount),
        discount_amount: sum(|p| p.discount_amount),
        total_payable: sum(|p| p.amount_payable),
        instalments,
    }
}

pub fn calculate_semester_breakdown(
    semester_number: u32,
    fee_structure: &FeeStructure,
    instalments_per_semester: u32,
    cohort_start_date: NaiveDate,
    scholarship_amount: f64,
    one_shot_discount: f64,
) -> SemesterBreakdown {
    let instalments = calculate_semester_payment(
        semester_number,
        fee_structure.total_program_fee,
        fee_structure.admission_fee,
        fee_structure.number_of_semesters,
        instalments_per_semester,
        cohort_start_date,
        scholarship_amount,
        one_shot_discount,
    );
    summarize_semester(semester_number, instalments)
}

/// Breakdowns for semesters `1..=number_of_semesters`, in order.
pub fn calculate_all_semesters(
    fee_structure: &FeeStructure,
    instalments_per_semester: u32,
    cohort_start_date: NaiveDate,
    scholarship_amount: f64,
    one_shot_discount: f64,
) -> Vec<SemesterBreakdown> {
    (1..=fee_structure.number_of_semesters)
        .map(|semester| {
            calculate_semester_breakdown(
                semester,
                fee_structure,
                instalments_per_semester,
                cohort_start_date,
                scholarship_amount,
                one_shot_discount,
            )
        })
        .collect()
}
