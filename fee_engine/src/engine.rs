//! Fee structure review engine.
//!
//! The `engine` module turns a fee structure, a scholarship list and a
//! payment plan into a [`FeeStructureReview`].
//! [`generate_fee_structure_review`] is the pure orchestrator: it
//! trusts its input, so a zero semester count yields `NaN`/infinite
//! amounts.  [`review`] puts a validation layer in front of it and is
//! what services should call.  [`review_all_plans`] and
//! [`review_batch`] use the [`rayon`] crate to fan calculations out
//! across CPU cores.

use crate::dates::parse_date_string;
use crate::error::{FeeEngineError, ValidationError};
use crate::gst::calculate_gst;
use crate::models::{
    FeeStructure, FeeStructureReview, OverallSummary, PaymentPlan, ReviewRequest, Scholarship,
};
use crate::payment_plan::{admission_fee_split, calculate_one_shot_discount, calculate_one_shot_payment};
use crate::scholarship::{find_scholarship_by_id, scholarship_amount_for, validate_scholarship_ranges};
use crate::semester::{calculate_admission_fee_breakdown, calculate_all_semesters};
use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::debug;

/// Builds the review for `payment_plan`.
///
/// The scholarship is selected by `selected_scholarship_id`; an id not
/// present in `scholarships` means no scholarship.  `test_score` does
/// not influence the result.
pub fn generate_fee_structure_review(
    fee_structure: &FeeStructure,
    scholarships: &[Scholarship],
    payment_plan: PaymentPlan,
    test_score: Option<f64>,
    cohort_start_date: NaiveDate,
    selected_scholarship_id: Option<&str>,
) -> FeeStructureReview {
    let selected_scholarship =
        selected_scholarship_id.and_then(|id| find_scholarship_by_id(id, scholarships));
    let scholarship_amount =
        scholarship_amount_for(fee_structure.total_program_fee, selected_scholarship);
    debug!(
        ?payment_plan,
        ?test_score,
        scholarship = ?selected_scholarship.map(|s| s.name.as_str()),
        scholarship_amount,
        semesters = fee_structure.number_of_semesters,
        "generating fee structure review"
    );

    let admission_fee = calculate_admission_fee_breakdown(fee_structure.admission_fee, cohort_start_date);

    let (semesters, one_shot_payment) = match payment_plan {
        PaymentPlan::OneShot => {
            let payment = calculate_one_shot_payment(
                fee_structure.total_program_fee,
                fee_structure.admission_fee,
                fee_structure.one_shot_discount_percentage,
                scholarship_amount,
                cohort_start_date,
            );
            (Vec::new(), Some(payment))
        }
        PaymentPlan::SemWise => (
            calculate_all_semesters(fee_structure, 1, cohort_start_date, scholarship_amount, 0.0),
            None,
        ),
        PaymentPlan::InstalmentWise => (
            calculate_all_semesters(
                fee_structure,
                fee_structure.instalments_per_semester,
                cohort_start_date,
                scholarship_amount,
                0.0,
            ),
            None,
        ),
    };

    FeeStructureReview {
        payment_plan,
        selected_scholarship_id: selected_scholarship.map(|s| s.id.clone()),
        admission_fee,
        semesters,
        one_shot_payment,
        overall_summary: overall_summary(fee_structure, payment_plan, scholarship_amount),
    }
}

/// Program-wide totals.  The discount is only granted on the one-shot
/// plan, and is taken on the scholarship-reduced fee including the
/// admission base.
fn overall_summary(fee_structure: &FeeStructure, payment_plan: PaymentPlan, scholarship_amount: f64) -> OverallSummary {
    let (admission_fee_base, admission_fee_gst) = admission_fee_split(fee_structure.admission_fee);
    let program_fee_after_scholarship =
        fee_structure.total_program_fee - admission_fee_base - scholarship_amount;
    let total_gst = calculate_gst(program_fee_after_scholarship) + admission_fee_gst;
    let total_discount = match payment_plan {
        PaymentPlan::OneShot => calculate_one_shot_discount(
            program_fee_after_scholarship + admission_fee_base,
            fee_structure.one_shot_discount_percentage,
        ),
        PaymentPlan::SemWise | PaymentPlan::InstalmentWise => 0.0,
    };
    let total_amount_payable =
        (program_fee_after_scholarship + admission_fee_base + total_gst - total_discount).max(0.0);

    OverallSummary {
        total_program_fee: fee_structure.total_program_fee - fee_structure.admission_fee,
        admission_fee: fee_structure.admission_fee,
        total_gst,
        total_discount,
        total_scholarship: scholarship_amount,
        total_amount_payable,
    }
}

/// Upper bound on `number_of_semesters` accepted by [`review`].
pub const MAX_SEMESTERS: u32 = 24;

/// Upper bound on `instalments_per_semester` accepted by [`review`].
pub const MAX_INSTALMENTS_PER_SEMESTER: u32 = 12;

fn check_amount(value: f64, field: &'static str) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteAmount { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeAmount { field });
    }
    Ok(())
}

/// Rejects fee structures the pure calculators cannot handle sensibly.
pub fn validate_fee_structure(fee_structure: &FeeStructure) -> Result<(), ValidationError> {
    if fee_structure.number_of_semesters == 0 {
        return Err(ValidationError::ZeroSemesters);
    }
    if fee_structure.instalments_per_semester == 0 {
        return Err(ValidationError::ZeroInstalments);
    }
    if fee_structure.number_of_semesters > MAX_SEMESTERS {
        return Err(ValidationError::TooManySemesters {
            got: fee_structure.number_of_semesters,
            max: MAX_SEMESTERS,
        });
    }
    if fee_structure.instalments_per_semester > MAX_INSTALMENTS_PER_SEMESTER {
        return Err(ValidationError::TooManyInstalments {
            got: fee_structure.instalments_per_semester,
            max: MAX_INSTALMENTS_PER_SEMESTER,
        });
    }
    check_amount(fee_structure.total_program_fee, "total_program_fee")?;
    check_amount(fee_structure.admission_fee, "admission_fee")?;
    let discount = fee_structure.one_shot_discount_percentage;
    if !(0.0..=100.0).contains(&discount) {
        return Err(ValidationError::DiscountOutOfRange(discount));
    }
    let (admission_fee_base, _) = admission_fee_split(fee_structure.admission_fee);
    if admission_fee_base > fee_structure.total_program_fee {
        return Err(ValidationError::AdmissionFeeExceedsProgramFee);
    }
    Ok(())
}

/// Rejects scholarships awarding outside 0..=100 percent or whose band
/// is inverted.  Overlaps and names are checked separately by
/// [`validate_scholarship_ranges`].
pub fn validate_scholarships(scholarships: &[Scholarship]) -> Result<(), ValidationError> {
    for s in scholarships {
        if !(0.0..=100.0).contains(&s.amount_percentage) {
            return Err(ValidationError::ScholarshipAmountOutOfRange {
                id: s.id.clone(),
                value: s.amount_percentage,
            });
        }
        if s.start_percentage.partial_cmp(&s.end_percentage).map_or(true, |o| o.is_gt()) {
            return Err(ValidationError::InvertedScholarshipBand { id: s.id.clone() });
        }
    }
    Ok(())
}

/// Validates `request` and builds its review.
///
/// On top of the fee structure checks this rejects malformed cohort
/// start dates, malformed, overlapping or duplicate scholarship bands,
/// and a selected scholarship id missing from the list.
pub fn review(request: &ReviewRequest) -> Result<FeeStructureReview, FeeEngineError> {
    validate_fee_structure(&request.fee_structure)?;
    let cohort_start_date = parse_date_string(&request.cohort_start_date)?;
    validate_scholarships(&request.scholarships)?;
    let ranges = validate_scholarship_ranges(&request.scholarships, None);
    if !ranges.is_valid {
        return Err(ValidationError::ScholarshipRanges(ranges.errors).into());
    }
    if let Some(id) = request.selected_scholarship_id.as_deref() {
        if find_scholarship_by_id(id, &request.scholarships).is_none() {
            return Err(ValidationError::UnknownScholarship(id.to_string()).into());
        }
    }
    Ok(generate_fee_structure_review(
        &request.fee_structure,
        &request.scholarships,
        request.payment_plan,
        request.test_score,
        cohort_start_date,
        request.selected_scholarship_id.as_deref(),
    ))
}

/// Reviews `request` under every payment plan, in [`PaymentPlan::ALL`]
/// order, ignoring the plan it names.
pub fn review_all_plans(request: &ReviewRequest) -> Result<Vec<FeeStructureReview>, FeeEngineError> {
    PaymentPlan::ALL
        .par_iter()
        .map(|plan| {
            review(&ReviewRequest {
                payment_plan: *plan,
                ..request.clone()
            })
        })
        .collect()
}

/// Reviews many requests in parallel.  Results keep input order and a
/// failing request does not affect the others.
pub fn review_batch(requests: &[ReviewRequest]) -> Vec<Result<FeeStructureReview, FeeEngineError>> {
    requests.par_iter().map(review).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee_structure() -> FeeStructure {
        FeeStructure {
            total_program_fee: 100000.0,
            admission_fee: 11800.0,
            number_of_semesters: 3,
            instalments_per_semester: 3,
            one_shot_discount_percentage: 10.0,
        }
    }

    fn scholarships() -> Vec<Scholarship> {
        vec![
            Scholarship {
                id: "merit".into(),
                name: "Merit".into(),
                start_percentage: 60.0,
                end_percentage: 79.99,
                amount_percentage: 5.0,
            },
            Scholarship {
                id: "topper".into(),
                name: "Topper".into(),
                start_percentage: 80.0,
                end_percentage: 100.0,
                amount_percentage: 10.0,
            },
        ]
    }

    fn request(plan: PaymentPlan) -> ReviewRequest {
        ReviewRequest {
            fee_structure: fee_structure(),
            scholarships: scholarships(),
            payment_plan: plan,
            test_score: Some(85.0),
            cohort_start_date: "2025-01-01".into(),
            selected_scholarship_id: Some("topper".into()),
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn one_shot_review() {
        let review = generate_fee_structure_review(
            &fee_structure(),
            &scholarships(),
            PaymentPlan::OneShot,
            None,
            start(),
            None,
        );
        assert!(review.semesters.is_empty());
        let payment = review.one_shot_payment.unwrap();
        assert_eq!(payment.amount_payable, 95580.0);
        assert_eq!(review.admission_fee.amount_payable, 11800.0);

        let summary = review.overall_summary;
        assert_eq!(summary.total_program_fee, 88200.0);
        assert_eq!(summary.admission_fee, 11800.0);
        // 90000 * 0.18 + 1800
        assert_eq!(summary.total_gst, 18000.0);
        assert_eq!(summary.total_discount, 10000.0);
        assert_eq!(summary.total_amount_payable, 108000.0);
    }

    #[test]
    fn scholarship_selected_by_id_not_score() {
        let review = generate_fee_structure_review(
            &fee_structure(),
            &scholarships(),
            PaymentPlan::InstalmentWise,
            Some(95.0),
            start(),
            Some("merit"),
        );
        assert_eq!(review.selected_scholarship_id.as_deref(), Some("merit"));
        assert_eq!(review.overall_summary.total_scholarship, 5000.0);
    }

    #[test]
    fn unknown_id_means_no_scholarship() {
        let review = generate_fee_structure_review(
            &fee_structure(),
            &scholarships(),
            PaymentPlan::SemWise,
            None,
            start(),
            Some("ghost"),
        );
        assert!(review.selected_scholarship_id.is_none());
        assert_eq!(review.overall_summary.total_scholarship, 0.0);
    }

    #[test]
    fn instalment_wise_review_applies_scholarship_to_last_semester() {
        let review = generate_fee_structure_review(
            &fee_structure(),
            &scholarships(),
            PaymentPlan::InstalmentWise,
            None,
            start(),
            Some("topper"),
        );
        assert!(review.one_shot_payment.is_none());
        assert_eq!(review.semesters.len(), 3);
        for semester in &review.semesters[..2] {
            assert_eq!(semester.instalments.len(), 3);
            assert!(semester.instalments.iter().all(|p| p.scholarship_amount == 0.0));
        }
        let last = &review.semesters[2];
        let shares: Vec<f64> = last.instalments.iter().map(|p| p.scholarship_amount).collect();
        assert_eq!(shares, vec![0.0, 4000.0, 6000.0]);

        let summary = &review.overall_summary;
        assert_eq!(summary.total_discount, 0.0);
        // (80000 * 0.18) + 1800
        assert_eq!(summary.total_gst, 16200.0);
        assert_eq!(summary.total_amount_payable, 106200.0);
    }

    #[test]
    fn sem_wise_review_has_one_payment_per_semester() {
        let review = generate_fee_structure_review(
            &fee_structure(),
            &[],
            PaymentPlan::SemWise,
            None,
            start(),
            None,
        );
        let dates: Vec<NaiveDate> = review
            .semesters
            .iter()
            .map(|s| {
                assert_eq!(s.instalments.len(), 1);
                s.instalments[0].payment_date
            })
            .collect();
        assert_eq!(
            dates,
            vec![
                start(),
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ]
        );
        assert!(review.semesters.iter().all(|s| s.base_amount == 30000.0));
        assert!(review.semesters.iter().all(|s| s.total_payable == 35400.0));
    }

    #[test]
    fn review_is_idempotent() {
        let req = request(PaymentPlan::InstalmentWise);
        assert_eq!(review(&req).unwrap(), review(&req).unwrap());
    }

    #[test]
    fn validation_rejects_zero_semesters() {
        let mut req = request(PaymentPlan::SemWise);
        req.fee_structure.number_of_semesters = 0;
        assert_eq!(review(&req), Err(ValidationError::ZeroSemesters.into()));
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let mut fs = fee_structure();
        fs.instalments_per_semester = 0;
        assert_eq!(validate_fee_structure(&fs), Err(ValidationError::ZeroInstalments));

        let mut fs = fee_structure();
        fs.admission_fee = -1.0;
        assert_eq!(
            validate_fee_structure(&fs),
            Err(ValidationError::NegativeAmount { field: "admission_fee" })
        );

        let mut fs = fee_structure();
        fs.total_program_fee = f64::NAN;
        assert_eq!(
            validate_fee_structure(&fs),
            Err(ValidationError::NonFiniteAmount { field: "total_program_fee" })
        );

        let mut fs = fee_structure();
        fs.one_shot_discount_percentage = 120.0;
        assert_eq!(validate_fee_structure(&fs), Err(ValidationError::DiscountOutOfRange(120.0)));

        let mut fs = fee_structure();
        fs.admission_fee = 200000.0;
        assert_eq!(
            validate_fee_structure(&fs),
            Err(ValidationError::AdmissionFeeExceedsProgramFee)
        );
    }

    #[test]
    fn validation_caps_semester_and_instalment_counts() {
        let mut fs = fee_structure();
        fs.number_of_semesters = MAX_SEMESTERS;
        fs.instalments_per_semester = MAX_INSTALMENTS_PER_SEMESTER;
        assert_eq!(validate_fee_structure(&fs), Ok(()));

        fs.number_of_semesters = u32::MAX;
        assert_eq!(
            validate_fee_structure(&fs),
            Err(ValidationError::TooManySemesters { got: u32::MAX, max: 24 })
        );

        let mut fs = fee_structure();
        fs.instalments_per_semester = u32::MAX;
        assert_eq!(
            validate_fee_structure(&fs),
            Err(ValidationError::TooManyInstalments { got: u32::MAX, max: 12 })
        );
    }

    #[test]
    fn validation_rejects_malformed_scholarships() {
        let mut req = request(PaymentPlan::OneShot);
        req.scholarships[0].amount_percentage = -20.0;
        assert_eq!(
            review(&req),
            Err(ValidationError::ScholarshipAmountOutOfRange {
                id: "merit".into(),
                value: -20.0
            }
            .into())
        );

        let mut req = request(PaymentPlan::OneShot);
        req.scholarships[1].amount_percentage = 150.0;
        assert!(matches!(
            review(&req),
            Err(FeeEngineError::Validation(ValidationError::ScholarshipAmountOutOfRange { .. }))
        ));

        let mut req = request(PaymentPlan::OneShot);
        req.scholarships[1].start_percentage = 100.0;
        req.scholarships[1].end_percentage = 90.0;
        assert_eq!(
            review(&req),
            Err(ValidationError::InvertedScholarshipBand { id: "topper".into() }.into())
        );
    }

    #[test]
    fn validation_rejects_bad_request_fields() {
        let mut req = request(PaymentPlan::OneShot);
        req.cohort_start_date = "01/01/2025".into();
        assert_eq!(
            review(&req),
            Err(ValidationError::InvalidDate("01/01/2025".into()).into())
        );

        let mut req = request(PaymentPlan::OneShot);
        req.selected_scholarship_id = Some("ghost".into());
        assert_eq!(
            review(&req),
            Err(ValidationError::UnknownScholarship("ghost".into()).into())
        );

        let mut req = request(PaymentPlan::OneShot);
        req.scholarships[1].start_percentage = 70.0;
        assert!(matches!(
            review(&req),
            Err(FeeEngineError::Validation(ValidationError::ScholarshipRanges(_)))
        ));
    }

    #[test]
    fn all_plans_in_order() {
        let reviews = review_all_plans(&request(PaymentPlan::SemWise)).unwrap();
        let plans: Vec<PaymentPlan> = reviews.iter().map(|r| r.payment_plan).collect();
        assert_eq!(plans, PaymentPlan::ALL.to_vec());
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let mut bad = request(PaymentPlan::OneShot);
        bad.fee_structure.number_of_semesters = 0;
        let results = review_batch(&[request(PaymentPlan::OneShot), bad, request(PaymentPlan::SemWise)]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().payment_plan, PaymentPlan::OneShot);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().payment_plan, PaymentPlan::SemWise);
    }
}
