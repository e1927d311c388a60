//! Payment plan calculations.
//!
//! This module holds the money-splitting rules of the engine: how a
//! semester's fee is spread across its instalments, how a scholarship
//! is allocated against instalments, and how one-shot and per-semester
//! payments are broken down into base amount, discount, scholarship
//! and GST.
//!
//! The step order inside each builder is fixed.  GST is always
//! computed on what remains after discount and scholarship, and
//! negative payables are clamped to zero (a payment fully covered by
//! scholarship or discount is not an error).  Only the GST, discount
//! and scholarship helpers round; instalment amounts, shares and
//! payables are carried unrounded so stored schedules reproduce
//! exactly.

use crate::dates::generate_semester_payment_dates;
use crate::gst::{calculate_gst, extract_base_amount_from_total, extract_gst_from_total, round2};
use crate::models::PaymentBreakdown;
use chrono::NaiveDate;

/// Percentage split of a semester's fee across `n` instalments.
///
/// Two, three and four instalments are front-loaded (`[60, 40]`,
/// `[40, 40, 20]`, `[30, 30, 30, 10]`) so that more of the fee is
/// collected early.  Any other count is split evenly.
pub fn get_instalment_distribution(n: u32) -> Vec<f64> {
    match n {
        2 => vec![60.0, 40.0],
        3 => vec![40.0, 40.0, 20.0],
        4 => vec![30.0, 30.0, 30.0, 10.0],
        _ => vec![100.0 / f64::from(n); n as usize],
    }
}

/// Allocates `total_scholarship` against `installment_amounts`,
/// starting from the last instalment and moving backwards.
///
/// Each slot receives at most its own amount.  Whatever cannot be
/// allocated once every slot is exhausted is dropped.
pub fn distribute_scholarship_backwards(installment_amounts: &[f64], total_scholarship: f64) -> Vec<f64> {
    let mut distributed = vec![0.0; installment_amounts.len()];
    let mut remaining = total_scholarship;
    for (slot, amount) in distributed.iter_mut().zip(installment_amounts).rev() {
        if remaining <= 0.0 {
            break;
        }
        let share = remaining.min(*amount).max(0.0);
        *slot = share;
        remaining -= share;
    }
    distributed
}

pub fn calculate_one_shot_discount(base_amount: f64, discount_percentage: f64) -> f64 {
    round2(base_amount * discount_percentage / 100.0)
}

/// The single lump-sum payment of the one-shot plan, due at cohort
/// start.  The admission fee is paid separately, so only its base is
/// carved out of the program fee here.
pub fn calculate_one_shot_payment(
    total_program_fee: f64,
    admission_fee: f64,
    discount_percentage: f64,
    scholarship_amount: f64,
    cohort_start_date: NaiveDate,
) -> PaymentBreakdown {
    let admission_fee_base = extract_base_amount_from_total(admission_fee);
    let remaining_base_fee = total_program_fee - admission_fee_base;
    let one_shot_discount = calculate_one_shot_discount(remaining_base_fee, discount_percentage);
    let amount_after_discount = remaining_base_fee - one_shot_discount;
    let amount_after_scholarship = amount_after_discount - scholarship_amount;
    let gst = calculate_gst(amount_after_scholarship);
    let final_amount = (amount_after_scholarship + gst).max(0.0);

    PaymentBreakdown {
        installment_number: 1,
        payment_date: cohort_start_date,
        base_amount: remaining_base_fee,
        gst_amount: gst,
        scholarship_amount,
        discount_amount: one_shot_discount,
        amount_payable: final_amount,
    }
}

/// Instalment breakdowns of semester `semester_number` (1-based).
///
/// The remaining program fee is split evenly across semesters, then
/// across the semester's instalments per [`get_instalment_distribution`].
/// Scholarship is only applied to the last semester, allocated
/// backwards over its instalments.  `one_shot_discount` is spread
/// evenly across semesters and then across instalments.
#[allow(clippy::too_many_arguments)]
pub fn calculate_semester_payment(
    semester_number: u32,
    total_program_fee: f64,
    admission_fee: f64,
    number_of_semesters: u32,
    instalments_per_semester: u32,
    cohort_start_date: NaiveDate,
    scholarship_amount: f64,
    one_shot_discount: f64,
) -> Vec<PaymentBreakdown> {
    let admission_fee_base = extract_base_amount_from_total(admission_fee);
    let remaining_base_fee = total_program_fee - admission_fee_base;
    let semester_fee = remaining_base_fee / f64::from(number_of_semesters);

    let installment_amounts: Vec<f64> = get_instalment_distribution(instalments_per_semester)
        .into_iter()
        .map(|pct| semester_fee * pct / 100.0)
        .collect();

    let scholarship_shares = if semester_number == number_of_semesters {
        distribute_scholarship_backwards(&installment_amounts, scholarship_amount)
    } else {
        vec![0.0; installment_amounts.len()]
    };

    let semester_discount = one_shot_discount / f64::from(number_of_semesters);
    let discount_share = semester_discount / f64::from(instalments_per_semester);

    let dates = generate_semester_payment_dates(semester_number, instalments_per_semester, cohort_start_date);

    installment_amounts
        .iter()
        .zip(&scholarship_shares)
        .zip(dates)
        .enumerate()
        .map(|(i, ((&amount, &scholarship_share), payment_date))| {
            let after_discount = amount - discount_share;
            let after_scholarship = after_discount - scholarship_share;
            let gst = calculate_gst(after_scholarship);
            PaymentBreakdown {
                installment_number: i as u32 + 1,
                payment_date,
                base_amount: amount,
                gst_amount: gst,
                scholarship_amount: scholarship_share,
                discount_amount: discount_share,
                amount_payable: (after_scholarship + gst).max(0.0),
            }
        })
        .collect()
}

/// Splits the GST-inclusive admission fee into `(base, gst)`.
pub fn admission_fee_split(admission_fee: f64) -> (f64, f64) {
    (
        extract_base_amount_from_total(admission_fee),
        extract_gst_from_total(admission_fee),
    )
}
