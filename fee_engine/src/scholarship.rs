//! Scholarship band resolution and validation.
//!
//! Two ways of picking a scholarship exist.  The review orchestrator
//! selects one by explicit id ([`find_scholarship_by_id`] and
//! [`scholarship_amount_for`]); the test-score lookup
//! ([`find_applicable_scholarship`] and [`calculate_scholarship_amount`])
//! drives eligibility display and never feeds the review itself.

use crate::gst::round2;
use crate::models::{Scholarship, ScholarshipValidation};
use std::collections::HashSet;

/// Returns the first scholarship whose inclusive band contains
/// `test_score`.  List order breaks ties; callers keep bands disjoint.
pub fn find_applicable_scholarship(
    test_score: f64,
    scholarships: &[Scholarship],
) -> Option<&Scholarship> {
    scholarships
        .iter()
        .find(|s| s.start_percentage <= test_score && test_score <= s.end_percentage)
}

pub fn find_scholarship_by_id<'a>(
    id: &str,
    scholarships: &'a [Scholarship],
) -> Option<&'a Scholarship> {
    scholarships.iter().find(|s| s.id == id)
}

/// Amount awarded by `scholarship` on `program_fee`, or 0 without one.
pub fn scholarship_amount_for(program_fee: f64, scholarship: Option<&Scholarship>) -> f64 {
    scholarship
        .map(|s| round2(program_fee * s.amount_percentage / 100.0))
        .unwrap_or(0.0)
}

/// Scholarship amount for a student with `test_score`, resolved
/// through the score bands.
pub fn calculate_scholarship_amount(
    program_fee: f64,
    test_score: f64,
    scholarships: &[Scholarship],
) -> f64 {
    scholarship_amount_for(
        program_fee,
        find_applicable_scholarship(test_score, scholarships),
    )
}

/// Checks a scholarship set for overlapping bands and duplicate names
/// (case-insensitive).  The scholarship with id `exclude_id`, typically
/// the one being edited, is left out of the check.  Never mutates or
/// fails; problems are reported as messages.
pub fn validate_scholarship_ranges(
    scholarships: &[Scholarship],
    exclude_id: Option<&str>,
) -> ScholarshipValidation {
    let candidates: Vec<&Scholarship> = scholarships
        .iter()
        .filter(|s| Some(s.id.as_str()) != exclude_id)
        .collect();
    let mut errors = Vec::new();

    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            if a.start_percentage <= b.end_percentage && b.start_percentage <= a.end_percentage {
                errors.push(format!(
                    "Scholarship \"{}\" ({}%-{}%) overlaps with \"{}\" ({}%-{}%)",
                    a.name,
                    a.start_percentage,
                    a.end_percentage,
                    b.name,
                    b.start_percentage,
                    b.end_percentage
                ));
            }
        }
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for s in &candidates {
        let key = s.name.trim().to_lowercase();
        if !seen.insert(key.clone()) && reported.insert(key) {
            errors.push(format!("Duplicate scholarship name: \"{}\"", s.name));
        }
    }

    ScholarshipValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}
