//! Fee Engine library crate.
//!
//! This crate exposes the fee-structure payment plan calculation
//! engine and its API components as reusable modules.  External
//! applications may depend on the `fee_engine` crate and call into
//! `engine::generate_fee_structure_review` (or the validated
//! `engine::review`) directly, or embed the API via `api::build_router`.

pub mod models;
pub mod error;
pub mod gst;
pub mod scholarship;
pub mod dates;
pub mod payment_plan;
pub mod semester;
pub mod engine;
pub mod api;
