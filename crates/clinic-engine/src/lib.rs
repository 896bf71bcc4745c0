//! # clinic-engine
//!
//! Framework-agnostic business rules for clinic appointment systems.
//!
//! Two independent, side-effect-free components: slot scheduling (interval
//! overlap checks and free-slot enumeration) and pricing (line-item totals
//! with an ordered, extensible discount rule chain). Both are pure functions
//! of caller-supplied data — persistence, HTTP, and request validation live
//! in the host application, which feeds appointment rows and treatment
//! prices in and consumes availability decisions and totals.
//!
//! ## Modules
//!
//! - [`schedule`] — availability checks and fixed-length slot enumeration
//! - [`pricing`] — line-item totals through an ordered discount rule chain
//! - [`rules`] — stock discount rules (bulk, fixed-amount, quantity)
//! - [`interval`] — the half-open `TimeInterval` value type
//! - [`ingest`] — normalization of external timestamp and line-item shapes
//! - [`error`] — error types

pub mod error;
pub mod ingest;
pub mod interval;
pub mod pricing;
pub mod rules;
pub mod schedule;

pub use error::ClinicError;
pub use interval::TimeInterval;
pub use pricing::{AppliedDiscount, LineItem, PriceBreakdown, PricingEngine};
pub use rules::{BulkDiscount, FixedAmountDiscount, QuantityDiscount};
pub use schedule::{find_available_slots, is_available, slots_for_day, ClinicHours};
