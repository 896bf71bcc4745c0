//! Pricing calculation through an ordered, extensible discount rule chain.
//!
//! The engine threads a running total through its rules in order: each rule
//! receives the previous rule's output, not the original subtotal, so
//! discounts compound and rule order is observably significant. New rules
//! plug in without touching the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ClinicError, Result};
use crate::rules::BulkDiscount;

/// One priced line: a treatment's unit price times the requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub price: Decimal,
    pub qty: u32,
}

impl LineItem {
    pub fn new(price: Decimal, qty: u32) -> Self {
        LineItem { price, qty }
    }
}

/// A pluggable discount rule.
///
/// Rules are stateless value objects configured at construction. `apply`
/// receives the running total and the original items (for rules that need
/// item context, like quantity thresholds) and returns the new total.
pub trait DiscountRule {
    /// Stable identifier used in breakdown entries.
    fn id(&self) -> &'static str;

    fn apply(&self, current_total: Decimal, items: &[LineItem]) -> Decimal;

    /// Human-readable statement of the rule's terms.
    fn describe(&self) -> String;
}

/// A rule in the engine's chain. `Send + Sync` so a configured engine can be
/// shared read-only across threads.
pub type BoxedRule = Box<dyn DiscountRule + Send + Sync>;

/// One rule's contribution to a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDiscount {
    pub rule: String,
    pub description: String,
    pub amount: Decimal,
}

/// The auditable result of a pricing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    /// Rules that produced a reduction, in application order. Rules whose
    /// delta was zero are omitted, though their (null) effect is still part
    /// of `total`.
    pub discounts: Vec<AppliedDiscount>,
    pub total: Decimal,
}

/// Computes line-item totals by applying its rule chain in sequence.
///
/// Configuration is build-then-freeze: assemble the chain with [`new`] and
/// [`add_rule`], then share the engine read-only. Calculations never mutate
/// the engine.
///
/// [`new`]: PricingEngine::new
/// [`add_rule`]: PricingEngine::add_rule
pub struct PricingEngine {
    rules: Vec<BoxedRule>,
}

impl Default for PricingEngine {
    /// The legacy-equivalent configuration: 5% off totals over 500.
    fn default() -> Self {
        PricingEngine::new(vec![Box::new(BulkDiscount::new(dec!(500), dec!(5)))])
    }
}

impl PricingEngine {
    /// An engine with exactly the given chain. An empty vector means no
    /// discounts at all; use [`PricingEngine::default`] for the stock rule.
    pub fn new(rules: Vec<BoxedRule>) -> Self {
        PricingEngine { rules }
    }

    /// Append a rule to the end of the chain.
    pub fn add_rule(&mut self, rule: BoxedRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Compute the final total for a set of line items.
    ///
    /// Empty input is a zero total. Every item is validated before any rule
    /// runs. The subtotal is threaded through the rule chain in order and
    /// the result is clamped to a floor of zero — however aggressive the
    /// configured rules, a total never goes negative.
    ///
    /// # Errors
    /// Returns `ClinicError::InvalidLineItem` naming the first offending
    /// item's position.
    pub fn calculate_total(&self, items: &[LineItem]) -> Result<Decimal> {
        if items.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let subtotal = subtotal(items)?;

        let mut total = subtotal;
        for rule in &self.rules {
            total = rule.apply(total, items);
        }

        Ok(total.max(Decimal::ZERO))
    }

    /// Same traversal as [`calculate_total`], additionally recording each
    /// rule's delta for an auditable breakdown.
    ///
    /// [`calculate_total`]: PricingEngine::calculate_total
    pub fn breakdown(&self, items: &[LineItem]) -> Result<PriceBreakdown> {
        let subtotal = subtotal(items)?;

        let mut discounts = Vec::new();
        let mut total = subtotal;
        for rule in &self.rules {
            let before = total;
            total = rule.apply(total, items);
            let amount = before - total;

            if amount > Decimal::ZERO {
                discounts.push(AppliedDiscount {
                    rule: rule.id().to_string(),
                    description: rule.describe(),
                    amount,
                });
            }
        }

        Ok(PriceBreakdown {
            subtotal,
            discounts,
            total: total.max(Decimal::ZERO),
        })
    }
}

/// Sum of `price × qty` with per-item validation, before any rule runs.
fn subtotal(items: &[LineItem]) -> Result<Decimal> {
    let mut subtotal = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        if item.price < Decimal::ZERO {
            return Err(ClinicError::InvalidLineItem {
                index,
                reason: "'price' must be non-negative".to_string(),
            });
        }
        subtotal += item.price * Decimal::from(item.qty);
    }

    Ok(subtotal)
}
