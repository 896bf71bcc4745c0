//! Stock discount rules.
//!
//! Amount-based thresholds trigger strictly above their minimum; the
//! quantity threshold is inclusive. The asymmetry is intentional and pinned
//! by the boundary tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::{DiscountRule, LineItem};

/// Percentage discount once the running total exceeds a minimum amount.
///
/// Reproduces the legacy billing rule "5% off when the total is over 500".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkDiscount {
    minimum_amount: Decimal,
    percent: Decimal,
}

impl BulkDiscount {
    pub fn new(minimum_amount: Decimal, percent: Decimal) -> Self {
        BulkDiscount {
            minimum_amount,
            percent,
        }
    }
}

impl DiscountRule for BulkDiscount {
    fn id(&self) -> &'static str {
        "bulk-discount"
    }

    fn apply(&self, current_total: Decimal, _items: &[LineItem]) -> Decimal {
        // Strictly above the minimum: a total exactly at the threshold gets
        // no discount.
        if current_total <= self.minimum_amount {
            return current_total;
        }
        current_total - current_total * self.percent / dec!(100)
    }

    fn describe(&self) -> String {
        format!("{}% off totals over {}", self.percent, self.minimum_amount)
    }
}

/// Flat discount once the running total exceeds a minimum amount.
///
/// May overshoot past zero on small totals; clamping is the engine's
/// responsibility, not the rule's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAmountDiscount {
    minimum_amount: Decimal,
    amount: Decimal,
}

impl FixedAmountDiscount {
    pub fn new(minimum_amount: Decimal, amount: Decimal) -> Self {
        FixedAmountDiscount {
            minimum_amount,
            amount,
        }
    }
}

impl DiscountRule for FixedAmountDiscount {
    fn id(&self) -> &'static str {
        "fixed-amount-discount"
    }

    fn apply(&self, current_total: Decimal, _items: &[LineItem]) -> Decimal {
        if current_total <= self.minimum_amount {
            return current_total;
        }
        current_total - self.amount
    }

    fn describe(&self) -> String {
        format!("{} off totals over {}", self.amount, self.minimum_amount)
    }
}

/// Percentage discount once the combined item quantity reaches a minimum.
///
/// Quantity thresholds are inclusive, unlike the amount thresholds above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityDiscount {
    minimum_qty: u32,
    percent: Decimal,
}

impl QuantityDiscount {
    pub fn new(minimum_qty: u32, percent: Decimal) -> Self {
        QuantityDiscount {
            minimum_qty,
            percent,
        }
    }
}

impl DiscountRule for QuantityDiscount {
    fn id(&self) -> &'static str {
        "quantity-discount"
    }

    fn apply(&self, current_total: Decimal, items: &[LineItem]) -> Decimal {
        let total_qty: u64 = items.iter().map(|item| u64::from(item.qty)).sum();

        if total_qty < u64::from(self.minimum_qty) {
            return current_total;
        }
        current_total - current_total * self.percent / dec!(100)
    }

    fn describe(&self) -> String {
        format!(
            "{}% off when booking {} or more items",
            self.percent, self.minimum_qty
        )
    }
}
