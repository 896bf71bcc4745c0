//! Property-based tests for the pricing engine using proptest.

use clinic_engine::pricing::BoxedRule;
use clinic_engine::{
    BulkDiscount, FixedAmountDiscount, LineItem, PricingEngine, QuantityDiscount,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Strategies — cent-precision money, stock rules with arbitrary thresholds
// ---------------------------------------------------------------------------

/// Rule blueprint; proptest values must be Debug, which trait objects are
/// not, so chains are generated as specs and built per case.
#[derive(Debug, Clone)]
enum RuleSpec {
    Bulk { minimum: Decimal, percent: Decimal },
    Fixed { minimum: Decimal, amount: Decimal },
    Quantity { min_qty: u32, percent: Decimal },
}

impl RuleSpec {
    fn build(&self) -> BoxedRule {
        match *self {
            RuleSpec::Bulk { minimum, percent } => Box::new(BulkDiscount::new(minimum, percent)),
            RuleSpec::Fixed { minimum, amount } => {
                Box::new(FixedAmountDiscount::new(minimum, amount))
            }
            RuleSpec::Quantity { min_qty, percent } => {
                Box::new(QuantityDiscount::new(min_qty, percent))
            }
        }
    }
}

fn cents(raw: i64) -> Decimal {
    Decimal::new(raw, 2)
}

fn arb_money() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000).prop_map(cents)
}

/// Percentages between 0.00 and 100.00.
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(cents)
}

fn arb_rule() -> impl Strategy<Value = RuleSpec> {
    prop_oneof![
        (arb_money(), arb_percent())
            .prop_map(|(minimum, percent)| RuleSpec::Bulk { minimum, percent }),
        (arb_money(), arb_money()).prop_map(|(minimum, amount)| RuleSpec::Fixed {
            minimum,
            amount
        }),
        (0u32..=20, arb_percent())
            .prop_map(|(min_qty, percent)| RuleSpec::Quantity { min_qty, percent }),
    ]
}

fn arb_chain() -> impl Strategy<Value = Vec<RuleSpec>> {
    prop::collection::vec(arb_rule(), 0..4)
}

fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(
        (0i64..=50_000, 0u32..=10).prop_map(|(price, qty)| LineItem::new(cents(price), qty)),
        0..8,
    )
}

fn engine(chain: &[RuleSpec]) -> PricingEngine {
    PricingEngine::new(chain.iter().map(RuleSpec::build).collect())
}

fn subtotal(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.qty))
        .sum()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: With no rules, the total is exactly the subtotal
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn no_rules_means_subtotal(items in arb_items()) {
        let total = PricingEngine::new(vec![]).calculate_total(&items).unwrap();

        prop_assert_eq!(total, subtotal(&items));
    }
}

// ---------------------------------------------------------------------------
// Property 2: Stock rules never push the total outside [0, subtotal]
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn total_stays_within_bounds(items in arb_items(), chain in arb_chain()) {
        let total = engine(&chain).calculate_total(&items).unwrap();

        prop_assert!(total >= Decimal::ZERO, "total {} went negative", total);
        prop_assert!(
            total <= subtotal(&items),
            "total {} exceeds subtotal {}",
            total,
            subtotal(&items)
        );
    }
}

// ---------------------------------------------------------------------------
// Property 3: The audited breakdown agrees with the billed total
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn breakdown_agrees_with_calculate_total(items in arb_items(), chain in arb_chain()) {
        let engine = engine(&chain);

        let breakdown = engine.breakdown(&items).unwrap();
        let total = engine.calculate_total(&items).unwrap();

        // Empty input short-circuits calculate_total to zero; the breakdown
        // reaches the same figure through the (zero) subtotal.
        prop_assert_eq!(breakdown.total, total);
        prop_assert_eq!(breakdown.subtotal, subtotal(&items));
    }
}

// ---------------------------------------------------------------------------
// Property 4: Recorded deltas reconstruct the total
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn deltas_reconstruct_the_total(items in arb_items(), chain in arb_chain()) {
        let breakdown = engine(&chain).breakdown(&items).unwrap();

        let discounted: Decimal = breakdown.discounts.iter().map(|d| d.amount).sum();

        prop_assert_eq!(
            breakdown.total,
            (breakdown.subtotal - discounted).max(Decimal::ZERO)
        );
        for discount in &breakdown.discounts {
            prop_assert!(discount.amount > Decimal::ZERO, "zero deltas must be omitted");
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Calculation is deterministic and does not mutate the engine
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn calculation_is_repeatable(items in arb_items(), chain in arb_chain()) {
        let engine = engine(&chain);

        let first = engine.calculate_total(&items).unwrap();
        let second = engine.calculate_total(&items).unwrap();

        prop_assert_eq!(first, second);
    }
}
