//! Jewelry pricing computation

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::purity::multiplier_for;

/// Value-added tax applied to the subtotal (12%)
pub const TAX_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// A priced line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub rate_per_gram: Decimal,
    pub gold_value: Decimal,
    pub making_charge: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub purity: String,
    pub grams: Decimal,
}

/// Round to whole currency units, halves away from zero
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-gram rate for a purity label at the given 24K base rate
pub fn rate_for_purity(base_rate_24k: Decimal, purity: &str) -> Decimal {
    round_whole(base_rate_24k * multiplier_for(purity))
}

/// Price `grams` of `purity` gold plus a flat making charge
pub fn price_item(
    base_rate_24k: Decimal,
    purity: &str,
    grams: Decimal,
    making_charge: Decimal,
) -> PricingResult {
    let rate_per_gram = rate_for_purity(base_rate_24k, purity);
    let gold_value = rate_per_gram * grams;
    let subtotal = gold_value + making_charge;
    let tax = subtotal * TAX_RATE;
    let total = subtotal + tax;

    PricingResult {
        rate_per_gram,
        gold_value,
        making_charge,
        subtotal,
        tax,
        total,
        purity: purity.to_string(),
        grams,
    }
}
