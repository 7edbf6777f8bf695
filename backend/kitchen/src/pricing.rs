//! # Pricing
//!
//! Quote for a single order line: one recipe, N pounds, one packaging option.
//!
//! - subtotal = unit price × pounds
//! - discount = subtotal × packaging discount %
//! - tax = (subtotal - discount) × 6.625% (NJ sales tax)
//! - total = subtotal - discount + tax
//!
//! Every amount is rounded to cents half-up, each from the unrounded values.
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{PackagingOption, Recipe};

/// 6.625%
pub const TAX_RATE: Decimal = Decimal::from_parts(6625, 0, 0, false, 5);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PriceQuote {
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        discount: Decimal::ZERO,
        tax: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `None` when an amount does not fit in a `Decimal`.
pub fn compute(unit_price: Decimal, pounds: u32, discount_percent: Decimal) -> Option<PriceQuote> {
    let subtotal = unit_price.checked_mul(Decimal::from(pounds))?;
    let discount = subtotal.checked_mul(discount_percent)?.checked_div(HUNDRED)?;
    let taxable = subtotal.checked_sub(discount)?;
    let tax = taxable.checked_mul(TAX_RATE)?;
    let total = taxable.checked_add(tax)?;

    Some(PriceQuote {
        subtotal: round_cents(subtotal),
        discount: round_cents(discount),
        tax: round_cents(tax),
        total: round_cents(total),
    })
}

/// Quote for the current selection. No recipe means nothing to price.
pub fn quote(recipe: Option<&Recipe>, pounds: u32, packaging: Option<&PackagingOption>) -> PriceQuote {
    let Some(recipe) = recipe else {
        return PriceQuote::ZERO;
    };

    let discount_percent = packaging.map_or(Decimal::ZERO, |p| p.discount_percent);

    compute(recipe.unit_price, pounds, discount_percent).unwrap_or_else(|| {
        warn!(
            "Quote overflowed for {} lb of {} at {}",
            pounds, recipe.name, recipe.unit_price
        );
        PriceQuote::ZERO
    })
}

/// Containers only come in whole units, so the pounds must fill them exactly.
pub fn package_error(pounds: u32, packaging: Option<&PackagingOption>) -> Option<String> {
    let size = packaging?.container_size;

    if size <= Decimal::ZERO || (Decimal::from(pounds) % size).is_zero() {
        return None;
    }

    Some(format!(
        "Please choose an amount divisible by {} lb per container.",
        size.normalize()
    ))
}
