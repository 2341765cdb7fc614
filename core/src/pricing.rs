//! Pricing for registrations.
//!
//! A quote starts from the sum of the selected prices, applies the
//! multi-event discount tier, then applies an optional coupon to whatever
//! remains. Every step is integer arithmetic on [`Money`], so quotes are
//! deterministic and never go negative.

use crate::types::{CouponDiscount, Money};
use serde::{Deserialize, Serialize};

/// Price breakdown for a registration.
///
/// The fields always reconcile:
/// `subtotal - multi_event_discount - coupon_discount == total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Sum of the selected item prices
    pub subtotal: Money,
    /// Discount from registering for several sub-events at once
    pub multi_event_discount: Money,
    /// Discount from a coupon, clamped so the total stays non-negative
    pub coupon_discount: Money,
    /// Amount the registration owes
    pub total: Money,
}

/// Discount percentage for registering `item_count` priced items together.
///
/// Tiers are mutually exclusive; the highest applicable one wins. A single
/// item never gets a tier discount.
#[must_use]
pub const fn multi_event_discount_percent(item_count: usize) -> u32 {
    match item_count {
        0 | 1 => 0,
        2 => 10,
        3 => 20,
        _ => 25,
    }
}

/// Computes the quote for a set of selected prices and an optional coupon.
///
/// The multi-event tier applies to the subtotal. The coupon applies to the
/// remainder after the tier discount: percent coupons take a share of that
/// remainder, flat coupons subtract a fixed amount clamped to it. Item order
/// does not affect the result.
#[must_use]
pub fn quote(prices: &[Money], coupon: Option<CouponDiscount>) -> Quote {
    let subtotal = prices
        .iter()
        .fold(Money::ZERO, |acc, price| acc.saturating_add(*price));

    let tier = multi_event_discount_percent(prices.len());
    let multi_event_discount = subtotal.percent(tier);
    let remainder = subtotal.saturating_sub(multi_event_discount);

    let coupon_discount = match coupon {
        Some(CouponDiscount::Percent(pct)) => remainder.percent(pct),
        Some(CouponDiscount::Flat(amount)) => amount.min(remainder),
        None => Money::ZERO,
    };

    Quote {
        subtotal,
        multi_event_discount,
        coupon_discount,
        total: remainder.saturating_sub(coupon_discount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_item_gets_no_tier_discount() {
        let q = quote(&[Money::from_units(500)], None);
        assert_eq!(q.subtotal, Money::from_units(500));
        assert_eq!(q.multi_event_discount, Money::ZERO);
        assert_eq!(q.total, Money::from_units(500));
    }

    #[test]
    fn three_items_get_twenty_percent() {
        let prices = [
            Money::from_units(100),
            Money::from_units(150),
            Money::from_units(200),
        ];
        let q = quote(&prices, None);
        assert_eq!(q.subtotal, Money::from_units(450));
        assert_eq!(q.multi_event_discount, Money::from_units(90));
        assert_eq!(q.coupon_discount, Money::ZERO);
        assert_eq!(q.total, Money::from_units(360));
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(multi_event_discount_percent(0), 0);
        assert_eq!(multi_event_discount_percent(1), 0);
        assert_eq!(multi_event_discount_percent(2), 10);
        assert_eq!(multi_event_discount_percent(3), 20);
        assert_eq!(multi_event_discount_percent(4), 25);
        assert_eq!(multi_event_discount_percent(9), 25);
    }

    #[test]
    fn percent_coupon_applies_to_remainder() {
        let prices = [Money::from_units(100), Money::from_units(100)];
        // subtotal 200, tier 10% -> remainder 180, coupon 50% of 180 = 90
        let q = quote(&prices, Some(CouponDiscount::Percent(50)));
        assert_eq!(q.multi_event_discount, Money::from_units(20));
        assert_eq!(q.coupon_discount, Money::from_units(90));
        assert_eq!(q.total, Money::from_units(90));
    }

    #[test]
    fn flat_coupon_is_clamped_to_remainder() {
        let q = quote(
            &[Money::from_units(100)],
            Some(CouponDiscount::Flat(Money::from_units(500))),
        );
        assert_eq!(q.coupon_discount, Money::from_units(100));
        assert_eq!(q.total, Money::ZERO);
    }

    #[test]
    fn free_items_stay_free() {
        let q = quote(&[Money::ZERO], Some(CouponDiscount::Percent(100)));
        assert_eq!(q.subtotal, Money::ZERO);
        assert_eq!(q.total, Money::ZERO);
    }

    #[test]
    fn breakdown_reconciles() {
        let prices = [
            Money::from_units(199),
            Money::from_units(349),
            Money::from_units(99),
            Money::from_units(499),
        ];
        let q = quote(&prices, Some(CouponDiscount::Flat(Money::from_units(250))));
        assert_eq!(
            q.subtotal
                .saturating_sub(q.multi_event_discount)
                .saturating_sub(q.coupon_discount),
            q.total
        );
    }
}
