//! Loyalty-bonus discount capping.

use crate::money::Money;

/// Caps a requested bonus discount at `min(bonus_remaining, subtotal)`.
///
/// Negative inputs are treated as zero, so the result always lies in
/// `[0, min(bonus_remaining, subtotal)]`.
pub fn cap_discount(requested: Money, bonus_remaining: Money, subtotal: Money) -> Money {
    let ceiling = bonus_remaining.min(subtotal).max(Money::ZERO);
    requested.max(Money::ZERO).min(ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_request_within_caps_is_unchanged() {
        assert_eq!(
            cap_discount(money("500"), money("1000"), money("2000")),
            money("500")
        );
    }

    #[test]
    fn test_capped_by_remaining_bonus() {
        assert_eq!(
            cap_discount(money("1500"), money("1000"), money("2000")),
            money("1000")
        );
    }

    #[test]
    fn test_capped_by_subtotal() {
        assert_eq!(
            cap_discount(money("1500"), money("5000"), money("1200")),
            money("1200")
        );
    }

    #[test]
    fn test_negative_values_floor_at_zero() {
        assert!(cap_discount(money("-10"), money("100"), money("100")).is_zero());
        assert!(cap_discount(money("10"), money("-100"), money("100")).is_zero());
    }
}
