//! Line-total arithmetic shared by the document chain.
//!
//! All monetary math stays in fixed-point decimal; results carry two
//! decimal places.

use rust_decimal::Decimal;

/// Monetary fields round to two decimal places.
pub const MONEY_SCALE: u32 = 2;

/// Total for a quote line: quantity x unit price x (1 - discount/100).
pub fn discounted_line_total(quantity: i32, unit_price: Decimal, discount_pct: Decimal) -> Decimal {
    let factor = Decimal::ONE - discount_pct / Decimal::ONE_HUNDRED;
    (Decimal::from(quantity) * unit_price * factor).round_dp(MONEY_SCALE)
}

/// Total for an order or delivery line: quantity x unit price, no discount term.
pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    (Decimal::from(quantity) * unit_price).round_dp(MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn full_discount_zeroes_the_line() {
        assert_eq!(
            discounted_line_total(4, dec("25.00"), dec("100")),
            dec("0.00")
        );
    }

    #[test]
    fn no_discount_matches_plain_total() {
        assert_eq!(
            discounted_line_total(7, dec("3.50"), Decimal::ZERO),
            line_total(7, dec("3.50"))
        );
    }
}
