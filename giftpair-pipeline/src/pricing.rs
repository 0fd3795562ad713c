use rust_decimal::Decimal;

/// Flat amount taken off the combined bottle price.
pub fn bundle_discount() -> Decimal {
    Decimal::new(500, 2)
}

/// Largest price gap for which two bottles of different brands are paired.
pub fn cross_brand_max_gap() -> Decimal {
    Decimal::new(1000, 2)
}

/// Force a price to end in .99.
///
/// Anything below `x.99` moves up to `x.99`; `x.99` and above moves to
/// `(x + 1).99`. 131.40 → 131.99, 50.00 → 50.99, 12.992 → 13.99.
pub fn round_to_99(price: Decimal) -> Decimal {
    let whole = price.floor();
    let cents = Decimal::new(99, 2);
    if price - whole < cents {
        whole + cents
    } else {
        whole + Decimal::ONE + cents
    }
}

/// Bundle price: both bottles, less the flat discount, ending in .99.
pub fn bundle_price(first: Decimal, second: Decimal) -> Decimal {
    round_to_99(first + second - bundle_discount())
}
