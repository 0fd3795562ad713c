//! Container size parsing.
//!
//! Catalog names carry sizes in free text ("Reposado 750 ml", "Añejo 1.5 L").
//! Only standard retail sizes are bundled; miniatures and bulk packs are
//! dropped before pairing.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Size assumed when the text names none.
pub const DEFAULT_VOLUME_ML: u32 = 750;

/// Sizes eligible for bundling: 750 mL, 1.5 L and 1.75 L.
pub const BUNDLE_VOLUMES_ML: [u32; 3] = [750, 1500, 1750];

static VOLUME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(ml|l)").expect("volume pattern is valid")
});

/// Parse the first `<number> ml` / `<number> l` quantity in `text`.
///
/// A quantity too large to represent saturates to `u32::MAX`, so it still
/// counts as a stated size and never falls back to the default.
pub fn parse_volume(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    let caps = VOLUME_PATTERN.captures(&lowered)?;
    let millis = Decimal::from_str(&caps[1])
        .ok()
        .and_then(|value| match &caps[2] {
            "ml" => Some(value),
            _ => value.checked_mul(Decimal::from(1000)),
        })
        .and_then(|millis| millis.trunc().to_u32());
    Some(millis.unwrap_or(u32::MAX))
}

/// Container size in milliliters, 750 when `text` names none.
pub fn extract_volume(text: &str) -> u32 {
    parse_volume(text).unwrap_or(DEFAULT_VOLUME_ML)
}

/// Resolve a bottle's size: the name wins, then the brand, then 750 mL.
pub fn resolve_volume(name: &str, brand: &str) -> u32 {
    parse_volume(name)
        .or_else(|| parse_volume(brand))
        .unwrap_or(DEFAULT_VOLUME_ML)
}

pub fn is_bundle_size(volume_ml: u32) -> bool {
    BUNDLE_VOLUMES_ML.contains(&volume_ml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milliliters_are_taken_as_is() {
        assert_eq!(extract_volume("Reposado 750 ml"), 750);
        assert_eq!(extract_volume("Blanco 375ML"), 375);
    }

    #[test]
    fn liters_are_scaled() {
        assert_eq!(extract_volume("Añejo 1.5 L"), 1500);
        assert_eq!(extract_volume("Blanco 1.75L"), 1750);
        assert_eq!(extract_volume("Party Pack 3 l"), 3000);
    }

    #[test]
    fn missing_size_defaults_to_standard_bottle() {
        assert_eq!(extract_volume("Silver Tequila"), 750);
        assert_eq!(parse_volume("Silver Tequila"), None);
    }

    #[test]
    fn brand_is_consulted_when_name_has_no_size() {
        assert_eq!(resolve_volume("Cristalino", "Casa 1.75 L"), 1750);
        assert_eq!(resolve_volume("Cristalino 50ml", "Casa 1.75 L"), 50);
        assert_eq!(resolve_volume("Cristalino", "Casa"), 750);
    }

    #[test]
    fn oversized_quantity_is_never_bundled() {
        assert_eq!(parse_volume("Bulk Tank 5000000 L"), Some(u32::MAX));
        assert_eq!(
            parse_volume("Vat 99999999999999999999999999999999 ml"),
            Some(u32::MAX)
        );
        let resolved = resolve_volume("Bulk Tank 5000000 L", "Casa 750ml");
        assert_eq!(resolved, u32::MAX);
        assert!(!is_bundle_size(resolved));
    }

    #[test]
    fn only_standard_sizes_are_bundled() {
        assert!(is_bundle_size(750));
        assert!(is_bundle_size(1500));
        assert!(is_bundle_size(1750));
        assert!(!is_bundle_size(50));
        assert!(!is_bundle_size(1000));
    }
}
