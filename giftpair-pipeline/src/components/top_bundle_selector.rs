use rust_decimal::prelude::ToPrimitive;

use crate::selector::Selector;
use crate::types::{BundleCandidate, BundleQuery};

/// Keeps the `n` best bundles by synergy score, higher price first on ties.
pub struct TopBundleSelector {
    pub n: usize,
}

impl Default for TopBundleSelector {
    fn default() -> Self {
        Self { n: 10 }
    }
}

impl Selector<BundleQuery, BundleCandidate> for TopBundleSelector {
    fn score(&self, candidate: &BundleCandidate) -> f64 {
        candidate.score()
    }

    fn tiebreak(&self, candidate: &BundleCandidate) -> f64 {
        candidate.price.to_f64().unwrap_or(0.0)
    }

    fn size(&self) -> Option<usize> {
        Some(self.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Synergy;
    use rust_decimal::Decimal;

    fn candidate(name: &str, score: f64, price: i64) -> BundleCandidate {
        BundleCandidate {
            name: name.into(),
            price: Decimal::from(price),
            synergy: Some(Synergy::Judged { score }),
            ..BundleCandidate::default()
        }
    }

    #[test]
    fn orders_by_score_then_price() {
        let selector = TopBundleSelector::default();
        let query = BundleQuery::new("test-001", "Tequila");
        let selected = selector.select(
            &query,
            vec![
                candidate("a", 80.0, 10),
                candidate("b", 80.0, 20),
                candidate("c", 60.0, 30),
            ],
        );
        let order: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn exact_ties_keep_enumeration_order() {
        let selector = TopBundleSelector::default();
        let query = BundleQuery::new("test-002", "Tequila");
        let selected = selector.select(
            &query,
            vec![
                candidate("first", 70.0, 50),
                candidate("second", 70.0, 50),
                candidate("third", 70.0, 50),
            ],
        );
        let order: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn truncates_to_n() {
        let selector = TopBundleSelector { n: 2 };
        let query = BundleQuery::new("test-003", "Tequila");
        let candidates = (0..5).map(|i| candidate("x", f64::from(i), 10)).collect();
        let selected = selector.select(&query, candidates);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].score(), 4.0);
    }

    #[test]
    fn unscored_candidates_sort_last() {
        let selector = TopBundleSelector::default();
        let query = BundleQuery::new("test-004", "Tequila");
        let unscored = BundleCandidate {
            name: "unscored".into(),
            price: Decimal::from(999),
            ..BundleCandidate::default()
        };
        let selected = selector.select(&query, vec![unscored, candidate("scored", 1.0, 1)]);
        assert_eq!(selected[0].name, "scored");
    }
}
