//! Bundle generation: size filtering and candidate pair enumeration.
//!
//! Two independent policies decide which pairs are worth scoring:
//! 1. Same brand (case-insensitive): every 2-combination qualifies.
//! 2. Cross brand: a 2-combination qualifies when the prices are at most
//!    $10.00 apart.
//!
//! Pairs keep catalog order, so `(a, b)` always has `a` listed before `b`.
//! A pair whose bundle name was emitted by an earlier run is skipped before
//! the candidate is built.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::pricing::{bundle_price, cross_brand_max_gap};
use crate::types::{Bottle, BottlePair, BundleCandidate};
use crate::volume::is_bundle_size;

/// Keep only bottles in a bundle-eligible size, preserving order.
pub fn eligible_bottles(bottles: &[Arc<Bottle>]) -> Vec<Arc<Bottle>> {
    bottles
        .iter()
        .filter(|b| is_bundle_size(b.volume_ml))
        .cloned()
        .collect()
}

/// Group bottles by lowercased brand, groups in first-appearance order.
fn brand_groups(bottles: &[Arc<Bottle>]) -> Vec<Vec<Arc<Bottle>>> {
    let mut keys: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<Arc<Bottle>>> = Vec::new();
    for bottle in bottles {
        let key = bottle.brand_key();
        match keys.iter().position(|k| *k == key) {
            Some(idx) => groups[idx].push(Arc::clone(bottle)),
            None => {
                keys.push(key);
                groups.push(vec![Arc::clone(bottle)]);
            }
        }
    }
    groups
}

/// Every 2-combination of `items`, in lexicographic index order.
fn combinations(items: &[Arc<Bottle>]) -> impl Iterator<Item = BottlePair> + '_ {
    items.iter().enumerate().flat_map(move |(i, first)| {
        items[i + 1..]
            .iter()
            .map(move |second| BottlePair::new(Arc::clone(first), Arc::clone(second)))
    })
}

/// Pairs qualifying under the same-brand policy.
pub fn same_brand_pairs(bottles: &[Arc<Bottle>]) -> Vec<BottlePair> {
    brand_groups(bottles)
        .iter()
        .flat_map(|group| combinations(group).collect::<Vec<_>>())
        .collect()
}

/// Pairs qualifying under the cross-brand policy.
pub fn cross_brand_pairs(bottles: &[Arc<Bottle>]) -> Vec<BottlePair> {
    let max_gap = cross_brand_max_gap();
    combinations(bottles)
        .filter(|pair| pair.first.brand_key() != pair.second.brand_key())
        .filter(|pair| (pair.first.price - pair.second.price).abs() <= max_gap)
        .collect()
}

/// Build the named, priced candidate for a pair.
pub fn build_candidate(pair: BottlePair) -> BundleCandidate {
    BundleCandidate {
        name: pair.bundle_name(),
        price: bundle_price(pair.first.price, pair.second.price),
        bottles: pair,
        ..BundleCandidate::default()
    }
}

/// Enumerate new bundle candidates from size-eligible bottles.
///
/// Same-brand pairs come first, then cross-brand pairs. Names found in
/// `processed` are skipped.
pub fn generate_bundles(
    bottles: &[Arc<Bottle>],
    processed: &BTreeSet<String>,
) -> Vec<BundleCandidate> {
    same_brand_pairs(bottles)
        .into_iter()
        .chain(cross_brand_pairs(bottles))
        .filter(|pair| !processed.contains(&pair.bundle_name()))
        .map(build_candidate)
        .collect()
}
