use async_trait::async_trait;

use crate::hydrator::Hydrator;
use crate::types::{BundleCandidate, BundleQuery};

const SPIRITS_ROOT: &str = "Food, Beverages & Tobacco > Beverages > Alcoholic Beverages";

/// Map a storefront category to a Google product category path.
///
/// Unknown categories fall back to the alcoholic beverages root.
pub fn product_category(category: &str) -> String {
    let leaf = match category {
        "Tequila" => "Tequila",
        "Whiskey" => "Whiskey",
        "Vodka" => "Vodka",
        "Gin" => "Gin",
        "Rum" => "Rum",
        "Cognac" => "Cognac",
        "Mezcal" => "Mezcal",
        "Liqueur" => "Liqueurs",
        "Brandy" => "Brandy",
        _ => return SPIRITS_ROOT.to_string(),
    };
    format!("{} > Liquor & Spirits > {}", SPIRITS_ROOT, leaf)
}

/// Stamps each selected bundle with the product category of the run.
pub struct CategoryHydrator;

#[async_trait]
impl Hydrator<BundleQuery, BundleCandidate> for CategoryHydrator {
    async fn hydrate(
        &self,
        query: &BundleQuery,
        candidates: &[BundleCandidate],
    ) -> Result<Vec<BundleCandidate>, String> {
        let mapped = product_category(&query.category);
        Ok(candidates
            .iter()
            .map(|_| BundleCandidate {
                product_category: Some(mapped.clone()),
                ..BundleCandidate::default()
            })
            .collect())
    }

    fn update(&self, candidate: &mut BundleCandidate, hydrated: BundleCandidate) {
        candidate.product_category = hydrated.product_category;
    }
}
