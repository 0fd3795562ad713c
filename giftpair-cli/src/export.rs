//! Shopify product import CSV.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use giftpair_pipeline::types::BundleCandidate;

static NON_HANDLE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("handle pattern is valid"));

const HEADERS: [&str; 15] = [
    "Handle",
    "Title",
    "Body (HTML)",
    "Vendor",
    "Type",
    "Tags",
    "Published",
    "Option1 Name",
    "Option1 Value",
    "Variant SKU",
    "Variant Price",
    "Variant Inventory Qty",
    "Image Src",
    "Status",
    "Product Category",
];

/// URL handle: punctuation dropped, lowercased, spaces to hyphens.
pub fn create_handle(name: &str) -> String {
    NON_HANDLE_CHARS
        .replace_all(name, "")
        .to_lowercase()
        .replace(' ', "-")
}

// Field order matches HEADERS.
#[derive(Serialize)]
struct ShopifyRow<'a> {
    handle: String,
    title: &'a str,
    body_html: &'a str,
    vendor: &'static str,
    product_type: &'static str,
    tags: &'static str,
    published: &'static str,
    option1_name: &'static str,
    option1_value: &'static str,
    variant_sku: &'static str,
    variant_price: String,
    variant_inventory_qty: u32,
    image_src: &'a str,
    status: &'static str,
    product_category: &'a str,
}

impl<'a> ShopifyRow<'a> {
    fn from_bundle(bundle: &'a BundleCandidate) -> Self {
        Self {
            handle: create_handle(&bundle.name),
            title: &bundle.name,
            body_html: bundle.description.as_deref().unwrap_or_default(),
            vendor: "Liquor Bundle",
            product_type: "Bundle",
            tags: "Bundles, Liquor",
            published: "TRUE",
            option1_name: "Title",
            option1_value: "Default Title",
            variant_sku: "",
            variant_price: format!("{:.2}", bundle.price),
            variant_inventory_qty: 10,
            image_src: bundle.image_src.as_deref().unwrap_or_default(),
            status: "active",
            product_category: bundle.product_category.as_deref().unwrap_or_default(),
        }
    }
}

/// Write one row per bundle. The header is written even when there are no
/// bundles.
pub fn export_bundles(path: &Path, bundles: &[BundleCandidate]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating export directory {}", parent.display()))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    writer.write_record(HEADERS)?;
    for bundle in bundles {
        writer
            .serialize(ShopifyRow::from_bundle(bundle))
            .with_context(|| format!("writing row for '{}'", bundle.name))?;
    }
    writer.flush()?;

    log::info!("exported {} bundles to {}", bundles.len(), path.display());
    Ok(())
}
