//! Catalog file loader.
//!
//! Reads scraped category listings into [`Bottle`] records. Two layouts are
//! accepted, picked by file extension:
//!   * CSV with a header row: `name, brand, price[, image][, volume_ml]`
//!   * JSON: an array of objects with the same field names
//!
//! Prices may be plain numbers or the raw text lifted from a product tile,
//! e.g. `"$1,049.99 In stock"`. A row whose price yields no amount is logged
//! with its position and skipped; malformed files are still errors.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::types::Bottle;
use crate::volume::resolve_volume;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No price found for '{name}': {raw}")]
    MissingPrice { name: String, raw: String },

    #[error("Unsupported catalog format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
}

/// One catalog row as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub brand: String,
    pub price: RawPrice,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub volume_ml: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl CatalogRecord {
    /// Convert to a [`Bottle`], resolving price and container size.
    pub fn into_bottle(self) -> Result<Bottle, CatalogError> {
        let price = match &self.price {
            RawPrice::Number(n) => Decimal::from_f64(*n).map(|d| d.round_dp(2)),
            RawPrice::Text(text) => extract_price(text),
        };
        let price = price.ok_or_else(|| CatalogError::MissingPrice {
            name: self.name.clone(),
            raw: match &self.price {
                RawPrice::Number(n) => n.to_string(),
                RawPrice::Text(text) => text.clone(),
            },
        })?;
        let volume_ml = self
            .volume_ml
            .unwrap_or_else(|| resolve_volume(&self.name, &self.brand));

        Ok(Bottle {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            price,
            volume_ml,
            image: self.image,
        })
    }
}

static PRICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d,]*\.\d{2})").expect("price pattern is valid"));

/// Pull a price out of tile text such as `"$1,049.99 In stock"`.
///
/// The first `d.dd` amount wins; thousands separators are dropped. Text
/// holding a bare number (`"49"`) is accepted as-is.
pub fn extract_price(text: &str) -> Option<Decimal> {
    if let Some(caps) = PRICE_PATTERN.captures(text) {
        return Decimal::from_str(&caps[1].replace(',', "")).ok();
    }
    Decimal::from_str(text.trim().trim_start_matches('$')).ok()
}

/// Load bottles from a CSV reader.
pub fn load_catalog_csv<R: Read>(reader: R) -> Result<Vec<Bottle>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bottles = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let record: CatalogRecord = result.map_err(|source| CatalogError::Csv {
            line: line_num + 2,
            source,
        })?;
        let line = line_num + 2;
        match record.into_bottle() {
            Ok(bottle) => bottles.push(bottle),
            Err(err) => log::warn!("catalog line {}: {}; skipping", line, err),
        }
    }
    Ok(bottles)
}

/// Load bottles from a JSON array.
pub fn load_catalog_json<R: Read>(reader: R) -> Result<Vec<Bottle>, CatalogError> {
    let records: Vec<CatalogRecord> = serde_json::from_reader(reader)?;
    let mut bottles = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match record.into_bottle() {
            Ok(bottle) => bottles.push(bottle),
            Err(err) => log::warn!("catalog entry {}: {}; skipping", index + 1, err),
        }
    }
    Ok(bottles)
}

/// Load a catalog file, choosing the parser by extension.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Vec<Arc<Bottle>>, CatalogError> {
    let path = path.as_ref();
    let open = || {
        std::fs::File::open(path).map_err(|source| CatalogError::Open {
            path: path.display().to_string(),
            source,
        })
    };
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let bottles = match extension.as_str() {
        "csv" => load_catalog_csv(open()?)?,
        "json" => load_catalog_json(open()?)?,
        other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
    };
    Ok(bottles.into_iter().map(Arc::new).collect())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
name,brand,price,image
Casa Blanco 750ml,Casa,39.99,images/casa-blanco.jpg
Casa Reposado 1.75L,Casa,$64.99 In stock,
Tiny Añejo 50ml,Tiny,\"$1,049.99\",
";

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn load_sample_csv() {
        let bottles = load_catalog_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(bottles.len(), 3);
        assert_eq!(bottles[0].name, "Casa Blanco 750ml");
        assert_eq!(bottles[0].price, d("39.99"));
        assert_eq!(bottles[0].volume_ml, 750);
        assert_eq!(bottles[0].image.as_deref(), Some("images/casa-blanco.jpg"));
        assert_eq!(bottles[1].price, d("64.99"));
        assert_eq!(bottles[1].volume_ml, 1750);
        assert_eq!(bottles[1].image, None);
        assert_eq!(bottles[2].price, d("1049.99"));
        assert_eq!(bottles[2].volume_ml, 50);
    }

    #[test]
    fn load_json_catalog() {
        let json = r#"[
            {"name": "Casa Blanco", "brand": "Casa", "price": 39.99},
            {"name": "Casa Extra", "brand": "Casa", "price": "$120.00", "volume_ml": 1500}
        ]"#;
        let bottles = load_catalog_json(json.as_bytes()).unwrap();
        assert_eq!(bottles[0].price, d("39.99"));
        assert_eq!(bottles[0].volume_ml, 750);
        assert_eq!(bottles[1].price, d("120.00"));
        assert_eq!(bottles[1].volume_ml, 1500);
    }

    #[test]
    fn price_text_without_amount_is_rejected() {
        let record = CatalogRecord {
            name: "Mystery".into(),
            brand: "Casa".into(),
            price: RawPrice::Text("Sold out".into()),
            image: None,
            volume_ml: None,
        };
        let err = record.into_bottle().unwrap_err();
        assert!(matches!(err, CatalogError::MissingPrice { .. }));
    }

    #[test]
    fn unpriced_csv_rows_are_skipped() {
        let csv_data = "\
name,brand,price
Casa Blanco,Casa,39.99
Mystery,Casa,Sold out
Casa Reposado,Casa,49.99
";
        let bottles = load_catalog_csv(csv_data.as_bytes()).unwrap();
        let names: Vec<&str> = bottles.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Casa Blanco", "Casa Reposado"]);
    }

    #[test]
    fn unpriced_json_entries_are_skipped() {
        let json = r#"[
            {"name": "Mystery", "brand": "Casa", "price": "Call for price"},
            {"name": "Casa Blanco", "brand": "Casa", "price": 39.99}
        ]"#;
        let bottles = load_catalog_json(json.as_bytes()).unwrap();
        assert_eq!(bottles.len(), 1);
        assert_eq!(bottles[0].name, "Casa Blanco");
    }

    #[test]
    fn malformed_csv_row_is_still_an_error() {
        let csv_data = "name,brand,price\nCasa Blanco,Casa\n";
        let err = load_catalog_csv(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Csv { line: 2, .. }));
    }

    #[test]
    fn extract_price_reads_first_amount() {
        assert_eq!(extract_price("$49.99 — In stock"), Some(d("49.99")));
        assert_eq!(extract_price("Was $59.99 now $49.99"), Some(d("59.99")));
        assert_eq!(extract_price("42"), Some(d("42")));
        assert_eq!(extract_price("Call for price"), None);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_catalog_file("catalog.xlsx").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat(_)));
    }
}
