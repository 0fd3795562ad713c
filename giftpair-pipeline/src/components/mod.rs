pub mod bundle_image_hydrator;
pub mod catalog_pair_source;
pub mod category_hydrator;
pub mod description_hydrator;
pub mod duplicate_bundle_filter;
pub mod processed_log_query_hydrator;
pub mod processed_log_side_effect;
pub mod synergy_scorer;
pub mod top_bundle_selector;
