pub mod gift_bundle;
