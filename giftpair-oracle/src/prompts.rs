//! Prompt text sent to the chat service.

use giftpair_pipeline::types::Bottle;

pub const JUDGE_TEMPERATURE: f32 = 0.2;
pub const JUDGE_MAX_TOKENS: u32 = 4;
pub const COPY_TEMPERATURE: f32 = 0.7;
pub const COPY_MAX_TOKENS: u32 = 200;

/// Ask for a single 0-100 gift-pairing rating.
pub fn synergy_prompt(first: &Bottle, second: &Bottle) -> String {
    format!(
        "You are a spirits expert. Rate the following two bottles as a gift bundle. \
         Give ONE number 0-100 (higher = better pairing). \
         Bottle A: {} - ${}\n\
         Bottle B: {} - ${}\n\
         Consider brand prestige, style compatibility, and perceived customer value.",
        first.name, first.price, second.name, second.price
    )
}

/// Ask for a short HTML listing body.
pub fn description_prompt(bundle_name: &str) -> String {
    format!(
        "Write a short HTML description for the liquor bundle: '{}'. \
         Use bold headings and highlight the unique qualities of each bottle. \
         Include a note about being over 21 to purchase.",
        bundle_name
    )
}
