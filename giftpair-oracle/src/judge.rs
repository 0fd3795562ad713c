use async_trait::async_trait;
use std::sync::Arc;

use giftpair_pipeline::collaborators::SynergyJudge;
use giftpair_pipeline::types::Bottle;

use crate::client::ChatClient;
use crate::prompts::{synergy_prompt, JUDGE_MAX_TOKENS, JUDGE_TEMPERATURE};
use crate::protocol::ChatRequest;

/// Rates pairings with the configured judge model.
///
/// Returns the raw reply; the pipeline's scorer extracts the number.
pub struct ChatSynergyJudge {
    client: Arc<ChatClient>,
}

impl ChatSynergyJudge {
    pub fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }

    pub fn request(&self, first: &Bottle, second: &Bottle) -> ChatRequest {
        ChatRequest::single(
            &self.client.config().judge_model,
            synergy_prompt(first, second),
            JUDGE_TEMPERATURE,
            JUDGE_MAX_TOKENS,
        )
    }
}

#[async_trait]
impl SynergyJudge for ChatSynergyJudge {
    async fn judge(&self, first: &Bottle, second: &Bottle) -> Result<String, String> {
        let request = self.request(first, second);
        self.client
            .complete(&request)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OracleConfig;

    #[test]
    fn request_uses_judge_settings() {
        let client = ChatClient::new(OracleConfig::new("sk-test").with_judge_model("judge-x"))
            .unwrap();
        let judge = ChatSynergyJudge::new(Arc::new(client));
        let request = judge.request(&Bottle::default(), &Bottle::default());
        assert_eq!(request.model, "judge-x");
        assert_eq!(request.max_tokens, 4);
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }
}
