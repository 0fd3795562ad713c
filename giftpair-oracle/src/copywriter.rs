use async_trait::async_trait;
use std::sync::Arc;

use giftpair_pipeline::collaborators::CopyGenerator;

use crate::client::ChatClient;
use crate::prompts::{description_prompt, COPY_MAX_TOKENS, COPY_TEMPERATURE};
use crate::protocol::ChatRequest;

/// Remove a surrounding Markdown code fence, if the model added one.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // Drop the info string (`html`, etc.) on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}

/// Writes bundle listing bodies with the configured copy model.
pub struct ChatCopywriter {
    client: Arc<ChatClient>,
}

impl ChatCopywriter {
    pub fn new(client: Arc<ChatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CopyGenerator for ChatCopywriter {
    async fn describe(&self, bundle_name: &str) -> Result<String, String> {
        let request = ChatRequest::single(
            &self.client.config().copy_model,
            description_prompt(bundle_name),
            COPY_TEMPERATURE,
            COPY_MAX_TOKENS,
        );
        let text = self
            .client
            .complete(&request)
            .await
            .map_err(|e| e.to_string())?;
        Ok(strip_code_fences(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_trimmed() {
        assert_eq!(strip_code_fences("  <p>Hi</p>\n"), "<p>Hi</p>");
    }

    #[test]
    fn fenced_html_is_unwrapped() {
        let reply = "```html\n<b>Gift Set</b>\n<p>Must be 21+.</p>\n```";
        assert_eq!(
            strip_code_fences(reply),
            "<b>Gift Set</b>\n<p>Must be 21+.</p>"
        );
    }

    #[test]
    fn unterminated_fence_keeps_body() {
        assert_eq!(strip_code_fences("```\n<p>cut off"), "<p>cut off");
    }
}
