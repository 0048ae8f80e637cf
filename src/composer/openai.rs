use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::settings::ComposerSettings;

use super::{Composer, ComposerPrompt};

/// Longest error body echoed into a failure message.
const ERROR_BODY_LIMIT: usize = 300;

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiComposer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiComposer {
    pub fn new(settings: &ComposerSettings, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            temperature: settings.temperature,
        }
    }

    fn request<'a>(&'a self, prompt: &'a ComposerPrompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl Composer for OpenAiComposer {
    async fn compose(&self, prompt: &ComposerPrompt) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .with_context(|| format!("composer request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "composer returned {status}: {}",
                body.chars().take(ERROR_BODY_LIMIT).collect::<String>()
            );
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("composer reply was not a chat completion")?;
        reply_text(reply)
    }
}

fn reply_text(reply: ChatResponse) -> Result<String> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("composer reply carried no message content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn composer_for(endpoint: String) -> OpenAiComposer {
        let settings = ComposerSettings {
            endpoint,
            model: "test-model".into(),
            ..ComposerSettings::default()
        };
        OpenAiComposer::new(&settings, "sk-test".into())
    }

    fn prompt() -> ComposerPrompt {
        ComposerPrompt {
            system: "You write Sonic Pi.".into(),
            user: "focus 40".into(),
        }
    }

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    #[test]
    fn request_carries_both_messages() {
        let composer = composer_for("http://localhost".into());
        let prompt = prompt();
        let json = serde_json::to_value(composer.request(&prompt)).unwrap();

        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You write Sonic Pi.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "focus 40");
    }

    #[test]
    fn reply_without_choices_is_an_error() {
        let reply: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(reply_text(reply).is_err());

        let reply: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(reply_text(reply).is_err());
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"sleep 1.0"}}]}"#,
        )
        .await;

        let text = composer_for(endpoint).compose(&prompt()).await.unwrap();
        assert_eq!(text, "sleep 1.0");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains("\"model\":\"test-model\""));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (endpoint, server) =
            serve_once("503 Service Unavailable", r#"{"error":"overloaded"}"#).await;

        let err = composer_for(endpoint).compose(&prompt()).await.unwrap_err();
        assert!(err.to_string().contains("503"), "{err}");
        server.await.unwrap();
    }
}
