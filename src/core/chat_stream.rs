use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::StreamExt;
use memchr::memchr;
use tracing::{debug, warn};

use crate::api::{ChatMessage, ChatRequest, ChatResponse};
use crate::core::crew::{Agent, AgentError};
use crate::utils::url::construct_api_url;

#[derive(Clone, Debug, PartialEq, Eq)]
enum SseEvent {
    Chunk(String),
    Error(String),
    End,
    Ignored,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn handle_data_payload(payload: &str) -> SseEvent {
    if payload == "[DONE]" {
        return SseEvent::End;
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .map(SseEvent::Chunk)
            .unwrap_or(SseEvent::Ignored),
        Err(_) => {
            if payload.trim().is_empty() {
                return SseEvent::Ignored;
            }
            SseEvent::Error(format_api_error(payload))
        }
    }
}

fn process_sse_line(line: &str) -> SseEvent {
    extract_data_payload(line)
        .map(handle_data_payload)
        .unwrap_or(SseEvent::Ignored)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                serde_json::Value::Object(map) => map
                    .get("message")
                    .and_then(|message| message.as_str().map(str::to_owned)),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

/// One-line description of an error body for the console.
fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API ERROR: <empty response body>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return format!("API ERROR: {summary}");
            }
        }
        return format!("API ERROR: {json_value}");
    }

    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("API ERROR: {collapsed}")
}

/// Where and how an agent talks to its OpenAI-compatible backend.
#[derive(Clone, Debug)]
pub struct ChatEndpoint {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
}

/// Streams a chat completion and returns the accumulated reply.
pub async fn stream_completion(
    endpoint: &ChatEndpoint,
    messages: Vec<ChatMessage>,
) -> Result<String, AgentError> {
    let request = ChatRequest {
        model: endpoint.model.clone(),
        messages,
        stream: true,
        max_tokens: endpoint.max_tokens,
    };
    let url = construct_api_url(&endpoint.base_url, "chat/completions");
    let mut http = endpoint
        .client
        .post(url)
        .header("Content-Type", "application/json");
    if let Some(api_key) = endpoint.api_key.as_deref() {
        http = http.header("Authorization", format!("Bearer {api_key}"));
    }

    let response = http
        .json(&request)
        .send()
        .await
        .map_err(|err| AgentError::Request(err.to_string()))?;

    if !response.status().is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        return Err(AgentError::Api(format_api_error(&error_text)));
    }

    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();
    let mut reply = String::new();

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| AgentError::Request(err.to_string()))?;
        buffer.extend_from_slice(&bytes);

        while let Some(newline_pos) = memchr(b'\n', &buffer) {
            let event = match std::str::from_utf8(&buffer[..newline_pos]) {
                Ok(line) => process_sse_line(line.trim()),
                Err(err) => {
                    warn!(error = %err, "skipping non-UTF-8 stream line");
                    SseEvent::Ignored
                }
            };
            buffer.drain(..=newline_pos);

            match event {
                SseEvent::Chunk(content) => reply.push_str(&content),
                SseEvent::Error(message) => return Err(AgentError::Api(message)),
                SseEvent::End => return finish_reply(reply),
                SseEvent::Ignored => {}
            }
        }
    }

    finish_reply(reply)
}

fn finish_reply(reply: String) -> Result<String, AgentError> {
    if reply.trim().is_empty() {
        Err(AgentError::EmptyResponse)
    } else {
        Ok(reply)
    }
}

#[derive(Default)]
struct Memory {
    generation: u64,
    messages: Vec<ChatMessage>,
}

/// A crew member backed by a streaming chat-completions endpoint.
///
/// Replies that arrive after a [`reset`](Agent::reset) are not remembered.
pub struct ChatAgent {
    endpoint: ChatEndpoint,
    system_prompt: Option<String>,
    memory: Mutex<Memory>,
}

impl ChatAgent {
    pub fn new(endpoint: ChatEndpoint, system_prompt: Option<String>) -> Self {
        Self {
            endpoint,
            system_prompt,
            memory: Mutex::new(Memory::default()),
        }
    }

    #[cfg(test)]
    fn history_len(&self) -> usize {
        self.memory().messages.len()
    }

    fn memory(&self) -> MutexGuard<'_, Memory> {
        self.memory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prepare(&self, query: &str) -> (u64, Vec<ChatMessage>) {
        let memory = self.memory();
        let messages = self
            .system_prompt
            .iter()
            .map(|prompt| ChatMessage::system(prompt.as_str()))
            .chain(memory.messages.iter().cloned())
            .chain(std::iter::once(ChatMessage::user(query)))
            .collect();
        (memory.generation, messages)
    }

    fn remember(&self, generation: u64, query: &str, reply: &str) {
        let mut memory = self.memory();
        if memory.generation != generation {
            debug!("discarding reply that arrived after a memory reset");
            return;
        }
        memory.messages.push(ChatMessage::user(query));
        memory.messages.push(ChatMessage::assistant(reply));
    }
}

#[async_trait]
impl Agent for ChatAgent {
    async fn chat(&self, query: &str) -> Result<String, AgentError> {
        let (generation, messages) = self.prepare(query);
        debug!(model = %self.endpoint.model, turns = messages.len(), "sending chat request");
        let reply = stream_completion(&self.endpoint, messages).await?;
        self.remember(generation, query, &reply);
        Ok(reply)
    }

    fn reset(&self) {
        let mut memory = self.memory();
        memory.generation += 1;
        memory.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn endpoint(base_url: &str) -> ChatEndpoint {
        ChatEndpoint {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: None,
            model: "test-model".to_string(),
            max_tokens: None,
        }
    }

    /// Serves one canned HTTP response and returns the raw request text.
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                request.extend_from_slice(&chunk[..read]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length || read == 0 {
                        break;
                    }
                }
                if read == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/event-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{addr}/v1"), handle)
    }

    #[test]
    fn process_sse_line_handles_spacing_variants() {
        assert_eq!(
            process_sse_line(r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#),
            SseEvent::Chunk("Hello".to_string())
        );
        assert_eq!(
            process_sse_line(r#"data:{"choices":[{"delta":{"content":"World"}}]}"#),
            SseEvent::Chunk("World".to_string())
        );
        assert_eq!(process_sse_line("data: [DONE]"), SseEvent::End);
        assert_eq!(process_sse_line("data:[DONE]"), SseEvent::End);
        assert_eq!(process_sse_line(": keep-alive"), SseEvent::Ignored);
        assert_eq!(
            process_sse_line(r#"data: {"choices":[{"delta":{}}]}"#),
            SseEvent::Ignored
        );
    }

    #[test]
    fn process_sse_line_routes_stream_errors() {
        let error_line = r#"data: {"error":{"message":"internal server error"}}"#;
        assert_eq!(
            process_sse_line(error_line),
            SseEvent::Error("API ERROR: internal server error".to_string())
        );
    }

    #[test]
    fn format_api_error_prefers_summary() {
        let raw = r#"{"error":{"message":"model   overloaded","type":"invalid_request_error"}}"#;
        assert_eq!(format_api_error(raw), "API ERROR: model overloaded");
    }

    #[test]
    fn format_api_error_handles_json_without_summary_and_plaintext() {
        assert_eq!(
            format_api_error(r#"{"status":"failed"}"#),
            r#"API ERROR: {"status":"failed"}"#
        );
        assert_eq!(format_api_error("  api\n failure "), "API ERROR: api failure");
        assert_eq!(format_api_error("   "), "API ERROR: <empty response body>");
    }

    #[test]
    fn prepare_puts_system_prompt_history_and_query_in_order() {
        let agent = ChatAgent::new(endpoint("http://unused"), Some("be brief".to_string()));
        agent.remember(0, "first", "one");

        let (generation, messages) = agent.prepare("second");
        assert_eq!(generation, 0);
        assert_eq!(
            messages,
            vec![
                ChatMessage::system("be brief"),
                ChatMessage::user("first"),
                ChatMessage::assistant("one"),
                ChatMessage::user("second"),
            ]
        );
    }

    #[test]
    fn replies_from_before_a_reset_are_forgotten() {
        let agent = ChatAgent::new(endpoint("http://unused"), None);
        let (generation, _) = agent.prepare("question");
        agent.reset();
        agent.remember(generation, "question", "stale answer");
        assert_eq!(agent.history_len(), 0);
    }

    #[tokio::test]
    async fn chat_accumulates_streamed_chunks_and_remembers_them() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Course \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"laid in.\"}}]}\n\n",
            "data: [DONE]\n\n"
        )
        .to_string();
        let (base_url, server) = serve_once("200 OK", body).await;
        let agent = ChatAgent::new(endpoint(&base_url), Some("navigator".to_string()));

        let reply = agent.chat("plot a course").await.unwrap();
        assert_eq!(reply, "Course laid in.");
        assert_eq!(agent.history_len(), 2);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.contains("\"stream\":true"));
        assert!(request.contains("plot a course"));
    }

    #[tokio::test]
    async fn http_errors_surface_the_api_summary() {
        let (base_url, _server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":{"message":"model not loaded"}}"#.to_string(),
        )
        .await;
        let agent = ChatAgent::new(endpoint(&base_url), None);

        let err = agent.chat("status?").await.unwrap_err();
        assert_eq!(err.to_string(), "API ERROR: model not loaded");
        assert_eq!(agent.history_len(), 0);
    }
}
