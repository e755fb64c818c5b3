/*!
 * Scripted mock provider for testing.
 *
 * The mock answers prompts either from a queue of canned replies or from a
 * responder closure, and records every prompt it receives:
 * - `MockProvider::scripted(replies)` - answers in order, then fails
 * - `MockProvider::with_responder(f)` - computes each answer from the call number and prompt
 * - `MockProvider::failing()` - always fails with a connection error
 *
 * It implements both `Provider` (raw completion text) and the engine's
 * `Oracle` seam, so completions go through the same JSON parsing as real
 * providers.
 */

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::reconcile::oracle::{Oracle, parse_completion};
use crate::reconcile::prompts::ResponseSchema;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The rendered prompt
    pub prompt: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Raw completion text
    pub text: String,
}

/// One canned answer of the mock
#[derive(Debug)]
pub enum MockReply {
    /// Completion text returned as-is
    Text(String),
    /// Failure returned instead of a completion
    Error(ProviderError),
}

impl MockReply {
    /// Completion carrying `value` serialized as JSON
    pub fn json(value: Value) -> Self {
        Self::Text(value.to_string())
    }

    /// Transport-style failure
    pub fn connection_error(message: &str) -> Self {
        Self::Error(ProviderError::ConnectionError(message.to_string()))
    }
}

type Responder = Box<dyn Fn(usize, &str) -> MockReply + Send + Sync>;

/// Behavior mode for the mock provider
enum MockBehavior {
    /// Replies consumed in order
    Scripted(Mutex<VecDeque<MockReply>>),
    /// Reply computed from the 0-based call number and the prompt
    Responder(Responder),
}

/// Mock provider for testing reconciliation behavior
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Every prompt received, in order
    prompts: Arc<Mutex<Vec<String>>>,
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let behavior = match self.behavior {
            MockBehavior::Scripted(_) => "scripted",
            MockBehavior::Responder(_) => "responder",
        };
        f.debug_struct("MockProvider")
            .field("behavior", &behavior)
            .field("request_count", &self.call_count())
            .finish()
    }
}

impl MockProvider {
    fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer with `replies` in order; once exhausted every call fails
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self::new(MockBehavior::Scripted(Mutex::new(replies.into())))
    }

    /// Answer every call through `responder`
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(usize, &str) -> MockReply + Send + Sync + 'static,
    {
        Self::new(MockBehavior::Responder(Box::new(responder)))
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::with_responder(|_, _| MockReply::connection_error("Simulated provider failure"))
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn next_reply(&self, call: usize, prompt: &str) -> MockReply {
        match &self.behavior {
            MockBehavior::Scripted(queue) => queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
                .unwrap_or_else(|| MockReply::connection_error("Mock script exhausted")),
            MockBehavior::Responder(responder) => responder(call, prompt),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let call = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.prompt.clone());

        match self.next_reply(call, &request.prompt) {
            MockReply::Text(text) => Ok(MockResponse { text }),
            MockReply::Error(error) => Err(error),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}

#[async_trait]
impl Oracle for MockProvider {
    async fn complete(&self, prompt: &str, _schema: &ResponseSchema) -> Result<Value, ProviderError> {
        let request = MockRequest { prompt: prompt.to_string() };
        let response = Provider::complete(self, request).await?;
        parse_completion(&Self::extract_text(&response))
    }
}
