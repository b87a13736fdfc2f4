//! Shared fixtures: a scripted in-memory inference backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use platewise_app::Session;
use platewise_core::{Locale, PromptBuilder};
use platewise_llm::{Inference, LlmError, LlmRequest, LlmResponse};

pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

pub const MEAL_PLAN_REPLY: &str = r#"```json
{
  "breakfast": {"name": "현미밥과 된장국", "calories": 420, "description": "단백질과 식이섬유"},
  "lunch": {"name": "닭가슴살 샐러드", "calories": 510.5, "description": "저지방 고단백"},
  "dinner": {"name": "연어구이", "calories": 470, "description": "오메가-3"},
  "totalCalories": 1400.5,
  "tips": "물을 충분히 드세요."
}
```"#;

pub const CLEAN_PLATE_REPLY: &str = r#"{
  "cleanPlate": true,
  "foodRemaining": "",
  "usedDishes": ["밥그릇", "국그릇"],
  "unusedDishes": [],
  "score": 95,
  "feedback": "깨끗하게 드셨어요!"
}"#;

/// Replies are taken in call order; each call then optionally waits on a
/// gate before answering.
#[derive(Default)]
pub struct ScriptedInference {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedInference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call blocks until the returned semaphore gets a permit.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let inference = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (inference, gate)
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, err: LlmError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    pub fn push_reply(&self, text: &str) {
        self.replies.lock().push_back(Ok(text.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }
}

impl Inference for ScriptedInference {
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        let next = self.replies.lock().pop_front();

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| LlmError::Unavailable(e.to_string()))?
                .forget();
        }

        next.unwrap_or_else(|| Err(LlmError::Unavailable("script exhausted".into())))
            .map(|text| LlmResponse {
                text,
                latency_ms: 0,
                model: "scripted".into(),
            })
    }
}

pub fn session(inference: ScriptedInference) -> (Session<ScriptedInference>, Arc<ScriptedInference>) {
    let inference = Arc::new(inference);
    let session = Session::new(Arc::clone(&inference), PromptBuilder::builtin(Locale::Ko));
    (session, inference)
}
