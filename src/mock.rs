//! In-memory GremlinClient for unit tests
//!
//! Records every script and answers from canned responses keyed by a
//! fragment of the script text or of a binding value.

use async_trait::async_trait;
use serde_json::Value;
use shopgraph_gremlin::{GremlinClient, GremlinError, GremlinResult, Script};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockClient {
    scripts: Mutex<Vec<Script>>,
    responses: Vec<(String, Vec<Value>)>,
    fail_on: Option<String>,
    closed: AtomicBool,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any script whose text or bindings mention `needle`
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    /// Answer scripts whose text or bindings mention `fragment`; first match wins
    pub fn respond(mut self, fragment: &str, values: Vec<Value>) -> Self {
        self.responses.push((fragment.to_string(), values));
        self
    }

    pub fn scripts(&self) -> Vec<Script> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn last_script(&self) -> Script {
        self.scripts().pop().expect("no script submitted")
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

fn mentions(script: &Script, needle: &str) -> bool {
    script.text.contains(needle)
        || script
            .bindings
            .values()
            .any(|v| v.as_str().map_or(false, |s| s.contains(needle)))
}

#[async_trait]
impl GremlinClient for MockClient {
    async fn submit(&self, script: &Script) -> GremlinResult<Vec<Value>> {
        self.scripts.lock().unwrap().push(script.clone());

        if let Some(needle) = &self.fail_on {
            if mentions(script, needle) {
                return Err(GremlinError::Server {
                    code: 597,
                    message: format!("scripted failure on {}", needle),
                });
            }
        }

        Ok(self
            .responses
            .iter()
            .find(|(fragment, _)| mentions(script, fragment))
            .map(|(_, values)| values.clone())
            .unwrap_or_default())
    }

    async fn close(&self) -> GremlinResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn endpoint(&self) -> &str {
        "mock://gremlin"
    }
}
