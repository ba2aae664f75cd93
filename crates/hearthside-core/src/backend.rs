//! Text-generation backend boundary.
//!
//! Dialogue comes from an external HTTP service. Requests run on worker
//! threads so the tick loop never blocks on the network; the broker
//! collects finished results for the context to poll each tick. Backend
//! failures are ordinary values here, never panics.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hearthside_logic::generation::{GenerationRequest, GenerationResponse, SamplingParams};

/// Connection and sampling settings for the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub endpoint: String,
    pub max_length: u32,
    pub temperature: f32,
    pub stop_sequence: Vec<String>,
    pub sampling: Option<SamplingParams>,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            endpoint: "http://127.0.0.1:5000/api/v1/generate".to_string(),
            max_length: 80,
            temperature: 0.7,
            stop_sequence: vec!["\n\n".to_string()],
            sampling: None,
            timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    /// Load settings from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &str) -> Result<Self, BackendError> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Build a wire request for `prompt` using these settings.
    pub fn request(&self, prompt: String) -> GenerationRequest {
        GenerationRequest {
            prompt,
            max_length: self.max_length,
            temperature: self.temperature,
            stop_sequence: self.stop_sequence.clone(),
            sampling: self.sampling,
        }
    }
}

/// Errors from talking to the generation service.
#[derive(Debug)]
pub enum BackendError {
    Io(std::io::Error),
    Http(reqwest::Error),
    Json(serde_json::Error),
    /// The service answered but had no usable text.
    EmptyResponse,
    /// The worker thread died before sending a result.
    WorkerGone,
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Http(err)
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Json(err)
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Io(e) => write!(f, "IO error: {}", e),
            BackendError::Http(e) => write!(f, "HTTP error: {}", e),
            BackendError::Json(e) => write!(f, "JSON error: {}", e),
            BackendError::EmptyResponse => write!(f, "backend returned no text"),
            BackendError::WorkerGone => write!(f, "generation worker exited without a result"),
        }
    }
}

impl std::error::Error for BackendError {}

/// A service that turns prompts into text. Implementations must be
/// callable from worker threads.
pub trait DialogueBackend: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

/// The real backend: JSON over HTTP.
pub struct HttpDialogueBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpDialogueBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HttpDialogueBackend {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl DialogueBackend for HttpDialogueBackend {
    fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()?
            .error_for_status()?;
        let parsed: GenerationResponse = response.json()?;
        match parsed.first_text() {
            Some(text) => Ok(text.to_string()),
            None => Err(BackendError::EmptyResponse),
        }
    }
}

/// Why a generation was requested, so the result can be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPurpose {
    DateChat {
        conversation: u32,
        initiator: u32,
        partner: u32,
    },
    Taunt,
}

struct PendingGeneration {
    id: u64,
    speaker: u32,
    purpose: GenerationPurpose,
    response_rx: Receiver<Result<String, BackendError>>,
    canceled: bool,
}

/// A finished generation, ready for dispatch.
pub struct CompletedGeneration {
    pub speaker: u32,
    pub purpose: GenerationPurpose,
    /// Set when the requester lost interest before the result landed.
    pub canceled: bool,
    pub result: Result<String, BackendError>,
}

/// Hands prompts to worker threads and collects their results.
pub struct GenerationBroker {
    backend: Arc<dyn DialogueBackend>,
    config: BackendConfig,
    pending: Vec<PendingGeneration>,
    next_id: u64,
}

impl GenerationBroker {
    pub fn new(backend: Arc<dyn DialogueBackend>, config: BackendConfig) -> Self {
        GenerationBroker {
            backend,
            config,
            pending: Vec::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Send `prompt` to the backend on a worker thread. The result shows
    /// up in a later [`GenerationBroker::poll`].
    pub fn submit(&mut self, speaker: u32, purpose: GenerationPurpose, prompt: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let request = self.config.request(prompt);
        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        thread::spawn(move || {
            let _ = tx.send(backend.generate(&request));
        });
        self.pending.push(PendingGeneration {
            id,
            speaker,
            purpose,
            response_rx: rx,
            canceled: false,
        });
        log::debug!("generation {} submitted for agent {}", id, speaker);
        id
    }

    /// Flag every in-flight generation for `agent` so its result is
    /// discarded on arrival. The worker itself is left to finish.
    pub fn cancel_for(&mut self, agent: u32) {
        for pending in &mut self.pending {
            if pending.speaker == agent && !pending.canceled {
                pending.canceled = true;
                log::debug!("generation {} for agent {} canceled", pending.id, agent);
            }
        }
    }

    /// Collect results that have arrived since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<CompletedGeneration> {
        let mut completed = Vec::new();
        let mut still_pending = Vec::new();
        for pending in self.pending.drain(..) {
            match pending.response_rx.try_recv() {
                Ok(result) => completed.push(CompletedGeneration {
                    speaker: pending.speaker,
                    purpose: pending.purpose,
                    canceled: pending.canceled,
                    result,
                }),
                Err(TryRecvError::Empty) => still_pending.push(pending),
                Err(TryRecvError::Disconnected) => completed.push(CompletedGeneration {
                    speaker: pending.speaker,
                    purpose: pending.purpose,
                    canceled: pending.canceled,
                    result: Err(BackendError::WorkerGone),
                }),
            }
        }
        self.pending = still_pending;
        completed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop all in-flight work, e.g. when loading a save.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticBackend(&'static str);

    impl DialogueBackend for StaticBackend {
        fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingBackend;

    impl DialogueBackend for FailingBackend {
        fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
            Err(BackendError::EmptyResponse)
        }
    }

    fn poll_until_done(broker: &mut GenerationBroker) -> Vec<CompletedGeneration> {
        for _ in 0..200 {
            let completed = broker.poll();
            if !completed.is_empty() {
                return completed;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("generation never completed");
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"endpoint": "http://example.test/gen"}"#).unwrap();
        assert_eq!(config.endpoint, "http://example.test/gen");
        assert_eq!(config.max_length, 80);
        assert_eq!(config.stop_sequence, vec!["\n\n".to_string()]);
        assert!(config.sampling.is_none());
    }

    #[test]
    fn config_loads_from_json_file() {
        let path =
            std::env::temp_dir().join(format!("hearthside-backend-{}.json", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        std::fs::write(
            &path,
            r#"{"endpoint": "http://example.test/gen", "timeout_secs": 3}"#,
        )
        .unwrap();

        let config = BackendConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.endpoint, "http://example.test/gen");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.max_length, 80);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let result = BackendConfig::from_json_file("/nonexistent/hearthside-backend.json");
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn config_builds_request() {
        let config = BackendConfig::default();
        let request = config.request("A prompt.".to_string());
        assert_eq!(request.prompt, "A prompt.");
        assert_eq!(request.max_length, config.max_length);
        assert_eq!(request.stop_sequence, config.stop_sequence);
    }

    #[test]
    fn submit_and_poll_round_trip() {
        let mut broker =
            GenerationBroker::new(Arc::new(StaticBackend("Hello.")), BackendConfig::default());
        broker.submit(3, GenerationPurpose::Taunt, "say hello".to_string());
        assert_eq!(broker.pending_count(), 1);

        let completed = poll_until_done(&mut broker);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].speaker, 3);
        assert!(!completed[0].canceled);
        assert_eq!(completed[0].result.as_deref().unwrap(), "Hello.");
        assert_eq!(broker.pending_count(), 0);
    }

    #[test]
    fn cancellation_survives_to_completion() {
        let mut broker =
            GenerationBroker::new(Arc::new(StaticBackend("Too late.")), BackendConfig::default());
        broker.submit(5, GenerationPurpose::Taunt, "taunt".to_string());
        broker.cancel_for(5);

        let completed = poll_until_done(&mut broker);
        assert!(completed[0].canceled);
        // The result still arrives; discarding it is the dispatcher's job.
        assert!(completed[0].result.is_ok());
    }

    #[test]
    fn cancel_only_touches_matching_agent() {
        let mut broker =
            GenerationBroker::new(Arc::new(StaticBackend("Line.")), BackendConfig::default());
        broker.submit(1, GenerationPurpose::Taunt, "one".to_string());
        broker.submit(2, GenerationPurpose::Taunt, "two".to_string());
        broker.cancel_for(1);

        let mut completed = Vec::new();
        for _ in 0..200 {
            completed.extend(broker.poll());
            if completed.len() == 2 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(completed.len(), 2);
        for done in completed {
            assert_eq!(done.canceled, done.speaker == 1);
        }
    }

    #[test]
    fn backend_errors_surface_as_values() {
        let mut broker = GenerationBroker::new(Arc::new(FailingBackend), BackendConfig::default());
        broker.submit(7, GenerationPurpose::Taunt, "never mind".to_string());

        let completed = poll_until_done(&mut broker);
        assert!(matches!(
            completed[0].result,
            Err(BackendError::EmptyResponse)
        ));
    }

    #[test]
    fn clear_drops_in_flight_work() {
        let mut broker =
            GenerationBroker::new(Arc::new(StaticBackend("gone")), BackendConfig::default());
        broker.submit(1, GenerationPurpose::Taunt, "x".to_string());
        broker.clear();
        assert_eq!(broker.pending_count(), 0);
        assert!(broker.poll().is_empty());
    }
}
