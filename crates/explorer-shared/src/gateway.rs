//! Model gateway boundary.
//!
//! One synchronous call: prompt in, text out, or a `GatewayError`. The HTTP
//! implementation lives in `explorer_common`; the fakes here drive tests.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub prompt: String,
    /// Output budget, must be > 0
    pub max_output_tokens: u32,
    /// Per-call deadline, must be > 0
    pub timeout_secs: u64,
}

impl GatewayRequest {
    pub fn new(prompt: impl Into<String>, max_output_tokens: u32, timeout_secs: u64) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens,
            timeout_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub text: String,
}

/// The external language-model call.
pub trait ModelGateway {
    fn complete(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}

impl<G: ModelGateway + ?Sized> ModelGateway for &G {
    fn complete(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        (**self).complete(request)
    }
}

impl<G: ModelGateway + ?Sized> ModelGateway for Box<G> {
    fn complete(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        (**self).complete(request)
    }
}

/// Call the gateway for a named stage, logging the call and any failure.
pub fn call_stage<G: ModelGateway + ?Sized>(
    gateway: &G,
    stage: &str,
    request: &GatewayRequest,
) -> Result<String, GatewayError> {
    tracing::debug!(
        stage,
        prompt_chars = request.prompt.len(),
        max_tokens = request.max_output_tokens,
        "model call"
    );
    gateway.complete(request).map(|r| r.text).map_err(|e| {
        tracing::warn!(stage, error = %e, "model call failed, continuing with error marker");
        e
    })
}

/// Call the gateway and degrade a failure into its marker text.
/// Successful text is returned untouched.
pub fn complete_or_marker<G: ModelGateway + ?Sized>(
    gateway: &G,
    stage: &str,
    request: &GatewayRequest,
) -> String {
    call_stage(gateway, stage, request).unwrap_or_else(|e| e.marker())
}

/// Like [`complete_or_marker`], but successful text is trimmed.
/// The marker is kept verbatim.
pub fn complete_trimmed_or_marker<G: ModelGateway + ?Sized>(
    gateway: &G,
    stage: &str,
    request: &GatewayRequest,
) -> String {
    match call_stage(gateway, stage, request) {
        Ok(text) => text.trim().to_string(),
        Err(e) => e.marker(),
    }
}

/// Fake gateway replaying scripted results.
///
/// Pops results in order; the last one repeats forever.
pub struct FakeGateway {
    responses: Mutex<Vec<Result<String, GatewayError>>>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl FakeGateway {
    pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always_ok(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    pub fn always_error(message: impl Into<String>) -> Self {
        Self::new(vec![Err(GatewayError::new(message))])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ModelGateway for FakeGateway {
    fn complete(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| GatewayError::new("fake gateway poisoned"))?;
        let next = match responses.len() {
            0 => Err(GatewayError::new("fake gateway has no scripted responses")),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        };
        next.map(|text| GatewayResponse { text })
    }
}

/// Fake gateway backed by a closure receiving the request and the 1-based
/// call number.
pub struct FnGateway<F> {
    respond: F,
    calls: Mutex<usize>,
}

impl<F> FnGateway<F>
where
    F: Fn(&GatewayRequest, usize) -> Result<String, GatewayError>,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }
}

impl<F> ModelGateway for FnGateway<F>
where
    F: Fn(&GatewayRequest, usize) -> Result<String, GatewayError>,
{
    fn complete(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let n = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| GatewayError::new("fake gateway poisoned"))?;
            *calls += 1;
            *calls
        };
        (self.respond)(request, n).map(|text| GatewayResponse { text })
    }
}
