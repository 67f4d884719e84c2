//! Random topic generation: ask the model for one claim, then clean it up.

use crate::gateway::{call_stage, GatewayRequest, ModelGateway};
use crate::prompts;

/// Preambles like `Claim: ...` shorter than this are dropped.
const MAX_PREAMBLE_CHARS: usize = 30;

/// Reduce a free-text answer to a single claim sentence.
pub fn clean_topic(raw: &str) -> String {
    let mut topic = raw.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string();

    if let Some((label, rest)) = topic.split_once(':') {
        if label.chars().count() < MAX_PREAMBLE_CHARS {
            topic = rest.trim().to_string();
        }
    }

    if let Some((first, _)) = topic.split_once('.') {
        let first = first.trim();
        if !first.is_empty() {
            topic = format!("{}.", first);
        }
    }

    if topic.is_empty() {
        return raw.trim().to_string();
    }
    topic
}

/// Ask the model for a topic. A failed call yields the error marker as the
/// topic so the run can still proceed and the failure shows in the transcript.
pub fn generate_topic<G: ModelGateway + ?Sized>(
    gateway: &G,
    max_output_tokens: u32,
    timeout_secs: u64,
) -> String {
    let request = GatewayRequest::new(prompts::topic_prompt(), max_output_tokens, timeout_secs);
    match call_stage(gateway, "topic", &request) {
        Ok(raw) => clean_topic(&raw),
        Err(e) => e.marker(),
    }
}
