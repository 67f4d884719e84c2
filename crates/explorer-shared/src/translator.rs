//! Plain-language restatement of the final evolved idea.

use crate::gateway::{complete_trimmed_or_marker, GatewayRequest, ModelGateway};
use crate::prompts;

/// Single stateless call. A failure yields the error marker.
pub fn translate<G: ModelGateway + ?Sized>(
    gateway: &G,
    final_idea: &str,
    max_output_tokens: u32,
    timeout_secs: u64,
) -> String {
    let request = GatewayRequest::new(
        prompts::translation_prompt(final_idea),
        max_output_tokens,
        timeout_secs,
    );
    complete_trimmed_or_marker(gateway, "translation", &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FakeGateway;

    #[test]
    fn test_translate_trims_and_uses_budget() {
        let gateway = FakeGateway::always_ok("  Clocks only agree with clocks.  \n");
        let text = translate(&gateway, "Time is a consensus loop.", 400, 60);
        assert_eq!(text, "Clocks only agree with clocks.");

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_output_tokens, 400);
        assert_eq!(requests[0].timeout_secs, 60);
        assert!(requests[0].prompt.contains("Time is a consensus loop."));
    }

    #[test]
    fn test_translate_failure_is_marker() {
        let gateway = FakeGateway::always_error("HTTP 401");
        assert_eq!(translate(&gateway, "idea", 400, 60), "ERROR: HTTP 401");
    }
}
