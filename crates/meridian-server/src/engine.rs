//! Stateless-per-call interpretation of decoded request envelopes.

use std::sync::Arc;

use meridian_core::rpc::{self, RequestEnvelope, ResponseEnvelope};
use meridian_core::{InfoCategory, InfoProvider};

/// Protocol revision reported in the initialize acknowledgment.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Per-session RPC engine. One instance is bound to each session handle at
/// creation. Holds no mutable state and performs no I/O — every call is a
/// pure function of the envelope plus the injected info provider.
pub struct RpcEngine {
    info: Arc<dyn InfoProvider>,
}

impl RpcEngine {
    pub fn new(info: Arc<dyn InfoProvider>) -> Self {
        Self { info }
    }

    /// Interpret one envelope. Notifications (no id) are observed and
    /// produce no response envelope.
    pub fn handle(&self, envelope: &RequestEnvelope) -> Option<ResponseEnvelope> {
        let Some(id) = envelope.id.clone() else {
            tracing::debug!(method = %envelope.method, "notification accepted");
            return None;
        };

        let response = match envelope.method.as_str() {
            "initialize" => self.initialize(id),
            "company.info" => self.company_info(id, envelope.params.as_ref()),
            _ => ResponseEnvelope::method_not_found(id, &envelope.method),
        };
        Some(response)
    }

    fn initialize(&self, id: serde_json::Value) -> ResponseEnvelope {
        ResponseEnvelope::success(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "serverInfo": {
                    "name": "meridian",
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "instructions": "Call company.info with an optional category of \
                                 overview, focus, contact, investment, or all.",
            }),
        )
    }

    fn company_info(
        &self,
        id: serde_json::Value,
        params: Option<&serde_json::Value>,
    ) -> ResponseEnvelope {
        let category = InfoCategory::parse(rpc::optional_str(params, "category"));
        let text = self.info.describe(category);
        ResponseEnvelope::success(
            id,
            serde_json::json!({
                "category": category.as_str(),
                "text": text,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::rpc::METHOD_NOT_FOUND;
    use meridian_core::CompanyProfile;

    fn engine() -> RpcEngine {
        RpcEngine::new(Arc::new(CompanyProfile::default()))
    }

    fn envelope(json: serde_json::Value) -> RequestEnvelope {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn initialize_reports_server_info() {
        let resp = engine()
            .handle(&envelope(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize",
            })))
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "meridian");
        assert!(result["serverInfo"]["version"].is_string());
    }

    #[test]
    fn response_correlates_to_request_id() {
        let resp = engine()
            .handle(&envelope(serde_json::json!({
                "jsonrpc": "2.0", "id": "req-42", "method": "company.info",
            })))
            .unwrap();
        assert_eq!(resp.id, serde_json::json!("req-42"));
    }

    #[test]
    fn company_info_defaults_to_all() {
        let resp = engine()
            .handle(&envelope(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "company.info",
            })))
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["category"], "all");
        assert!(result["text"].as_str().unwrap().contains("Meridian"));
    }

    #[test]
    fn company_info_selects_category() {
        let resp = engine()
            .handle(&envelope(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "company.info",
                "params": {"category": "contact"},
            })))
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["category"], "contact");
        assert!(result["text"].as_str().unwrap().contains("hello@meridian.vc"));
    }

    #[test]
    fn unrecognized_category_falls_to_default() {
        let resp = engine()
            .handle(&envelope(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "company.info",
                "params": {"category": "headcount"},
            })))
            .unwrap();
        assert_eq!(resp.result.unwrap()["category"], "all");
    }

    #[test]
    fn non_string_category_falls_to_default() {
        let resp = engine()
            .handle(&envelope(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "company.info",
                "params": {"category": 7},
            })))
            .unwrap();
        assert_eq!(resp.result.unwrap()["category"], "all");
    }

    #[test]
    fn unknown_method_is_reported() {
        let resp = engine()
            .handle(&envelope(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "company.delete",
            })))
            .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert!(error.message.contains("company.delete"));
    }

    #[test]
    fn notification_produces_no_response() {
        let resp = engine().handle(&envelope(serde_json::json!({
            "jsonrpc": "2.0", "method": "notifications/initialized",
        })));
        assert!(resp.is_none());
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let env = envelope(serde_json::json!({
            "jsonrpc": "2.0", "id": 1, "method": "company.info",
            "params": {"category": "investment"},
        }));
        let e = engine();
        let first = e.handle(&env).unwrap().result.unwrap();
        let second = e.handle(&env).unwrap().result.unwrap();
        assert_eq!(first, second);
    }
}
