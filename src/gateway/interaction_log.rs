use std::time::Instant;

use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
struct Request {
    url: String,
    params: serde_json::Value,
}

/// Finished record of one round trip to an external service
#[derive(Debug, Serialize)]
pub struct InteractionLog {
    service: &'static str,
    request: Option<Request>,
    status: Option<u16>,
    response: Option<serde_json::Value>,
    kind: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: time::OffsetDateTime,
    duration: f32,
}

/// Collects masked request/response data while a gateway call is in flight.
///
/// Callers are expected to pass already masked values.
#[derive(Debug)]
pub struct InteractionSpan {
    service: &'static str,
    created: Instant,
    request: Option<Request>,
    response: Option<serde_json::Value>,
    response_status: Option<u16>,
}

impl InteractionSpan {
    pub fn enter(service: &'static str) -> Self {
        Self {
            service,
            created: Instant::now(),
            request: None,
            response: None,
            response_status: None,
        }
    }

    pub fn set_request(&mut self, url: String, params: &impl Serialize) {
        let params = serde_json::to_value(params).unwrap_or(serde_json::Value::Null);
        self.request = Some(Request { url, params });
    }

    pub fn set_response(&mut self, res: &impl Serialize) {
        self.response = serde_json::to_value(res).ok();
    }

    pub fn set_response_status(&mut self, status: u16) {
        self.response_status = Some(status);
    }

    /// Closes the span and emits it as a single debug event
    pub fn finish(self, kind: &str) -> InteractionLog {
        let log = InteractionLog {
            service: self.service,
            request: self.request,
            status: self.response_status,
            response: self.response,
            kind: kind.into(),
            created_at: OffsetDateTime::now_utc(),
            duration: self.created.elapsed().as_secs_f32(),
        };
        match serde_json::to_string(&log) {
            Ok(json) => tracing::debug!(
                service = log.service,
                kind,
                status = ?log.status,
                duration = log.duration,
                interaction = %json,
                "External interaction"
            ),
            Err(e) => tracing::warn!("Failed to serialize interaction log: {e}"),
        }
        log
    }
}

#[cfg(test)]
mod tests {
    use super::InteractionSpan;

    #[test]
    fn span_records_status_and_kind() {
        let mut span = InteractionSpan::enter("tripay");
        span.set_request("https://example.test/x".into(), &serde_json::json!({ "a": 1 }));
        span.set_response_status(201);
        let log = span.finish("create_transaction");
        assert_eq!(log.status, Some(201));
        assert_eq!(log.kind, "create_transaction");
    }
}
