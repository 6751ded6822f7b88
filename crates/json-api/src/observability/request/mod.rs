//! Request-level logging, request IDs, and parent trace extraction.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Liveness and scrape endpoints, polled too often to be worth logging.
const PROBE_PATHS: [&str; 2] = ["/healthcheck", "/metrics"];

fn is_probe(path: &str) -> bool {
    PROBE_PATHS.contains(&path)
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if is_probe(req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let names = spans::request_span_name(&method, &path);
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %names.otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %req.remote_addr(),
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if settings::otel_parent_propagation_enabled()
        && let Some(parent_context) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let completed = Completed {
        method: &method,
        path: &path,
        request_id: &request_id,
        status: request_ids::response_status_or_ok(res.status_code),
        duration: started.elapsed(),
    };

    metrics::observe_request(
        &method,
        &names.otel_path,
        completed.status.as_u16(),
        completed.duration.as_secs_f64(),
    );

    completed.log(&span);
}

struct Completed<'a> {
    method: &'a str,
    path: &'a str,
    request_id: &'a str,
    status: StatusCode,
    duration: Duration,
}

impl Completed<'_> {
    fn log(&self, span: &Span) {
        let status = self.status.as_u16();
        let duration_ms = self.duration.as_millis();
        let threshold_ms = u128::from(settings::slow_request_threshold_ms());

        span.record("status", status);
        span.record("duration_ms", duration_ms);

        span.in_scope(|| {
            info!(status, duration_ms, "request.completed");

            if self.status.is_server_error() {
                error!(
                    status,
                    method = %self.method,
                    path = %self.path,
                    request_id = %self.request_id,
                    "server error response"
                );
            } else if self.status.is_client_error() {
                warn!(
                    status,
                    method = %self.method,
                    path = %self.path,
                    request_id = %self.request_id,
                    "client error response"
                );
            }

            if duration_ms > threshold_ms {
                warn!(
                    method = %self.method,
                    path = %self.path,
                    request_id = %self.request_id,
                    duration_ms,
                    threshold_ms,
                    "slow request detected"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use salvo::{prelude::*, test::TestClient};

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn probes_are_recognised() {
        assert!(is_probe("/healthcheck"));
        assert!(is_probe("/metrics"));
        assert!(!is_probe("/api/orders"));
    }

    #[tokio::test]
    async fn request_id_is_echoed_back() {
        let service = Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("api/products").get(ok)),
        );

        let res = TestClient::get("http://example.com/api/products")
            .add_header(request_ids::REQUEST_ID_HEADER, "req-123", true)
            .send(&service)
            .await;

        let echoed = res
            .headers()
            .get(request_ids::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        assert_eq!(echoed, Some("req-123"));
    }

    #[tokio::test]
    async fn probes_skip_request_ids() {
        let service = Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("healthcheck").get(ok)),
        );

        let res = TestClient::get("http://example.com/healthcheck")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(
            res.headers().get(request_ids::REQUEST_ID_HEADER).is_none(),
            "probe responses should not carry a request id"
        );
    }
}
