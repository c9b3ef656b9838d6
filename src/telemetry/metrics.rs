//! Prometheus metrics setup and metric definitions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    // Prometheus defaults plus sub-millisecond buckets for fast endpoints
    let buckets = vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup (not just after first use).
pub fn describe_metrics() {
    // HTTP metrics
    describe_counter!("taita_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "taita_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "taita_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Tenant resolution
    describe_counter!(
        "taita_tenant_resolution_total",
        "Tenant lookups by result"
    );

    // Comment gate
    describe_counter!(
        "taita_comments_submitted_total",
        "Comment submissions by gate outcome"
    );

    // OTP flow
    describe_counter!("taita_otp_requests_total", "OTP codes requested");
    describe_counter!(
        "taita_otp_verifications_total",
        "OTP verification attempts by result"
    );

    // Admin auth
    describe_counter!("taita_auth_login_total", "Admin login attempts by result");

    // Payments
    describe_counter!(
        "taita_webhook_events_total",
        "Payment webhook deliveries by result"
    );

    counter!("taita_comments_submitted_total", "outcome" => "approved").absolute(0);
    counter!("taita_otp_requests_total", "result" => "sent").absolute(0);
    counter!("taita_otp_verifications_total", "result" => "verified").absolute(0);
    counter!("taita_auth_login_total", "result" => "success").absolute(0);
    counter!("taita_webhook_events_total", "result" => "processed").absolute(0);
    gauge!("taita_http_requests_in_flight").set(0.0);
}
