use nexmo_client::BalanceSource;
use nexmo_model::ExporterState;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Gauge, IntCounter, Opts, Registry, TextEncoder};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::errors::ExporterError;

pub const DEFAULT_NAMESPACE: &str = "nexmo";

#[derive(Debug, Clone)]
pub struct ExporterOpts {
    /// Prefix applied to every metric name.
    pub namespace: String,
}

impl Default for ExporterOpts {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Collector that fetches the balance on every collection.
///
/// Collections are serialized: a caller arriving while another collection is in flight waits for
/// it, then runs its own full scrape. Waiters are not merged into the running one.
pub struct BalanceExporter<S> {
    source: S,
    namespace: String,
    metrics: Mutex<ExporterMetrics>,
}

/// Metric handles and their registry. Only touched while the exporter lock is held.
struct ExporterMetrics {
    registry: Registry,
    up: Gauge,
    total_scrapes: IntCounter,
    balance: Gauge,
}

impl ExporterMetrics {
    fn new(namespace: &str) -> Result<Self, ExporterError> {
        let up = Gauge::with_opts(
            Opts::new("up", "Was the last scrape of nexmo successful.").namespace(namespace),
        )?;
        let total_scrapes = IntCounter::with_opts(
            Opts::new("exporter_total_scrapes", "Current total nexmo scrapes.").namespace(namespace),
        )?;
        let balance = Gauge::with_opts(
            Opts::new("balance", "Nexmo balance in euros.").namespace(namespace),
        )?;
        let build_info = Gauge::with_opts(
            Opts::new(
                "exporter_build_info",
                "A metric with a constant '1' value labeled by the exporter version.",
            )
            .namespace(namespace)
            .const_label("version", env!("CARGO_PKG_VERSION")),
        )?;
        build_info.set(1.0);

        let registry = Registry::new();
        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(total_scrapes.clone()))?;
        registry.register(Box::new(balance.clone()))?;
        registry.register(Box::new(build_info))?;

        Ok(Self {
            registry,
            up,
            total_scrapes,
            balance,
        })
    }

    fn state(&self) -> ExporterState {
        ExporterState {
            up: self.up.get() >= 1.0,
            total_scrapes: self.total_scrapes.get(),
            balance: self.balance.get(),
        }
    }
}

impl<S> BalanceExporter<S>
where
    S: BalanceSource,
{
    /// Create an exporter with its own registry.
    ///
    /// Fails when `opts.namespace` does not form valid Prometheus metric names.
    pub fn new(source: S, opts: ExporterOpts) -> Result<Self, ExporterError> {
        let metrics = ExporterMetrics::new(&opts.namespace)?;
        Ok(Self {
            source,
            namespace: opts.namespace,
            metrics: Mutex::new(metrics),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Run one scrape and return the resulting state.
    pub async fn scrape(&self) -> ExporterState {
        let metrics = self.metrics.lock().await;
        self.scrape_locked(&metrics).await;
        metrics.state()
    }

    /// Run one scrape and gather every metric family.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let metrics = self.metrics.lock().await;
        self.scrape_locked(&metrics).await;
        metrics.registry.gather()
    }

    /// Run one scrape and encode the result in the text exposition format.
    pub async fn render(&self) -> Result<String, ExporterError> {
        let families = self.collect().await;

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(|e| ExporterError::Encode(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| ExporterError::Encode(e.to_string()))
    }

    /// Last published state, without contacting the upstream.
    pub async fn state(&self) -> ExporterState {
        self.metrics.lock().await.state()
    }

    async fn scrape_locked(&self, metrics: &ExporterMetrics) {
        metrics.total_scrapes.inc();

        match self.source.fetch_balance().await {
            Ok(sample) => {
                metrics.balance.set(sample.value);
                metrics.up.set(1.0);
                debug!(namespace = %self.namespace, balance = sample.value, "scrape succeeded");
            }
            Err(e) => {
                metrics.up.set(0.0);
                error!(
                    namespace = %self.namespace,
                    kind = e.kind(),
                    error = %e.detail(),
                    "can't get balance"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use nexmo_client::{BalanceClient, BalanceError, ClientConfig};
    use nexmo_model::{BalanceSample, Credentials};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Replays a fixed list of outcomes, one per fetch.
    struct ScriptedSource {
        replies: std::sync::Mutex<VecDeque<Result<BalanceSample, BalanceError>>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<BalanceSample, BalanceError>>) -> Self {
            Self {
                replies: std::sync::Mutex::new(replies.into()),
            }
        }
    }

    #[async_trait]
    impl BalanceSource for ScriptedSource {
        async fn fetch_balance(&self) -> Result<BalanceSample, BalanceError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    /// Returns the call index as the balance and tracks how many fetches overlap.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicU64,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl BalanceSource for CountingSource {
        async fn fetch_balance(&self) -> Result<BalanceSample, BalanceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(5)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(BalanceSample::new(n as f64))
        }
    }

    fn exporter(replies: Vec<Result<BalanceSample, BalanceError>>) -> BalanceExporter<ScriptedSource> {
        BalanceExporter::new(ScriptedSource::new(replies), ExporterOpts::default()).unwrap()
    }

    fn sample_value(body: &str, name: &str) -> Option<f64> {
        body.lines()
            .filter(|line| !line.starts_with('#'))
            .find_map(|line| {
                let (metric, value) = line.rsplit_once(' ')?;
                if metric != name {
                    return None;
                }
                value.parse().ok()
            })
    }

    #[tokio::test]
    async fn fresh_exporter_is_zeroed() {
        let exporter = exporter(vec![]);
        assert_eq!(exporter.state().await, ExporterState::default());
    }

    #[tokio::test]
    async fn success_sets_up_and_balance() {
        let exporter = exporter(vec![Ok(BalanceSample::new(12.5))]);

        let state = exporter.scrape().await;
        assert!(state.up);
        assert_eq!(state.balance, 12.5);
        assert_eq!(state.total_scrapes, 1);
    }

    #[tokio::test]
    async fn failure_keeps_last_balance() {
        let exporter = exporter(vec![
            Ok(BalanceSample::new(42.0)),
            Err(BalanceError::UpstreamStatus { code: 500 }),
            Err(BalanceError::Decode("expected f64".into())),
        ]);

        assert!(exporter.scrape().await.up);

        let state = exporter.scrape().await;
        assert!(!state.up);
        assert_eq!(state.balance, 42.0);
        assert_eq!(state.total_scrapes, 2);

        let state = exporter.scrape().await;
        assert!(!state.up);
        assert_eq!(state.balance, 42.0);
        assert_eq!(state.total_scrapes, 3);
    }

    #[tokio::test]
    async fn failure_before_any_success_reports_zero_balance() {
        let exporter = exporter(vec![Err(BalanceError::UpstreamStatus { code: 401 })]);

        let state = exporter.scrape().await;
        assert!(!state.up);
        assert_eq!(state.balance, 0.0);
        assert_eq!(state.total_scrapes, 1);
    }

    #[tokio::test]
    async fn recovers_after_failure() {
        let exporter = exporter(vec![
            Err(BalanceError::UpstreamStatus { code: 502 }),
            Ok(BalanceSample::new(7.25)),
        ]);

        assert!(!exporter.scrape().await.up);
        let state = exporter.scrape().await;
        assert!(state.up);
        assert_eq!(state.balance, 7.25);
    }

    #[tokio::test]
    async fn state_does_not_scrape() {
        let exporter = exporter(vec![Ok(BalanceSample::new(1.0))]);

        exporter.scrape().await;
        let state = exporter.state().await;
        assert_eq!(state.total_scrapes, 1);
        assert_eq!(exporter.state().await, state);
    }

    #[tokio::test]
    async fn render_exposes_namespaced_metrics() {
        let exporter = exporter(vec![Ok(BalanceSample::new(12.5))]);

        let body = exporter.render().await.unwrap();
        assert_eq!(sample_value(&body, "nexmo_up"), Some(1.0));
        assert_eq!(sample_value(&body, "nexmo_balance"), Some(12.5));
        assert_eq!(sample_value(&body, "nexmo_exporter_total_scrapes"), Some(1.0));

        assert!(body.contains("# HELP nexmo_up Was the last scrape of nexmo successful."));
        assert!(body.contains("# TYPE nexmo_exporter_total_scrapes counter"));
        assert!(body.contains("# TYPE nexmo_balance gauge"));
        assert!(body.contains(&format!(
            "nexmo_exporter_build_info{{version=\"{}\"}} 1",
            env!("CARGO_PKG_VERSION")
        )));
    }

    #[tokio::test]
    async fn collect_returns_all_families() {
        let exporter = exporter(vec![Ok(BalanceSample::new(2.0))]);
        assert_eq!(exporter.collect().await.len(), 4);
    }

    #[tokio::test]
    async fn namespaces_only_change_the_prefix() {
        let a = BalanceExporter::new(
            ScriptedSource::new(vec![Ok(BalanceSample::new(5.0))]),
            ExporterOpts {
                namespace: "nexmo_eu".into(),
            },
        )
        .unwrap();
        let b = BalanceExporter::new(
            ScriptedSource::new(vec![Ok(BalanceSample::new(5.0))]),
            ExporterOpts {
                namespace: "nexmo_us".into(),
            },
        )
        .unwrap();

        let body_a = a.render().await.unwrap();
        let body_b = b.render().await.unwrap();

        assert_eq!(sample_value(&body_a, "nexmo_eu_balance"), Some(5.0));
        assert_eq!(sample_value(&body_b, "nexmo_us_balance"), Some(5.0));
        assert!(!body_a.contains("nexmo_us_"));
        assert!(!body_b.contains("nexmo_eu_"));
        assert_eq!(body_a.replace("nexmo_eu_", "nexmo_us_"), body_b);
    }

    #[test]
    fn invalid_namespace_is_rejected() {
        let result = BalanceExporter::new(
            ScriptedSource::new(vec![]),
            ExporterOpts {
                namespace: "bad-namespace".into(),
            },
        );
        assert!(matches!(result, Err(ExporterError::Metrics(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_collections_are_serialized() {
        let source = Arc::new(CountingSource::default());
        let exporter = Arc::new(
            BalanceExporter::new(Arc::clone(&source), ExporterOpts::default()).unwrap(),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let exporter = Arc::clone(&exporter);
                tokio::spawn(async move { exporter.scrape().await })
            })
            .collect();

        let mut seen = Vec::new();
        for handle in handles {
            let state = handle.await.unwrap();
            // The k-th scrape bumps the counter to k and performs the k-th fetch.
            assert_eq!(state.balance, state.total_scrapes as f64);
            assert!(state.up);
            seen.push(state.total_scrapes);
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=8).collect::<Vec<u64>>());
        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 8);
    }

    /// Serves one good balance, then `failure` for every later request.
    async fn upstream_failing_after_first(failure: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account/get-balance/key/secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"value": 12.5, "autoReload": false}"#),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/account/get-balance/key/secret"))
            .respond_with(failure)
            .mount(&server)
            .await;
        server
    }

    fn http_exporter(server: &MockServer) -> BalanceExporter<BalanceClient> {
        let client = BalanceClient::new(
            ClientConfig {
                base_url: server.uri(),
                timeout: Duration::from_secs(2),
            },
            &Credentials::new("key", "secret"),
        )
        .unwrap();
        BalanceExporter::new(client, ExporterOpts::default()).unwrap()
    }

    #[tokio::test]
    async fn upstream_500_marks_down_and_keeps_balance() {
        let server = upstream_failing_after_first(ResponseTemplate::new(500)).await;
        let exporter = http_exporter(&server);

        let state = exporter.scrape().await;
        assert!(state.up);
        assert_eq!(state.balance, 12.5);

        let body = exporter.render().await.unwrap();
        assert_eq!(sample_value(&body, "nexmo_up"), Some(0.0));
        assert_eq!(sample_value(&body, "nexmo_balance"), Some(12.5));
        assert_eq!(sample_value(&body, "nexmo_exporter_total_scrapes"), Some(2.0));
    }

    #[tokio::test]
    async fn malformed_upstream_body_marks_down_and_keeps_balance() {
        let server = upstream_failing_after_first(
            ResponseTemplate::new(200).set_body_string(r#"{"value": "oops"}"#),
        )
        .await;
        let exporter = http_exporter(&server);

        assert!(exporter.scrape().await.up);

        let state = exporter.scrape().await;
        assert!(!state.up);
        assert_eq!(state.balance, 12.5);
        assert_eq!(state.total_scrapes, 2);
    }
}
