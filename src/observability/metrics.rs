use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub route_optimizations_total: IntCounterVec,
    pub optimize_latency_seconds: HistogramVec,
    pub stops_dropped_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let route_optimizations_total = IntCounterVec::new(
            Opts::new(
                "route_optimizations_total",
                "Total route optimization attempts by outcome",
            ),
            &["outcome"],
        )
        .expect("valid route_optimizations_total metric");

        let optimize_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "optimize_latency_seconds",
                "Latency of the full optimize round trip in seconds",
            ),
            &["outcome"],
        )
        .expect("valid optimize_latency_seconds metric");

        let stops_dropped_total = IntCounter::new(
            "stops_dropped_total",
            "Stops excluded from optimization for missing or sentinel coordinates",
        )
        .expect("valid stops_dropped_total metric");

        registry
            .register(Box::new(route_optimizations_total.clone()))
            .expect("register route_optimizations_total");
        registry
            .register(Box::new(optimize_latency_seconds.clone()))
            .expect("register optimize_latency_seconds");
        registry
            .register(Box::new(stops_dropped_total.clone()))
            .expect("register stops_dropped_total");

        Self {
            registry,
            route_optimizations_total,
            optimize_latency_seconds,
            stops_dropped_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
