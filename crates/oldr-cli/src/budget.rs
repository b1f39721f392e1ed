use std::sync::Arc;
use std::time::Instant;

use oldr_core::{LogDiagnostics, RedirectConfig, RedirectListener, Redirector, RequestDetails, RequestType};

pub struct BudgetOptions {
    pub config: RedirectConfig,
    pub iterations: usize,
}

const BUDGET_CONSTRUCT_MS: f64 = 5.0;
const BUDGET_DECIDE_P99_US: f64 = 50.0;

pub fn run_budget(opts: BudgetOptions) -> Result<(), String> {
    println!("Decision Latency Budget");
    println!("==================================================");

    let construct_begin = Instant::now();
    let redirector = Redirector::new(opts.config)
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    let construct_ms = construct_begin.elapsed().as_secs_f64() * 1000.0;

    let requests = budget_requests(&redirector);
    let listener = RedirectListener::new(Arc::new(redirector), Arc::new(LogDiagnostics));

    println!("Warming up...");
    for _ in 0..1000 {
        for req in &requests {
            let _ = listener.handle(req);
        }
    }

    println!("Measuring decision latency...");
    let latencies = measure_latency(&listener, &requests, opts.iterations);
    let p50_us = percentile(&latencies, 0.50);
    let p99_us = percentile(&latencies, 0.99);

    let mut passed = true;
    println!();
    println!("Results");
    println!("--------------------------------------------------");

    passed &= report_budget("Construction", construct_ms, BUDGET_CONSTRUCT_MS, "ms");
    println!("  Decide P50 Latency: {:.2} μs", p50_us);
    passed &= report_budget("Decide P99 Latency", p99_us, BUDGET_DECIDE_P99_US, "μs");

    println!();
    println!("==================================================");

    if passed {
        println!("✓ All latency budgets passed");
        Ok(())
    } else {
        Err("Latency budget exceeded".to_string())
    }
}

fn report_budget(name: &str, actual: f64, limit: f64, unit: &str) -> bool {
    let passed = actual <= limit;
    let status = if passed { "✓" } else { "✗" };
    println!(
        "{} {}: {:.2} {} (limit: {:.2} {})",
        status, name, actual, unit, limit, unit
    );
    passed
}

/// One request per host class, built from the configured domains.
fn budget_requests(redirector: &Redirector) -> Vec<RequestDetails> {
    let config = redirector.config();
    let excluded = config.primary_exclusions.iter().next().cloned().unwrap_or_default();
    let media = config.media_exclusions.iter().next().cloned().unwrap_or_default();

    let urls = [
        (format!("https://www.{}/r/rust/comments/abc123/title/?context=3", config.primary_domain), "main_frame"),
        (format!("https://{}/abc123", config.short_link_domain), "main_frame"),
        (format!("https://{}/r/rust/", config.target_host), "main_frame"),
        (format!("https://{}/abcdef.png", excluded), "sub_frame"),
        (format!("https://{}/abcdef.png", media), "sub_frame"),
        (format!("https://x.{}/abc", config.short_link_domain), "sub_frame"),
        (format!("https://www.{}/static/app.js", config.primary_domain), "script"),
        ("https://unrelatedsite.com/".to_string(), "main_frame"),
    ];

    urls.into_iter()
        .map(|(url, request_type)| RequestDetails {
            url,
            request_type: RequestType::from_str(request_type),
        })
        .collect()
}

fn measure_latency(listener: &RedirectListener, requests: &[RequestDetails], iterations: usize) -> Vec<f64> {
    let mut latencies = Vec::with_capacity(iterations * requests.len());

    for _ in 0..iterations {
        for req in requests {
            let start = Instant::now();
            let _ = listener.handle(req);
            let elapsed = start.elapsed().as_secs_f64() * 1_000_000.0;
            latencies.push(elapsed);
        }
    }

    latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    latencies
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64) * p).ceil() as usize;
    let idx = idx.saturating_sub(1).min(sorted.len() - 1);
    sorted[idx]
}
