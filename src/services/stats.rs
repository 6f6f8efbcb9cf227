use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Samples kept per path for the moving averages
const WINDOW: usize = 100;

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    cache_hits: u64,
    cache_misses: u64,
    cache_times: VecDeque<f64>,
    store_times: VecDeque<f64>,
}

/// In-process resolution counters, shared across requests.
#[derive(Debug, Default)]
pub struct ResolverStats {
    counters: Mutex<Counters>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Percentage, 0 when nothing has been resolved yet
    pub hit_rate: f64,
    pub avg_cache_response_ms: f64,
    pub avg_store_response_ms: f64,
}

impl ResolverStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, from_cache: bool, elapsed: Duration) {
        let ms = elapsed.as_secs_f64() * 1000.0;
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());

        counters.total_requests += 1;
        let samples = if from_cache {
            counters.cache_hits += 1;
            &mut counters.cache_times
        } else {
            counters.cache_misses += 1;
            &mut counters.store_times
        };
        if samples.len() == WINDOW {
            samples.pop_front();
        }
        samples.push_back(ms);
    }

    pub fn report(&self) -> StatsReport {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());

        let hit_rate = if counters.total_requests == 0 {
            0.0
        } else {
            counters.cache_hits as f64 / counters.total_requests as f64 * 100.0
        };

        StatsReport {
            total_requests: counters.total_requests,
            cache_hits: counters.cache_hits,
            cache_misses: counters.cache_misses,
            hit_rate,
            avg_cache_response_ms: average(&counters.cache_times),
            avg_store_response_ms: average(&counters.store_times),
        }
    }
}

fn average(samples: &VecDeque<f64>) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}
