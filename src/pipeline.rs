use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::Granularity;
use crate::counters::CounterStore;
use crate::error::{AppError, AppResult};
use crate::metrics::{CLICKS_TOTAL, ORPHAN_CLICKS, PROCESSING_FAILURES, TRACKED_KEYS, VIEWS_TOTAL};
use crate::models::{Category, EventKey};

// What the simulated downstream work does for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Processing {
    pub delay: Duration,
    pub fails: bool,
}

// Source of every random decision in the pipeline. Swap in a fixed one to
// make a request deterministic.
pub trait Simulator: Send + Sync {
    fn category(&self) -> Category;
    fn processing(&self) -> Processing;
    fn click(&self) -> bool;
}

// Uniform category, delay in `0..max_delay`, independent failure and click
// draws.
#[derive(Debug, Clone)]
pub struct RandomSimulator {
    pub max_delay: Duration,
    pub failure_rate: f64,
    pub click_probability: f64,
}

impl Simulator for RandomSimulator {
    fn category(&self) -> Category {
        Category::ALL[rand::thread_rng().gen_range(0..Category::ALL.len())]
    }

    fn processing(&self) -> Processing {
        let mut rng = rand::thread_rng();
        let max_ms = self.max_delay.as_millis() as u64;
        let delay = if max_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rng.gen_range(0..max_ms))
        };
        Processing {
            delay,
            fails: rng.gen_bool(self.failure_rate.clamp(0.0, 1.0)),
        }
    }

    fn click(&self) -> bool {
        rand::thread_rng().gen_bool(self.click_probability.clamp(0.0, 1.0))
    }
}

// Same answer every time
#[derive(Debug, Clone, Copy)]
pub struct FixedSimulator {
    pub category: Category,
    pub processing: Processing,
    pub click: bool,
}

impl Simulator for FixedSimulator {
    fn category(&self) -> Category {
        self.category
    }

    fn processing(&self) -> Processing {
        self.processing
    }

    fn click(&self) -> bool {
        self.click
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutcome {
    pub key: EventKey,
    pub clicked: bool,
}

// Runs one view event: derive key, record view, simulate processing, maybe
// record a click on the same key.
//
// A processing failure returns `AppError::ProcessingFailed` after the view
// has been recorded; the view is kept and no click is simulated.
pub async fn record_event(
    store: &CounterStore,
    simulator: &dyn Simulator,
    granularity: Granularity,
    now: DateTime<Utc>,
) -> AppResult<ViewOutcome> {
    let key = EventKey::new(simulator.category(), now, granularity);

    let views = store.record_view(key.as_str());
    VIEWS_TOTAL.inc();
    // only the caller that created the entry sees 1
    if views == 1 {
        TRACKED_KEYS.inc();
    }

    let processing = simulator.processing();
    if !processing.delay.is_zero() {
        tokio::time::sleep(processing.delay).await;
    }
    if processing.fails {
        PROCESSING_FAILURES.inc();
        debug!(%key, "simulated processing failed");
        return Err(AppError::ProcessingFailed);
    }

    let clicked = simulator.click();
    if clicked {
        match store.record_click(key.as_str()) {
            Ok(_) => CLICKS_TOTAL.inc(),
            Err(e) => {
                ORPHAN_CLICKS.inc();
                error!(error = %e, "click lost");
            }
        }
    }

    debug!(%key, views, clicked, "view recorded");
    Ok(ViewOutcome { key, clicked })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Counts;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn fixed(category: Category, fails: bool, click: bool) -> FixedSimulator {
        FixedSimulator {
            category,
            processing: Processing {
                delay: Duration::ZERO,
                fails,
            },
            click,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 30).unwrap()
    }

    #[tokio::test]
    async fn view_and_click_share_the_key() {
        let store = CounterStore::new();
        let sim = fixed(Category::Sports, false, true);

        let outcome = record_event(&store, &sim, Granularity::Minute, noon())
            .await
            .unwrap();

        assert_eq!(outcome.key.as_str(), "sports:18 Oct 26 12:00 UTC");
        assert!(outcome.clicked);
        assert_eq!(
            store.get(outcome.key.as_str()),
            Some(Counts { views: 1, clicks: 1 })
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn no_click_when_simulator_declines() {
        let store = CounterStore::new();
        let sim = fixed(Category::Education, false, false);

        let outcome = record_event(&store, &sim, Granularity::Minute, noon())
            .await
            .unwrap();

        assert!(!outcome.clicked);
        assert_eq!(
            store.get(outcome.key.as_str()),
            Some(Counts { views: 1, clicks: 0 })
        );
    }

    #[tokio::test]
    async fn failure_keeps_view_and_skips_click() {
        let store = CounterStore::new();
        let sim = fixed(Category::Business, true, true);

        let err = record_event(&store, &sim, Granularity::Minute, noon())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProcessingFailed));
        assert_eq!(
            store.get("business:18 Oct 26 12:00 UTC"),
            Some(Counts { views: 1, clicks: 0 })
        );
    }

    #[tokio::test]
    async fn same_bucket_events_aggregate() {
        let store = CounterStore::new();
        let sim = fixed(Category::Entertainment, false, false);
        let first = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 1).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 59).unwrap();

        record_event(&store, &sim, Granularity::Minute, first).await.unwrap();
        record_event(&store, &sim, Granularity::Minute, second).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("entertainment:18 Oct 26 12:00 UTC").unwrap().views,
            2
        );
    }

    #[tokio::test(start_paused = true)]
    async fn processing_delay_is_awaited() {
        let store = CounterStore::new();
        let sim = FixedSimulator {
            category: Category::Sports,
            processing: Processing {
                delay: Duration::from_millis(40),
                fails: false,
            },
            click: false,
        };

        let started = tokio::time::Instant::now();
        record_event(&store, &sim, Granularity::Minute, noon()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_do_not_lose_views() {
        let store = Arc::new(CounterStore::new());
        let sim: Arc<dyn Simulator> = Arc::new(fixed(Category::Sports, false, true));

        let handles: Vec<_> = (0..200)
            .map(|_| {
                let store = Arc::clone(&store);
                let sim = Arc::clone(&sim);
                tokio::spawn(async move {
                    record_event(&store, sim.as_ref(), Granularity::Minute, noon())
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(
            store.get("sports:18 Oct 26 12:00 UTC"),
            Some(Counts { views: 200, clicks: 200 })
        );
    }

    #[test]
    fn random_simulator_respects_bounds() {
        let sim = RandomSimulator {
            max_delay: Duration::from_millis(50),
            failure_rate: 0.0,
            click_probability: 1.0,
        };
        for _ in 0..200 {
            let processing = sim.processing();
            assert!(processing.delay < Duration::from_millis(50));
            assert!(!processing.fails);
            assert!(sim.click());
            assert!(Category::ALL.contains(&sim.category()));
        }

        let never = RandomSimulator {
            max_delay: Duration::ZERO,
            failure_rate: 1.0,
            click_probability: 0.0,
        };
        assert_eq!(never.processing().delay, Duration::ZERO);
        assert!(never.processing().fails);
        assert!(!never.click());
    }
}
