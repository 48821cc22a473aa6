use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "view-counter")]
#[command(about = "In-memory view/click counter with periodic flush to disk")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // File the counters are flushed to (replaced wholesale on every flush)
    #[arg(short, long, default_value = "store.json")]
    pub store_path: PathBuf,

    // Flush period in seconds
    #[arg(short, long, default_value_t = 5)]
    pub flush_interval: u64,

    // Max /stats/ requests per window
    #[arg(long, default_value_t = 10)]
    pub stats_limit: u64,

    // /stats/ window in seconds
    #[arg(long, default_value_t = 5)]
    pub stats_window: u64,

    // Upper bound of the simulated processing delay, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub max_delay_ms: u64,

    // Chance that a view is followed by a simulated click
    #[arg(long, default_value_t = 0.5, value_parser = parse_probability)]
    pub click_probability: f64,

    // Chance that simulated processing fails (request answered with 400)
    #[arg(long, default_value_t = 0.0, value_parser = parse_probability)]
    pub failure_rate: f64,

    // Width of the time bucket in event keys
    #[arg(short, long, value_enum, default_value_t = Granularity::Minute)]
    pub granularity: Granularity,
}

impl Args {
    pub fn flush_period(&self) -> Duration {
        Duration::from_secs(self.flush_interval.max(1))
    }

    pub fn stats_window(&self) -> Duration {
        Duration::from_secs(self.stats_window)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

// Time bucket used when formatting event keys. Coarser buckets collapse more
// events into one counter.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Minute,
    Hour,
}

impl Granularity {
    pub fn format(&self) -> &'static str {
        match self {
            Granularity::Minute => "%d %b %y %H:%M %Z",
            Granularity::Hour => "%d %b %y %H:00 %Z",
        }
    }
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("not a number: {e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not within 0.0..=1.0"))
    }
}
