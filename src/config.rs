use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "schoold",
    version,
    about = "School dashboard policy sidecar (JSON lines over stdio)"
)]
pub struct Args {
    /// Dataset snapshot (classes + transactions) to load at start-up.
    #[arg(long, env = "SCHOOLD_DATASET")]
    pub dataset: Option<PathBuf>,

    /// tracing filter directive; logs go to stderr.
    #[arg(long, env = "SCHOOLD_LOG", default_value = "info")]
    pub log: String,

    /// Evaluate "today" at this UTC offset instead of the host time zone.
    #[arg(long, env = "SCHOOLD_UTC_OFFSET_MINUTES", allow_negative_numbers = true)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: Option<PathBuf>,
    pub log: String,
    pub offset: Option<FixedOffset>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Config> {
        let offset = match args.utc_offset_minutes {
            Some(m) => Some(
                FixedOffset::east_opt(m.saturating_mul(60))
                    .ok_or_else(|| anyhow!("utc offset out of range: {} minutes", m))?,
            ),
            None => None,
        };
        Ok(Config {
            dataset: args.dataset,
            log: args.log,
            offset,
        })
    }

    /// The evaluator's local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.local_date(&Utc::now())
    }

    /// Calendar date of an instant in the evaluator's zone, whatever zone the
    /// instant was written in.
    pub fn local_date<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDate {
        match self.offset {
            Some(off) => instant.with_timezone(&off).date_naive(),
            None => instant.with_timezone(&Local).date_naive(),
        }
    }
}
