//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the geolocation domain.
//! They have no external dependencies beyond serde and contain only business logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::time::{Duration, Instant};

/// One IP-to-location fact.
///
/// The same seven fields, in this order, make up a CSV source row,
/// a stored row and the lookup API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// Canonical textual IP address (natural key)
    pub ip_address: String,
    /// Two character country code (not checked against ISO 3166)
    pub country_code: String,
    pub country: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Opaque passthrough value
    pub mystery_value: String,
}

/// Running counters of one import run.
///
/// Counters only ever grow while the run is in progress. `finish` fixes
/// the elapsed time; later calls leave it untouched.
#[derive(Debug, Clone)]
pub struct IngestionStats {
    /// When the run started
    pub started_at: Instant,
    /// Wall time of the run, fixed by `finish`
    pub elapsed: Duration,
    /// Records newly written to the store
    pub uploaded: u64,
    /// Records whose key was already persisted
    pub duplicated_in_store: u64,
    /// Records whose key repeated inside the same batch
    pub duplicated_in_source: u64,
    /// Records rejected by validation
    pub bad_records: u64,
    finished: bool,
}

impl IngestionStats {
    /// Start a new, zeroed set of counters.
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            elapsed: Duration::ZERO,
            uploaded: 0,
            duplicated_in_store: 0,
            duplicated_in_source: 0,
            bad_records: 0,
            finished: false,
        }
    }

    /// Account for one flushed batch of `submitted` rows, `inserted` of which were new.
    pub fn record_flush(&mut self, submitted: usize, inserted: u64) {
        let submitted = submitted as u64;
        self.uploaded += inserted;
        self.duplicated_in_store += submitted.saturating_sub(inserted);
    }

    /// Fix the elapsed time. Only the first call has an effect.
    pub fn finish(&mut self) {
        if !self.finished {
            self.elapsed = self.started_at.elapsed();
            self.finished = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True when no record has been counted yet.
    pub fn is_empty(&self) -> bool {
        self.uploaded == 0
            && self.duplicated_in_store == 0
            && self.duplicated_in_source == 0
            && self.bad_records == 0
    }

    /// Write the human readable report.
    pub fn print<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        write!(w, "{}", self)
    }
}

impl Default for IngestionStats {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for IngestionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import statistics:")?;
        writeln!(f, "\tAdded new records: {}", self.uploaded)?;
        writeln!(f, "\tAlready present in store: {}", self.duplicated_in_store)?;
        writeln!(f, "\tDuplicated records in source: {}", self.duplicated_in_source)?;
        writeln!(f, "\tBad records: {}", self.bad_records)?;
        writeln!(f, "\tTime spent: {:?}", self.elapsed)
    }
}
