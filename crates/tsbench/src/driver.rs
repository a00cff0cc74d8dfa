//! Benchmark driver
//!
//! For one engine: load the configured number of points, then walk the
//! series from the highest id down to 1. For each series, a full scan
//! locates the keys at the first and third quartile, the half between them
//! is deleted, and a second scan checks the series is still queryable.
//! Series 0 is never touched and stays in the dataset as a baseline.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::BenchConfig;
use crate::generator::Generator;
use crate::{decode_key, series_range, Db, DbIterator, Result};

fn micros_per(elapsed: Duration, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    elapsed.as_nanos() as f64 / 1000.0 / count as f64
}

/// Timing of the load phase
#[derive(Debug, Clone)]
pub struct LoadStats {
    /// Points written
    pub points: usize,
    /// Configured batch size
    pub batch: usize,
    /// Number of batches issued
    pub batches: usize,
    /// Wall time of the whole load
    pub elapsed: Duration,
}

impl LoadStats {
    /// Write throughput
    pub fn points_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.points as f64 / secs
    }

    /// Average write latency per point
    pub fn micros_per_point(&self) -> f64 {
        micros_per(self.elapsed, self.points)
    }
}

/// Timing of one full-series scan
#[derive(Debug, Clone)]
pub struct QueryStats {
    /// Series scanned
    pub series_id: i64,
    /// Points visited
    pub points: usize,
    /// Wall time of the scan
    pub elapsed: Duration,
}

impl QueryStats {
    /// Average scan latency per point
    pub fn micros_per_point(&self) -> f64 {
        micros_per(self.elapsed, self.points)
    }
}

/// Outcome of the locate / delete / verify cycle for one series
#[derive(Debug, Clone)]
pub struct SeriesTeardown {
    /// Series torn down
    pub series_id: i64,
    /// Scan that located the delete boundaries
    pub located: QueryStats,
    /// Inclusive range that was deleted, if both boundaries were found
    pub deleted_range: Option<(Vec<u8>, Vec<u8>)>,
    /// Time taken by the delete
    pub delete_elapsed: Option<Duration>,
    /// Points that disappeared between the locating and verifying scans
    pub deleted: usize,
    /// Scan run after the delete
    pub verified: QueryStats,
}

/// Everything measured for one engine
#[derive(Debug, Clone)]
pub struct BenchReport {
    /// Engine label
    pub engine: &'static str,
    /// Load phase
    pub load: LoadStats,
    /// Per-series teardowns, highest series id first
    pub teardowns: Vec<SeriesTeardown>,
}

/// Runs the full benchmark against one engine
pub fn run<D: Db + ?Sized>(
    db: &D,
    config: &BenchConfig,
    generator: &mut Generator,
) -> Result<BenchReport> {
    info!(
        engine = db.name(),
        points = config.points,
        batch = config.batch,
        series = config.series,
        "starting benchmark"
    );

    let load = load(db, config, generator)?;

    let per_series = config.points_per_series();
    let mut teardowns = Vec::with_capacity(config.series.saturating_sub(1));
    for series_id in (1..config.series as i64).rev() {
        teardowns.push(query_and_delete(db, series_id, per_series)?);
    }

    info!(engine = db.name(), "benchmark finished");
    Ok(BenchReport {
        engine: db.name(),
        load,
        teardowns,
    })
}

/// Writes exactly `config.points` points in batches of `config.batch`
///
/// The last batch is shortened when the total is not a multiple of the
/// batch size.
pub fn load<D: Db + ?Sized>(
    db: &D,
    config: &BenchConfig,
    generator: &mut Generator,
) -> Result<LoadStats> {
    config.validate()?;

    let start = Instant::now();
    let mut remaining = config.points;
    let mut batches = 0;
    while remaining > 0 {
        let size = remaining.min(config.batch);
        let writes = generator.make_batch(size)?;
        db.batch_write(&writes)?;
        remaining -= writes.len();
        batches += 1;
        if batches % 1000 == 0 {
            debug!(batches, remaining, "load progress");
        }
    }

    let stats = LoadStats {
        points: config.points,
        batch: config.batch,
        batches,
        elapsed: start.elapsed(),
    };
    println!(
        "Writing {} points in batches of {} points took {:?} ({:.0} points per second, {:.6} microseconds per point)",
        stats.points,
        stats.batch,
        stats.elapsed,
        stats.points_per_sec(),
        stats.micros_per_point()
    );
    Ok(stats)
}

/// Scans every point of one series, handing each position to `visit`
///
/// The iterator is closed on success; if the scan or `visit` fails it is
/// released when dropped.
pub fn query_series<D, F>(db: &D, series_id: i64, mut visit: F) -> Result<QueryStats>
where
    D: Db + ?Sized,
    F: FnMut(usize, &dyn DbIterator) -> Result<()>,
{
    println!("Querying series {}", series_id);
    let (first, last) = series_range(series_id);

    let start = Instant::now();
    let mut iter = db.get_range(&first, &last)?;
    let mut points = 0;
    while iter.next()? {
        visit(points, &*iter)?;
        points += 1;
    }
    iter.close()?;

    let stats = QueryStats {
        series_id,
        points,
        elapsed: start.elapsed(),
    };
    println!(
        "Took {:?} to query {} points ({:.6} microseconds per point)",
        stats.elapsed,
        stats.points,
        stats.micros_per_point()
    );
    Ok(stats)
}

/// Positions of the first and last point to delete in a series of
/// `per_series` points, or `None` when the series is too short
///
/// Positions count from zero. Counting from one would shift the window one
/// point earlier without changing its size.
pub fn delete_positions(per_series: usize) -> Option<(usize, usize)> {
    let last = (3 * per_series / 4).checked_sub(1)?;
    Some((per_series / 4, last))
}

/// Deletes the middle half of one series and rescans it
///
/// Boundaries come from [`delete_positions`]. When either boundary is
/// missing the delete is skipped.
pub fn query_and_delete<D: Db + ?Sized>(
    db: &D,
    series_id: i64,
    per_series: usize,
) -> Result<SeriesTeardown> {
    let (start_pos, end_pos) = delete_positions(per_series).unzip();

    let mut del_start = None;
    let mut del_end = None;
    let located = query_series(db, series_id, |pos, iter| {
        if Some(pos) == start_pos {
            del_start = Some(iter.key()?.to_vec());
        }
        if Some(pos) == end_pos {
            del_end = Some(iter.key()?.to_vec());
        }
        Ok(())
    })?;

    let (deleted_range, delete_elapsed) = match (del_start, del_end) {
        (Some(first), Some(last)) => {
            debug!(
                series_id,
                start = ?decode_key(&first),
                end = ?decode_key(&last),
                "delete boundaries"
            );
            let start = Instant::now();
            db.del(&first, &last)?;
            let elapsed = start.elapsed();
            println!("Took {:?} to delete data", elapsed);
            (Some((first, last)), Some(elapsed))
        }
        _ => {
            warn!(
                series_id,
                points = located.points,
                "series too short to locate delete boundaries, skipping delete"
            );
            (None, None)
        }
    };

    let verified = query_series(db, series_id, |_, _| Ok(()))?;
    let deleted = located.points.saturating_sub(verified.points);
    println!("Deleted {} points", deleted);

    Ok(SeriesTeardown {
        series_id,
        located,
        deleted_range,
        delete_elapsed,
        deleted,
        verified,
    })
}
