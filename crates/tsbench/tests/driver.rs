// End-to-end tests for the load / locate / delete / verify cycle

mod common;

use common::{engines, BenchFixture};
use tsbench::engine::open_engine;
use tsbench::{count_range, driver, encode_key, series_range, Generator};

#[test]
fn test_load_round_trip() {
    for kind in engines() {
        let fixture = BenchFixture::new(1000, 100, 1);
        let db = open_engine(kind, &fixture.config).expect("Failed to open engine");
        let mut generator = Generator::new(1, 0, 1);

        let report = driver::run(db.as_ref(), &fixture.config, &mut generator)
            .expect("Benchmark failed");
        assert_eq!(report.load.points, 1000);
        assert_eq!(report.load.batches, 10);
        assert!(report.teardowns.is_empty(), "series 0 is never torn down");

        let (start, end) = series_range(0);
        let mut iter = db.get_range(&start, &end).unwrap();
        let mut keys = Vec::new();
        while iter.next().unwrap() {
            keys.push(iter.key().unwrap().to_vec());
        }
        iter.close().unwrap();

        assert_eq!(keys.len(), 1000, "{:?}", kind);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys[0], encode_key(0, 0, 0).to_vec());
    }
}

#[test]
fn test_load_with_partial_last_batch() {
    for kind in engines() {
        let fixture = BenchFixture::new(250, 100, 1);
        let db = open_engine(kind, &fixture.config).expect("Failed to open engine");
        let mut generator = Generator::new(1, 0, 1);

        let stats = driver::load(db.as_ref(), &fixture.config, &mut generator).unwrap();
        assert_eq!(stats.batches, 3);
        assert_eq!(generator.next_sequence(), 250);

        let (start, end) = series_range(0);
        assert_eq!(count_range(db.as_ref(), &start, &end).unwrap(), 250);
    }
}

#[test]
fn test_teardown_deletes_middle_half() {
    for kind in engines() {
        // Two series of 400 points each; only series 1 is torn down.
        let fixture = BenchFixture::new(800, 100, 2);
        let db = open_engine(kind, &fixture.config).expect("Failed to open engine");
        let mut generator = Generator::new(2, 0, 1);

        let report = driver::run(db.as_ref(), &fixture.config, &mut generator).unwrap();
        assert_eq!(report.teardowns.len(), 1);

        let teardown = &report.teardowns[0];
        assert_eq!(teardown.series_id, 1);
        assert_eq!(teardown.located.points, 400);
        assert_eq!(teardown.verified.points, 200);
        assert_eq!(teardown.deleted, 200);
        assert!(teardown.delete_elapsed.is_some());

        // Series 1 holds every odd global index, so position i is 2i + 1.
        let (del_start, del_end) = teardown.deleted_range.clone().unwrap();
        assert_eq!(del_start, encode_key(1, 201, 201).to_vec());
        assert_eq!(del_end, encode_key(1, 599, 599).to_vec());

        let mut iter = db.get_range(&del_start, &del_end).unwrap();
        assert!(!iter.next().unwrap());
        iter.close().unwrap();

        let (start, end) = series_range(0);
        assert_eq!(count_range(db.as_ref(), &start, &end).unwrap(), 400);
    }
}

#[test]
fn test_teardown_walks_series_in_descending_order() {
    for kind in engines() {
        let fixture = BenchFixture::new(400, 50, 4);
        let db = open_engine(kind, &fixture.config).expect("Failed to open engine");
        let mut generator = Generator::new(4, 0, 1);

        let report = driver::run(db.as_ref(), &fixture.config, &mut generator).unwrap();
        let order: Vec<i64> = report.teardowns.iter().map(|t| t.series_id).collect();
        assert_eq!(order, vec![3, 2, 1]);
        for teardown in &report.teardowns {
            assert_eq!(teardown.located.points, 100);
            assert_eq!(teardown.verified.points, 50);
        }
    }
}

#[test]
fn test_short_series_skips_delete() {
    for kind in engines() {
        let fixture = BenchFixture::new(3, 3, 3);
        let db = open_engine(kind, &fixture.config).expect("Failed to open engine");
        let mut generator = Generator::new(3, 0, 1);

        let report = driver::run(db.as_ref(), &fixture.config, &mut generator).unwrap();
        for teardown in &report.teardowns {
            assert!(teardown.deleted_range.is_none());
            assert_eq!(teardown.deleted, 0);
            assert_eq!(teardown.verified.points, 1);
        }
    }
}

#[test]
fn test_run_benchmarks_resets_data_between_runs() {
    let fixture = BenchFixture::new(300, 64, 3);
    let config = fixture.config.clone().with_engines(engines());

    for _ in 0..2 {
        let reports = tsbench::run_benchmarks(&config).expect("Benchmark failed");
        assert_eq!(reports.len(), engines().len());
        for report in &reports {
            assert_eq!(report.load.points, 300);
            let located: Vec<usize> = report.teardowns.iter().map(|t| t.located.points).collect();
            assert_eq!(located, vec![100, 100]);
        }
    }
}
