#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tsbench_core::{encode_key, Db, Write};
use tsbench_storage::{MdbConfig, MdbDb};

#[derive(Debug, Arbitrary)]
enum Op {
    Put { series: u8, ts: u16 },
    Del { series: u8, from: u16, to: u16 },
    Scan { series: u8, from: u16, to: u16 },
}

fn key(series: u8, ts: u16) -> Vec<u8> {
    encode_key(series as i64 % 4, ts as i64, 0).to_vec()
}

fuzz_target!(|ops: Vec<Op>| {
    let dir = match tempfile::TempDir::new() {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let config = MdbConfig::default().with_map_size(16 << 20);
    let db = MdbDb::open_with_config(dir.path().join("mdb"), config).expect("open lmdb");

    // Model of what the engine should hold
    let mut model = BTreeSet::new();

    for op in ops.into_iter().take(64) {
        match op {
            Op::Put { series, ts } => {
                let k = key(series, ts);
                db.batch_write(&[Write::new(k.clone(), b"v".to_vec())]).expect("write");
                model.insert(k);
            }
            Op::Del { series, from, to } => {
                let (start, end) = (key(series, from.min(to)), key(series, from.max(to)));
                db.del(&start, &end).expect("del");
                model.retain(|k| *k < start || *k > end);
            }
            Op::Scan { series, from, to } => {
                let (start, end) = (key(series, from.min(to)), key(series, from.max(to)));
                let mut iter = db.get_range(&start, &end).expect("range");
                let mut got = Vec::new();
                while iter.next().expect("next") {
                    got.push(iter.key().expect("key").to_vec());
                }
                iter.close().expect("close");
                let want: Vec<_> = model.range(start..=end).cloned().collect();
                assert_eq!(got, want);
            }
        }
    }
});
