//! decode: prints the runs stored in one table.
//!
//! ```text
//! cargo run --bin decode -- <output-dir> <batch> <worker>
//! ```

use std::env;

use anyhow::{Context, Result, bail};

use nc_record::{CsvRecordStore, RecordStore, RunRecord};

fn parse<T: std::str::FromStr>(arg: &str, what: &str) -> Result<T> {
    arg.parse().ok().with_context(|| format!("{what} must be a number, got {arg:?}"))
}

fn print_record(i: usize, r: &RunRecord) {
    let alarms: Vec<usize> = r.alarms.iter().enumerate().filter(|&(_, &a)| a == 1).map(|(n, _)| n).collect();
    println!(
        "run {i}: {} nodes, central #{}, {} links ({} removed), alarms {:?}",
        r.node_count,
        r.central_node_index,
        r.adjacency_pre.edge_count(),
        r.links_removed(),
        alarms
    );
    for (w, row) in r.latency_before.iter().enumerate() {
        println!("  before w{w}: {row:?}");
    }
    for (w, row) in r.latency_after.iter().enumerate() {
        println!("  after  w{w}: {row:?}");
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [dir, batch, worker] = args.as_slice() else {
        bail!("usage: decode <output-dir> <batch> <worker>");
    };
    let batch: u32 = parse(batch, "batch")?;
    let worker: usize = parse(worker, "worker")?;

    let store = CsvRecordStore::new(dir.as_str())?;
    let table = store
        .read_table(batch, worker)
        .with_context(|| format!("decoding {}", store.path(batch, worker).display()))?;

    let p = table.params();
    println!(
        "{}: {} runs, {} windows of {} pings every {} s, cut at window {}",
        CsvRecordStore::file_name(batch, worker),
        table.len(),
        p.window_count,
        p.pings_per_window,
        p.time_between_pings,
        p.link_cut_window
    );
    for (i, r) in table.records().iter().enumerate() {
        print_record(i, r);
    }
    Ok(())
}
