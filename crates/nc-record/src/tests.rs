//! Unit tests for nc-record.

#[cfg(test)]
mod fixtures {
    use nc_core::RunParameters;
    use nc_topology::{AdjacencyMatrix, Edge, encode};

    use crate::RunRecord;

    pub fn params(link_cut_window: u32) -> RunParameters {
        RunParameters { link_cut_window, ..RunParameters::default() }
    }

    /// Ring over `n` nodes with a chord 0-2; the cut (when scheduled)
    /// removes 0-1 and node 1 raises the alarm.
    pub fn record(n: usize, params: &RunParameters) -> RunRecord {
        let mut edges: Vec<Edge> = (0..n).map(|i| Edge::between(i, (i + 1) % n)).collect();
        edges.push(Edge::between(0, 2));
        let pre: AdjacencyMatrix = encode(n, &edges);
        let mut post = pre.clone();
        let mut alarms = vec![0u8; n];
        if params.schedules_cut() {
            post.clear_pair(0, 1);
            alarms[1] = 1;
        }
        let row = |w: usize| (0..n).map(|i| if i == 3 % n { 0 } else { (w * 100 + i) as u64 }).collect();
        let before = params.windows_before_cut();
        RunRecord {
            node_count: n,
            central_node_index: 3 % n,
            alarms,
            latency_before: (0..before).map(row).collect(),
            latency_after: (before..params.window_count as usize).map(row).collect(),
            adjacency_pre: pre,
            adjacency_post: post,
        }
    }
}

#[cfg(test)]
mod rows {
    use nc_core::{NodeIndex, RunParameters};
    use nc_measure::LatencyMatrix;
    use nc_topology::AdjacencyMatrix;

    use super::fixtures::{params, record};
    use crate::{RecordError, RunRecord, decode_params, encode_params, record_len};

    #[test]
    fn field_layout() {
        let p = params(2);
        let r = record(4, &p);
        let fields = r.encode();
        assert_eq!(fields.len(), 2 + 4 + 5 * 4 + 2 * 16);
        assert_eq!(fields.len(), record_len(4, &p).unwrap());
        assert_eq!(&fields[..2], &[4, 3]);
        assert_eq!(&fields[2..6], &[0, 1, 0, 0]);
        // first window of the pre-cut block
        assert_eq!(&fields[6..10], &[0, 1, 2, 0]);
        // first window of the post-cut block
        assert_eq!(&fields[14..18], &[200, 201, 202, 0]);
        // pre-cut adjacency row 0 of the ring 0-1-2-3-0 plus chord 0-2
        assert_eq!(&fields[26..30], &[0, 1, 1, 1]);
        // post-cut adjacency row 0 without 0-1
        assert_eq!(&fields[42..46], &[0, 0, 1, 1]);
    }

    #[test]
    fn round_trip_across_sizes_and_cut_windows() {
        for n in [4, 10, 75] {
            for cut in [0, 2, 5] {
                let p = params(cut);
                let r = record(n, &p);
                let back = RunRecord::decode(&r.encode(), &p, 1).unwrap();
                assert_eq!(back, r, "n = {n}, link_cut_window = {cut}");
            }
        }
    }

    #[test]
    fn cut_window_at_end_has_no_post_block() {
        let p = params(5);
        let r = RunRecord::decode(&record(10, &p).encode(), &p, 1).unwrap();
        assert_eq!(r.latency_before.len(), 5);
        assert!(r.latency_after.is_empty());
        assert_eq!(r.adjacency_pre, r.adjacency_post);
        assert!(r.alarms.iter().all(|&a| a == 0));
    }

    #[test]
    fn measurements_are_split_and_truncated() {
        let p = RunParameters::default();
        let latency = LatencyMatrix::from_series(
            5,
            3,
            [(NodeIndex(1), vec![10.0; 5]), (NodeIndex(2), vec![10.9, 0.2, 3.5, 7.99, 1.0])],
        );
        let pre = AdjacencyMatrix::new(3);
        let r = RunRecord::from_measurements(&p, NodeIndex(0), vec![0, 0, 0], &latency, pre.clone(), pre);
        assert_eq!(r.latency_before, vec![vec![0, 10, 10], vec![0, 10, 0]]);
        assert_eq!(r.latency_after, vec![vec![0, 10, 3], vec![0, 10, 7], vec![0, 10, 1]]);
        assert_eq!(r.encode().len(), record_len(3, &p).unwrap());
    }

    #[test]
    fn removed_links_count_only_pre_cut_links() {
        let p = params(2);
        let r = record(6, &p);
        assert_eq!(r.links_removed(), 1);

        let mut grown = r.clone();
        grown.adjacency_pre = r.adjacency_post.clone();
        grown.adjacency_post = r.adjacency_pre.clone();
        assert_eq!(grown.links_removed(), 0);

        let uncut = record(6, &params(5));
        assert_eq!(uncut.links_removed(), 0);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let p = params(2);
        let mut fields = record(4, &p).encode();
        fields.push(0);
        let err = RunRecord::decode(&fields, &p, 7).unwrap_err();
        assert!(matches!(err, RecordError::LengthMismatch { row: 7, expected: 58, got: 59 }));

        fields.truncate(40);
        assert!(matches!(RunRecord::decode(&fields, &p, 1), Err(RecordError::LengthMismatch { .. })));
        assert!(matches!(RunRecord::decode(&[4], &p, 1), Err(RecordError::LengthMismatch { .. })));
    }

    #[test]
    fn rows_decoded_with_other_parameters_fail() {
        let fields = record(4, &params(2)).encode();
        let other = RunParameters { window_count: 6, ..params(2) };
        assert!(matches!(RunRecord::decode(&fields, &other, 1), Err(RecordError::LengthMismatch { .. })));
    }

    #[test]
    fn bad_header_and_flags_are_malformed() {
        let p = params(2);
        let mut fields = record(4, &p).encode();
        fields[1] = 4;
        assert!(matches!(RunRecord::decode(&fields, &p, 1), Err(RecordError::Malformed { row: 1, .. })));

        let mut fields = record(4, &p).encode();
        fields[3] = 2;
        assert!(matches!(RunRecord::decode(&fields, &p, 1), Err(RecordError::Malformed { .. })));

        let mut fields = record(4, &p).encode();
        let last = fields.len() - 1;
        fields[last] = 9;
        assert!(matches!(RunRecord::decode(&fields, &p, 1), Err(RecordError::Malformed { .. })));

        assert!(matches!(RunRecord::decode(&[0, 0], &p, 1), Err(RecordError::Malformed { .. })));
        assert!(matches!(RunRecord::decode(&[u64::MAX, 0], &p, 1), Err(RecordError::Malformed { .. })));
    }

    #[test]
    fn parameter_row() {
        let p = RunParameters { simulation_count: 3, ..RunParameters::default() };
        let fields = encode_params(&p);
        assert_eq!(fields, vec![3, 30, 4, 5, 2, 5]);
        assert_eq!(decode_params(&fields).unwrap(), p);

        let err = decode_params(&[3, 30, 4, 5, 2, 5, 0]).unwrap_err();
        assert!(matches!(err, RecordError::LengthMismatch { row: 0, expected: 6, got: 7 }));
        assert!(matches!(decode_params(&[3, 30, 4, 5, 6, 5]), Err(RecordError::Malformed { row: 0, .. })));
        assert!(matches!(decode_params(&[3, 30, 0, 5, 2, 5]), Err(RecordError::Malformed { .. })));
        assert!(matches!(decode_params(&[3, u64::MAX, 4, 5, 2, 5]), Err(RecordError::Malformed { .. })));
    }
}

#[cfg(test)]
mod tables {
    use super::fixtures::{params, record};
    use crate::{RecordError, RecordTable, decode_table};

    fn table(runs: usize) -> RecordTable {
        let p = params(2);
        let mut t = RecordTable::new(p);
        for i in 0..runs {
            t.push(record(4 + i, &p));
        }
        t
    }

    #[test]
    fn parameter_row_counts_stored_runs() {
        let t = table(3);
        let rows = t.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec![3, 30, 4, 5, 2, 5]);
        assert_eq!(rows[2][0], 5);
        assert_eq!(t.params().simulation_count, 3);
    }

    #[test]
    fn table_round_trip() {
        let t = table(3);
        assert_eq!(decode_table(&t.rows()).unwrap(), t);

        let empty = table(0);
        let back = decode_table(&empty.rows()).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn run_count_must_match() {
        let mut rows = table(2).rows();
        rows.pop();
        assert!(matches!(decode_table(&rows), Err(RecordError::Malformed { row: 0, .. })));
        assert!(matches!(decode_table(&[]), Err(RecordError::Malformed { .. })));
    }

    #[test]
    fn malformed_row_fails_whole_table() {
        let mut rows = table(3).rows();
        rows[2].push(1);
        assert!(matches!(decode_table(&rows), Err(RecordError::LengthMismatch { row: 2, .. })));
    }
}

#[cfg(test)]
mod csv_store {
    use std::fs;

    use tempfile::TempDir;

    use super::fixtures::{params, record};
    use crate::{CsvRecordStore, RecordError, RecordStore, RecordTable};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn file_per_batch_and_worker() {
        let dir = tmp();
        let store = CsvRecordStore::new(dir.path()).unwrap();
        let t = RecordTable::new(params(2));
        store.write_table(1, 0, &t).unwrap();
        store.write_table(1, 3, &t).unwrap();
        store.write_table(2, 0, &t).unwrap();
        for name in ["data_latency_1_t0.csv", "data_latency_1_t3.csv", "data_latency_2_t0.csv"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn headerless_variable_width_rows() {
        let dir = tmp();
        let store = CsvRecordStore::new(dir.path()).unwrap();
        let p = params(2);
        let mut t = RecordTable::new(p);
        t.push(record(4, &p));
        t.push(record(6, &p));
        store.write_table(1, 0, &t).unwrap();

        let text = fs::read_to_string(store.path(1, 0)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "2,30,4,5,2,5");
        assert_eq!(lines[1].split(',').count(), 58);
        assert_eq!(lines[2].split(',').count(), 2 + 6 + 30 + 72);

        assert_eq!(store.read_table(1, 0).unwrap(), t);
    }

    #[test]
    fn fractional_cells_are_truncated() {
        let dir = tmp();
        let store = CsvRecordStore::new(dir.path()).unwrap();
        fs::write(store.path(4, 1), "0.0,30.0,4,5.9,2,5\r\n").unwrap();
        assert_eq!(store.read_rows(4, 1).unwrap(), vec![vec![0, 30, 4, 5, 2, 5]]);
        let t = store.read_table(4, 1).unwrap();
        assert_eq!(t.params().window_count, 5);
        assert!(t.is_empty());
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let dir = tmp();
        let store = CsvRecordStore::new(dir.path()).unwrap();
        fs::write(store.path(1, 0), "1,30,4,5,2,5\n4,x\n").unwrap();
        assert!(matches!(store.read_rows(1, 0), Err(RecordError::Malformed { row: 1, .. })));
        fs::write(store.path(1, 0), "-3,30,4,5,2,5\n").unwrap();
        assert!(matches!(store.read_rows(1, 0), Err(RecordError::Malformed { row: 0, .. })));
    }

    #[test]
    fn missing_table_is_an_error() {
        let dir = tmp();
        let store = CsvRecordStore::new(dir.path().join("nested")).unwrap();
        assert!(store.dir().exists());
        assert!(store.read_table(9, 9).is_err());
    }
}
