//! Window averaging and the per-run latency matrix.
//!
//! # Window policy
//!
//! A window holds `pings_per_window` probes.  A successful probe contributes
//! its average round-trip time.  A failed probe contributes an explicit 0.0
//! only when it is the first probe of the window; later failures contribute
//! nothing.  The window value is the sum divided by `pings_per_window`, the
//! configured count, not the number of values recorded.
//!
//! Dividing by the configured count under-reports latency whenever probes are
//! dropped (three failures and one 10 ms reply average to 2.5 ms).  Stored
//! datasets depend on this, so it is kept as is.

use nc_core::NodeIndex;

/// Collects the probe values of one window.
#[derive(Clone, Debug)]
pub struct WindowAccumulator {
    pings_per_window: u32,
    values:           Vec<f64>,
}

impl WindowAccumulator {
    pub fn new(pings_per_window: u32) -> Self {
        Self { pings_per_window, values: Vec::with_capacity(pings_per_window as usize) }
    }

    /// Record the outcome of probe `k` (0-based within the window).
    /// `rtt_ms` is `None` when the probe failed.
    pub fn record(&mut self, k: u32, rtt_ms: Option<f64>) {
        match rtt_ms {
            Some(rtt) if rtt > 0.0 => self.values.push(rtt),
            _ if k == 0 => self.values.push(0.0),
            _ => {}
        }
    }

    /// Values recorded so far, in probe order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The window value; resets the accumulator for the next window.
    pub fn finish(&mut self) -> f64 {
        let sum: f64 = self.values.iter().sum();
        self.values.clear();
        sum / f64::from(self.pings_per_window.max(1))
    }
}

// ── LatencyMatrix ─────────────────────────────────────────────────────────────

/// Window × node matrix of average latencies (milliseconds) from the central
/// node.  The central node's own column is always 0.
#[derive(Clone, Debug, PartialEq)]
pub struct LatencyMatrix {
    windows: usize,
    nodes:   usize,
    cells:   Vec<f64>,
}

impl LatencyMatrix {
    pub fn zeros(windows: usize, nodes: usize) -> Self {
        Self { windows, nodes, cells: vec![0.0; windows * nodes] }
    }

    /// Assemble from per-node window series.  Nodes missing from `series`
    /// (the central node) keep 0; series longer than `windows` are cut.
    pub fn from_series(
        windows: usize,
        nodes:   usize,
        series:  impl IntoIterator<Item = (NodeIndex, Vec<f64>)>,
    ) -> Self {
        let mut m = Self::zeros(windows, nodes);
        for (node, values) in series {
            if node.index() >= nodes {
                continue;
            }
            for (w, v) in values.into_iter().take(windows).enumerate() {
                m.cells[w * nodes + node.index()] = v;
            }
        }
        m
    }

    #[inline]
    pub fn windows(&self) -> usize {
        self.windows
    }

    #[inline]
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    #[inline]
    pub fn get(&self, window: usize, node: usize) -> f64 {
        self.cells[window * self.nodes + node]
    }

    /// One window's values across all nodes.
    pub fn window(&self, window: usize) -> &[f64] {
        &self.cells[window * self.nodes..(window + 1) * self.nodes]
    }

    /// One node's values across all windows.
    pub fn series(&self, node: usize) -> Vec<f64> {
        (0..self.windows).map(|w| self.get(w, node)).collect()
    }

    /// Row-major (window-major) cells.
    pub fn as_flat(&self) -> &[f64] {
        &self.cells
    }
}
