use peerchart_common::{BinStrategy, PeerchartError, Result, MAX_BIN_COUNT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub x0: f64,
    pub x1: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub domain: Domain,
    pub width: f64,
    pub bins: Vec<HistogramBin>,
    pub excluded: usize, // non-finite inputs dropped before binning
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

const NICE_MULTIPLES: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

// lattice indices stay well inside the range where f64 counts every integer
const MAX_LATTICE_INDEX: f64 = (1u64 << 50) as f64;

/// Integer lattice of bin edges. Steps below one are stored as their inverse
/// so that `k / 10` stays exact where `k * 0.1` would drift.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grid {
    step: f64,
    inv: Option<f64>,
}

impl Grid {
    pub(crate) fn new(step: f64) -> Self {
        let inv = if step < 1.0 { Some((1.0 / step).round()) } else { None };
        Self { step, inv }
    }
    pub(crate) fn at(&self, k: f64) -> f64 {
        match self.inv {
            Some(inv) => k / inv,
            None => k * self.step,
        }
    }
    pub(crate) fn floor_index(&self, v: f64) -> f64 {
        match self.inv {
            Some(inv) => (v * inv).floor(),
            None => (v / self.step).floor(),
        }
    }
    pub(crate) fn ceil_index(&self, v: f64) -> f64 {
        match self.inv {
            Some(inv) => (v * inv).ceil(),
            None => (v / self.step).ceil(),
        }
    }
    pub(crate) fn width(&self) -> f64 {
        match self.inv {
            Some(inv) => 1.0 / inv,
            None => self.step,
        }
    }
}

/// Tick spacing for roughly `count` ticks over `[start, stop]`, snapped to
/// 1, 2 or 5 times a power of ten.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Raise `step` to a nice step coarse enough that every lattice index over
/// `[min, max]` is an exact integer and neighbouring edges differ.
pub(crate) fn resolvable_step(step: f64, min: f64, max: f64) -> f64 {
    let floor = min.abs().max(max.abs()) / MAX_LATTICE_INDEX;
    if step >= floor {
        step
    } else {
        nice_step_at_least(floor)
    }
}

/// Smallest step in `{1, 2, 2.5, 5} x 10^k` that is not below `raw`.
fn nice_step_at_least(raw: f64) -> f64 {
    let power = 10f64.powf(raw.log10().floor());
    for m in NICE_MULTIPLES {
        let s = m * power;
        if s >= raw * (1.0 - 1e-9) {
            return s;
        }
    }
    10.0 * power
}

/// Widen a zero-width extent to one unit of its own magnitude.
fn widen_degenerate(v: f64) -> (f64, f64) {
    let unit = if v == 0.0 {
        1.0
    } else {
        10f64.powf(v.abs().log10().floor())
    };
    let grid = Grid::new(unit);
    let k = grid.floor_index(v);
    (grid.at(k), grid.at(k + 1.0))
}

// lattice and first index for `bins` bins covering [min, max]
fn exact_lattice(min: f64, max: f64, bins: usize) -> Option<(Grid, f64)> {
    let n = bins as f64;
    let mut raw = resolvable_step((max - min) / n, min, max);
    for _ in 0..64 {
        let grid = Grid::new(nice_step_at_least(raw));
        let mut lo = grid.floor_index(min);
        if grid.at(lo) > min {
            lo -= 1.0;
        }
        if grid.at(lo + n) >= max {
            return Some((grid, lo));
        }
        raw = grid.width() * (1.0 + 1e-6);
    }
    None
}

fn tick_lattice(min: f64, max: f64, desired: usize) -> (Grid, f64, usize) {
    let grid = Grid::new(resolvable_step(tick_step(min, max, desired), min, max));
    let mut lo = grid.floor_index(min);
    while grid.at(lo) > min {
        lo -= 1.0;
    }
    let mut hi = grid.ceil_index(max).max(lo + 1.0);
    while grid.at(hi) < max {
        hi += 1.0;
    }
    (grid, lo, (hi - lo) as usize)
}

/// Bin `samples` into contiguous equal-width bins over a niced domain,
/// aiming for exactly `desired` bins.
pub fn compute_bins(samples: &[f64], desired: usize) -> Result<Histogram> {
    compute_bins_with(samples, desired, BinStrategy::Exact)
}

/// `desired` is clamped to `1..=MAX_BIN_COUNT`.
pub fn compute_bins_with(
    samples: &[f64],
    desired: usize,
    strategy: BinStrategy,
) -> Result<Histogram> {
    let values: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    let excluded = samples.len() - values.len();
    if values.is_empty() {
        return Err(PeerchartError::EmptyInput);
    }
    let desired = desired.clamp(1, MAX_BIN_COUNT);
    let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        (min, max) = widen_degenerate(min);
    }
    if !(max - min).is_finite() {
        return Err(PeerchartError::Other(format!(
            "sample extent [{min}, {max}] is too wide to bin"
        )));
    }

    let (grid, lo, count) = match strategy {
        BinStrategy::Exact => (desired..desired.saturating_add(3))
            .find_map(|n| exact_lattice(min, max, n).map(|(g, lo)| (g, lo, n)))
            .unwrap_or_else(|| tick_lattice(min, max, desired)),
        BinStrategy::Ticks => tick_lattice(min, max, desired),
    };

    let edges: Vec<f64> = (0..=count).map(|i| grid.at(lo + i as f64)).collect();
    if edges.windows(2).any(|w| w[1] <= w[0]) {
        return Err(PeerchartError::Other(format!(
            "bin edges over [{min}, {max}] collapse at step {}",
            grid.width()
        )));
    }
    let mut counts = vec![0u64; count];
    let thresholds = &edges[1..count];
    for &v in &values {
        // left-closed; the last bin also takes the domain maximum
        let idx = thresholds.partition_point(|&t| t <= v);
        counts[idx.min(count - 1)] += 1;
    }
    let bins: Vec<HistogramBin> = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| HistogramBin { x0: edges[i], x1: edges[i + 1], count: c })
        .collect();
    let domain = Domain::new(edges[0], edges[count]);
    log::debug!(
        "binned {} samples ({} excluded) into {} bins over [{}, {}]",
        values.len(),
        excluded,
        count,
        domain.min,
        domain.max
    );
    Ok(Histogram { domain, width: grid.width(), bins, excluded })
}
