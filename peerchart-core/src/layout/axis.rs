use super::format::format_tick;
use super::histogram::{resolvable_step, tick_step, Grid};
use super::scale::LinearScale;
use serde::{Deserialize, Serialize};

const MAX_TICKS: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub position: f64,
    pub label: Option<String>, // None for ticks drawn without text
}

/// Roughly `count` ticks across the scale's domain; only every
/// `label_every`-th tick, starting with the first, carries a label.
pub fn axis_ticks(scale: &LinearScale, count: usize, label_every: usize) -> Vec<AxisTick> {
    let domain = scale.domain;
    if domain.span() <= 0.0 {
        return Vec::new();
    }
    let step = resolvable_step(tick_step(domain.min, domain.max, count), domain.min, domain.max);
    let grid = Grid::new(step);
    let mut first = grid.ceil_index(domain.min);
    if grid.at(first) < domain.min {
        first += 1.0;
    }
    let mut last = grid.floor_index(domain.max);
    if grid.at(last) > domain.max {
        last -= 1.0;
    }
    if last < first {
        return Vec::new();
    }
    let n = ((last - first) as usize).min(MAX_TICKS);
    let every = label_every.max(1);
    (0..=n)
        .map(|i| {
            let value = grid.at(first + i as f64);
            let label = (i % every == 0).then(|| format_tick(value, step));
            AxisTick { value, position: scale.apply(value), label }
        })
        .collect()
}
