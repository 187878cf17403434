pub mod axis;
pub mod format;
pub mod histogram;
pub mod markers;
pub mod scale;

pub use axis::{axis_ticks, AxisTick};
pub use format::{format_one_decimal, format_tick, round1dp};
pub use histogram::{compute_bins, compute_bins_with, tick_step, Domain, Histogram, HistogramBin};
pub use markers::{
    find_bin, locate_markers, Marker, MarkerKind, MarkerOptions, MarkerPlacement, TextAnchor,
};
pub use scale::{compute_scale, LinearScale};
