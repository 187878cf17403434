pub mod chart;
pub mod dataset;
pub mod export;
pub mod layout;

pub use chart::{
    render_with, renderable_layout, Annotation, Bar, ChartLayout, ChartSlot, CompanyHeader, Lane,
    LayoutResult, LeaderLine, PlotArea,
};
pub use dataset::{
    coerce_number, select_company, select_or_default, suggest_companies, CompanyRecord, Dataset,
    Sample,
};
pub use export::{export_layout_json, layout_to_json};
pub use layout::{
    axis_ticks, compute_bins, compute_bins_with, compute_scale, find_bin, format_one_decimal,
    locate_markers, round1dp, tick_step, AxisTick, Domain, Histogram, HistogramBin, LinearScale,
    Marker, MarkerKind, MarkerOptions, MarkerPlacement, TextAnchor,
};
pub use peerchart_common::{
    BinStrategy, BoundaryRule, CategoryConfig, Config, NotFound, Orientation, PeerchartError,
    Result,
};
