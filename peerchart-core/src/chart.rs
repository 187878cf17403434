use crate::dataset::{select_or_default, CompanyRecord, Dataset};
use crate::layout::{
    axis_ticks, compute_bins_with, compute_scale, format_one_decimal, locate_markers, AxisTick,
    Domain, Histogram, LinearScale, Marker, MarkerKind, MarkerOptions, MarkerPlacement,
    TextAnchor,
};
use peerchart_common::{CategoryConfig, Config, Margins, Orientation, PeerchartError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyHeader {
    pub name: String,
    pub is_default: bool,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub count: u64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    AboveBar,
    BelowAxis,
}

/// Vertical tick from the axis down to `y2`, then a short horizontal tail
/// towards the label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderLine {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
    pub tail_x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub placement: MarkerPlacement,
    pub lane: Lane,
    pub label_y: f64,
    pub leader: Option<LeaderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub key: String,
    pub title: String,
    pub axis_label: String,
    pub annotation: Option<String>,
    pub accessible_title: String,
    pub description: Option<String>,
    pub outer_width: f64,
    pub outer_height: f64,
    pub margins: Margins,
    pub plot: PlotArea,
    pub histogram: Histogram,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub bars: Vec<Bar>,
    pub ticks: Vec<AxisTick>,
    pub annotations: Vec<Annotation>,
}

impl ChartLayout {
    pub fn company_annotation(&self) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.placement.kind == MarkerKind::Company)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartSlot {
    Ready(Box<ChartLayout>),
    /// nothing numeric to bin; draw a placeholder
    Empty { key: String, title: String, column: String },
}

impl ChartSlot {
    pub fn key(&self) -> &str {
        match self {
            ChartSlot::Ready(c) => &c.key,
            ChartSlot::Empty { key, .. } => key,
        }
    }

    pub fn ready(&self) -> Option<&ChartLayout> {
        match self {
            ChartSlot::Ready(c) => Some(&**c),
            ChartSlot::Empty { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub company: CompanyHeader,
    pub charts: Vec<ChartSlot>,
}

impl LayoutResult {
    pub fn chart(&self, key: &str) -> Option<&ChartSlot> {
        self.charts.iter().find(|c| c.key() == key)
    }
}

fn company_header(record: &CompanyRecord, is_default: bool, config: &Config) -> CompanyHeader {
    let lines = if is_default {
        vec![config.search.global_subtitle.clone()]
    } else {
        let mut lines = vec![format!("Sector: {}", record.industry)];
        if let Some(cap) = record.cap() {
            lines.push(format!("Market cap: ${}bn", format_one_decimal(cap)));
        }
        lines.push(format!("Market: {}", record.country));
        lines
    };
    CompanyHeader { name: record.name.clone(), is_default, lines }
}

fn category_markers(
    record: &CompanyRecord,
    is_default: bool,
    category: &CategoryConfig,
) -> Vec<Marker> {
    let mut markers = vec![Marker::new(
        MarkerKind::Company,
        record.name.clone(),
        record.number(&category.column),
    )];
    if !is_default {
        markers.push(Marker::new(
            MarkerKind::Sector,
            "Sector",
            record.number(&category.industry_column()),
        ));
        markers.push(Marker::new(
            MarkerKind::Country,
            record.country.clone(),
            record.number(&category.country_column()),
        ));
    }
    markers
}

fn build_bars(
    histogram: &Histogram,
    x: &LinearScale,
    y: &LinearScale,
    plot: PlotArea,
    gap: f64,
    company_bin: Option<usize>,
) -> Vec<Bar> {
    histogram
        .bins
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let (x0, x1) = (x.apply(b.x0), x.apply(b.x1));
            let top = y.apply(b.count as f64);
            Bar {
                x: x0.min(x1),
                y: top,
                width: ((x1 - x0).abs() - gap).max(0.0),
                height: plot.height - top,
                count: b.count,
                highlighted: company_bin == Some(i),
            }
        })
        .collect()
}

fn annotate(
    placements: Vec<MarkerPlacement>,
    bars: &[Bar],
    plot: PlotArea,
    config: &Config,
) -> Vec<Annotation> {
    let style = &config.layout.annotation;
    placements
        .into_iter()
        .map(|p| {
            if p.kind == MarkerKind::Company {
                let top = bars.get(p.bin_index).map(|b| b.y).unwrap_or(plot.height);
                return Annotation {
                    label_y: top - style.label_offset,
                    lane: Lane::AboveBar,
                    leader: None,
                    placement: p,
                };
            }
            let tail = match p.anchor {
                TextAnchor::End => -style.leader_tail,
                TextAnchor::Start => style.leader_tail,
                TextAnchor::Middle => 0.0,
            };
            let leader = LeaderLine {
                x: p.position,
                y1: plot.height,
                y2: plot.height + style.leader_length,
                tail_x: p.position + tail,
            };
            Annotation {
                label_y: plot.height + style.below_axis_label,
                lane: Lane::BelowAxis,
                leader: Some(leader),
                placement: p,
            }
        })
        .collect()
}

fn build_chart(
    dataset: &Dataset,
    record: &CompanyRecord,
    is_default: bool,
    category: &CategoryConfig,
    config: &Config,
    container_width: f64,
) -> Result<ChartLayout> {
    let layout = &config.layout;
    let margins = category.margins_for(layout, container_width);
    let plot = PlotArea {
        width: (container_width - margins.left - margins.right).max(0.0),
        height: (layout.chart_height - margins.top - margins.bottom).max(0.0),
    };

    let exclude = Some(config.search.default_company.as_str());
    let sample = dataset.numeric_column(&category.column, exclude);
    let mut histogram =
        compute_bins_with(&sample.values, category.bin_count, layout.bin_strategy)?;
    // cells that never parsed count as excluded alongside non-finite values
    histogram.excluded += sample.excluded;
    let x_scale = compute_scale(histogram.domain, plot.width, category.orientation).rounded();
    let y_scale = compute_scale(
        Domain::new(0.0, histogram.max_count() as f64),
        plot.height,
        Orientation::Descending,
    );

    let options = MarkerOptions {
        boundary: layout.boundary_rule,
        label_nudge: layout.annotation.label_nudge,
    };
    let placements = locate_markers(
        &histogram.bins,
        &x_scale,
        &category_markers(record, is_default, category),
        &options,
    );
    let company = placements.iter().find(|p| p.kind == MarkerKind::Company);
    let description = company.map(|p| {
        format!("The average for {} is {} {}.", record.name, p.label, category.axis_label)
    });
    let company_bin = company.map(|p| p.bin_index);
    let bars = build_bars(&histogram, &x_scale, &y_scale, plot, layout.bar_gap, company_bin);
    let ticks = axis_ticks(&x_scale, layout.axis_ticks, layout.tick_label_every);
    let annotations = annotate(placements, &bars, plot, config);

    Ok(ChartLayout {
        key: category.key.clone(),
        title: category.title.clone(),
        axis_label: category.axis_label.clone(),
        annotation: category.annotation.clone(),
        accessible_title: format!("Distribution of {}", category.title),
        description,
        outer_width: container_width,
        outer_height: layout.chart_height,
        margins,
        plot,
        histogram,
        x_scale,
        y_scale,
        bars,
        ticks,
        annotations,
    })
}

/// Everything a renderer needs to draw the header and one chart per
/// configured category for `company_query`. A blank query shows the default
/// pseudo-record.
pub fn renderable_layout(
    dataset: &Dataset,
    company_query: &str,
    config: &Config,
    container_width: f64,
) -> Result<LayoutResult> {
    let record = select_or_default(dataset, company_query, &config.search.default_company)?;
    let is_default = record.name == config.search.default_company;
    let mut charts = Vec::with_capacity(config.categories.len());
    for category in &config.categories {
        match build_chart(dataset, record, is_default, category, config, container_width) {
            Ok(chart) => charts.push(ChartSlot::Ready(Box::new(chart))),
            Err(PeerchartError::EmptyInput) => {
                log::warn!(
                    "category {}: column {} has no numeric values",
                    category.key,
                    category.column
                );
                charts.push(ChartSlot::Empty {
                    key: category.key.clone(),
                    title: category.title.clone(),
                    column: category.column.clone(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    Ok(LayoutResult { company: company_header(record, is_default, config), charts })
}

/// Compute the layout and hand it to `render`.
pub fn render_with<R, F>(
    dataset: &Dataset,
    company_query: &str,
    config: &Config,
    container_width: f64,
    render: F,
) -> Result<R>
where
    F: FnOnce(&LayoutResult) -> R,
{
    let layout = renderable_layout(dataset, company_query, config, container_width)?;
    Ok(render(&layout))
}
