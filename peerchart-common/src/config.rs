use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Ascending,
    Descending,
}

/// How `compute_bins` turns a bin-count hint into bin edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BinStrategy {
    /// exactly the requested number of bins, nice width
    #[default]
    Exact,
    /// width from the tick step for the hint, count follows the data
    Ticks,
}

/// Where a marker sitting exactly on the domain minimum goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRule {
    /// bins are right-closed, but the minimum still lands in the first bin
    #[default]
    MinimumInFirstBin,
    /// strictly `x0 < v <= x1`; the minimum is not placed
    RightClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 20.0,
            right: 20.0,
            top: 25.0,
            bottom: 20.0,
        }
    }
}

impl Margins {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationStyle {
    #[serde(default = "default_label_nudge")]
    pub label_nudge: f64,
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
    #[serde(default = "default_leader_length")]
    pub leader_length: f64,
    #[serde(default = "default_leader_tail")]
    pub leader_tail: f64,
    #[serde(default = "default_below_axis_label")]
    pub below_axis_label: f64, // baseline of sector/country labels, below the x axis
}

fn default_label_nudge() -> f64 {
    12.0
}
fn default_label_offset() -> f64 {
    8.0
}
fn default_leader_length() -> f64 {
    35.0
}
fn default_leader_tail() -> f64 {
    10.0
}
fn default_below_axis_label() -> f64 {
    38.0
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            label_nudge: default_label_nudge(),
            label_offset: default_label_offset(),
            leader_length: default_leader_length(),
            leader_tail: default_leader_tail(),
            below_axis_label: default_below_axis_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_chart_height")]
    pub chart_height: f64,
    #[serde(default = "default_narrow_width")]
    pub narrow_width: f64,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_bar_gap")]
    pub bar_gap: f64,
    #[serde(default = "default_axis_ticks")]
    pub axis_ticks: usize,
    #[serde(default = "default_tick_label_every")]
    pub tick_label_every: usize,
    #[serde(default)]
    pub bin_strategy: BinStrategy,
    #[serde(default)]
    pub boundary_rule: BoundaryRule,
    #[serde(default)]
    pub annotation: AnnotationStyle,
}

fn default_chart_height() -> f64 {
    200.0
}
fn default_narrow_width() -> f64 {
    250.0
}
fn default_bar_gap() -> f64 {
    1.0
}
fn default_axis_ticks() -> usize {
    10
}
fn default_tick_label_every() -> usize {
    2
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chart_height: default_chart_height(),
            narrow_width: default_narrow_width(),
            margins: Margins::default(),
            bar_gap: default_bar_gap(),
            axis_ticks: default_axis_ticks(),
            tick_label_every: default_tick_label_every(),
            bin_strategy: BinStrategy::default(),
            boundary_rule: BoundaryRule::default(),
            annotation: AnnotationStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_company")]
    pub default_company: String,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_global_subtitle")]
    pub global_subtitle: String,
}

fn default_company() -> String {
    "Global average".into()
}
fn default_min_length() -> usize {
    2
}
fn default_global_subtitle() -> String {
    "Includes widely-held companies in 10 sectors and 30 markets".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_company: default_company(),
            min_length: default_min_length(),
            global_subtitle: default_global_subtitle(),
        }
    }
}

/// One chart: which column it bins and how it is laid out.
///
/// `header` doubles as the suffix of the benchmark columns, so a header of
/// `Tenure` reads sector and country averages from `industryTenure` and
/// `countryTenure`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub key: String,
    pub title: String,
    pub header: String,
    pub column: String,
    pub axis_label: String,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Option<Margins>, // falls back to layout.margins when None
    #[serde(default)]
    pub narrow_margins: Option<Margins>,
}

/// Largest bin-count hint a category may ask for.
pub const MAX_BIN_COUNT: usize = 1_000;

fn default_bin_count() -> usize {
    10
}

impl CategoryConfig {
    pub fn industry_column(&self) -> String {
        format!("industry{}", self.header)
    }

    pub fn country_column(&self) -> String {
        format!("country{}", self.header)
    }

    /// Margins for a container of the given width.
    pub fn margins_for(&self, layout: &LayoutConfig, container_width: f64) -> Margins {
        if container_width < layout.narrow_width {
            if let Some(m) = self.narrow_margins {
                return m;
            }
        }
        self.margins.unwrap_or(layout.margins)
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig {
            key: "tenure".into(),
            title: "Tenure".into(),
            header: "Tenure".into(),
            column: "avgTenure".into(),
            axis_label: "years".into(),
            annotation: None,
            bin_count: 9,
            orientation: Orientation::Ascending,
            margins: None,
            narrow_margins: Some(Margins::new(57.0, 13.0, 25.0, 20.0)),
        },
        CategoryConfig {
            key: "age".into(),
            title: "Age".into(),
            header: "Age".into(),
            column: "avgAge".into(),
            axis_label: "years".into(),
            annotation: None,
            bin_count: 10,
            orientation: Orientation::Ascending,
            margins: None,
            narrow_margins: Some(Margins::new(58.0, 13.0, 25.0, 20.0)),
        },
        CategoryConfig {
            key: "gender".into(),
            title: "Gender composition".into(),
            header: "Women".into(),
            column: "percentWomen".into(),
            axis_label: "per cent female".into(),
            annotation: None,
            bin_count: 9,
            orientation: Orientation::Ascending,
            margins: None,
            narrow_margins: Some(Margins::new(70.0, 0.0, 25.0, 20.0)),
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            search: SearchConfig::default(),
            categories: default_categories(),
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("peerchart")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("PEERCHART_CONFIG") {
            PathBuf::from(env_path) // $PEERCHART_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let cfg: Self =
            toml::from_str(content).map_err(|e| crate::PeerchartError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.layout.chart_height <= 0.0 {
            return Err(crate::PeerchartError::Config(format!(
                "chart_height must be positive, got {}",
                self.layout.chart_height
            )));
        }
        if self.layout.tick_label_every == 0 {
            return Err(crate::PeerchartError::Config(
                "tick_label_every must be at least 1".into(),
            ));
        }
        for cat in &self.categories {
            if cat.bin_count == 0 || cat.bin_count > MAX_BIN_COUNT {
                return Err(crate::PeerchartError::Config(format!(
                    "category '{}': bin_count must be between 1 and {}, got {}",
                    cat.key, MAX_BIN_COUNT, cat.bin_count
                )));
            }
        }
        Ok(())
    }

    pub fn category(&self, key: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::PeerchartError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
