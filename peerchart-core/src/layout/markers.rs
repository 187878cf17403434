use super::format::format_one_decimal;
use super::histogram::HistogramBin;
use super::scale::LinearScale;
use peerchart_common::{BoundaryRule, Orientation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Company,
    Sector,
    Country,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub name: String,
    pub value: Option<f64>,
}

impl MarkerKind {
    /// Sector and country averages share the label lane below the axis; the
    /// company sits alone above its bar.
    pub fn is_benchmark(self) -> bool {
        !matches!(self, MarkerKind::Company)
    }
}

impl Marker {
    pub fn new(kind: MarkerKind, name: impl Into<String>, value: Option<f64>) -> Self {
        Self { kind, name: name.into(), value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPlacement {
    pub kind: MarkerKind,
    pub name: String,
    pub value: f64,
    pub bin_index: usize,
    pub position: f64, // scale(value)
    pub label: String,
    pub anchor: TextAnchor,
    pub label_x: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct MarkerOptions {
    pub boundary: BoundaryRule,
    pub label_nudge: f64,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self { boundary: BoundaryRule::MinimumInFirstBin, label_nudge: 12.0 }
    }
}

/// Index of the bin with `x0 < v <= x1`.
pub fn find_bin(bins: &[HistogramBin], v: f64, rule: BoundaryRule) -> Option<usize> {
    let first = bins.first()?;
    if rule == BoundaryRule::MinimumInFirstBin && v == first.x0 {
        return Some(0);
    }
    bins.iter().position(|b| b.x0 < v && v <= b.x1)
}

/// Place each present marker on its bin and spread labels that share or
/// neighbour a bin. Only markers drawn in the same lane (see
/// [`MarkerKind::is_benchmark`]) are spread against each other.
pub fn locate_markers(
    bins: &[HistogramBin],
    scale: &LinearScale,
    markers: &[Marker],
    options: &MarkerOptions,
) -> Vec<MarkerPlacement> {
    let mut placed: Vec<MarkerPlacement> = markers
        .iter()
        .filter_map(|m| {
            let value = m.value.filter(|v| v.is_finite())?;
            let Some(bin_index) = find_bin(bins, value, options.boundary) else {
                log::debug!("marker {} = {} falls outside the binned domain", m.name, value);
                return None;
            };
            let position = scale.apply(value);
            Some(MarkerPlacement {
                kind: m.kind,
                name: m.name.clone(),
                value,
                bin_index,
                position,
                label: format_one_decimal(value),
                anchor: TextAnchor::Middle,
                label_x: position,
            })
        })
        .collect();
    placed.sort_by(|a, b| a.value.total_cmp(&b.value));

    for benchmark in [false, true] {
        let lane: Vec<usize> =
            (0..placed.len()).filter(|&i| placed[i].kind.is_benchmark() == benchmark).collect();
        let mut start = 0;
        for j in 1..=lane.len() {
            let split = j == lane.len()
                || placed[lane[j]].bin_index > placed[lane[j - 1]].bin_index + 1;
            if split {
                let cluster = &lane[start..j];
                spread_cluster(&mut placed, cluster, scale.orientation, options.label_nudge);
                start = j;
            }
        }
    }
    placed
}

// lowest value goes left of its mark, highest goes right
fn spread_cluster(
    placed: &mut [MarkerPlacement],
    cluster: &[usize],
    orientation: Orientation,
    nudge: f64,
) {
    if cluster.len() < 2 {
        return;
    }
    let dir = match orientation {
        Orientation::Ascending => 1.0,
        Orientation::Descending => -1.0,
    };
    let (low_anchor, high_anchor) = if dir > 0.0 {
        (TextAnchor::End, TextAnchor::Start)
    } else {
        (TextAnchor::Start, TextAnchor::End)
    };
    let last = cluster.len() - 1;
    for (i, &idx) in cluster.iter().enumerate() {
        let p = &mut placed[idx];
        let (anchor, offset) = if i == 0 {
            (low_anchor, -dir * nudge)
        } else if i == last {
            (high_anchor, dir * nudge)
        } else {
            (TextAnchor::Middle, 0.0)
        };
        p.anchor = anchor;
        p.label_x = p.position + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::histogram::{compute_bins, Domain};
    use crate::layout::scale::compute_scale;

    fn bins_0_to_10() -> Vec<HistogramBin> {
        (0..5)
            .map(|i| HistogramBin { x0: i as f64 * 2.0, x1: (i + 1) as f64 * 2.0, count: 1 })
            .collect()
    }

    fn scale() -> LinearScale {
        compute_scale(Domain::new(0.0, 10.0), 100.0, Orientation::Ascending)
    }

    fn opts() -> MarkerOptions {
        MarkerOptions::default()
    }

    #[test]
    fn right_closed_boundaries() {
        let bins = bins_0_to_10();
        assert_eq!(find_bin(&bins, 2.0, BoundaryRule::MinimumInFirstBin), Some(0));
        assert_eq!(find_bin(&bins, 2.1, BoundaryRule::MinimumInFirstBin), Some(1));
        assert_eq!(find_bin(&bins, 10.0, BoundaryRule::MinimumInFirstBin), Some(4));
    }

    #[test]
    fn minimum_edge_depends_on_rule() {
        let bins = bins_0_to_10();
        assert_eq!(find_bin(&bins, 0.0, BoundaryRule::MinimumInFirstBin), Some(0));
        assert_eq!(find_bin(&bins, 0.0, BoundaryRule::RightClosed), None);
    }

    #[test]
    fn outside_and_missing_dropped() {
        let markers = [
            Marker::new(MarkerKind::Company, "Acme", Some(11.0)),
            Marker::new(MarkerKind::Sector, "Sector", None),
            Marker::new(MarkerKind::Country, "France", Some(f64::NAN)),
            Marker::new(MarkerKind::Country, "Spain", Some(-0.5)),
        ];
        let placed = locate_markers(&bins_0_to_10(), &scale(), &markers, &opts());
        assert!(placed.is_empty());
    }

    #[test]
    fn ordered_by_value_and_labelled() {
        let markers = [
            Marker::new(MarkerKind::Company, "Acme", Some(9.3333)),
            Marker::new(MarkerKind::Sector, "Sector", Some(1.0)),
        ];
        let placed = locate_markers(&bins_0_to_10(), &scale(), &markers, &opts());
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].kind, MarkerKind::Sector);
        assert_eq!(placed[1].label, "9.3");
        assert_eq!(placed[1].bin_index, 4);
        // far apart: no nudging
        assert!(placed.iter().all(|p| p.anchor == TextAnchor::Middle));
        assert!(placed.iter().all(|p| p.label_x == p.position));
    }

    #[test]
    fn identical_values_get_distinct_label_positions() {
        let h = compute_bins(&[1.0, 2.0, 3.0, 4.0, 5.0], 4).unwrap();
        let s = compute_scale(h.domain, 200.0, Orientation::Ascending);
        let markers = [
            Marker::new(MarkerKind::Country, "Japan", Some(3.2)),
            Marker::new(MarkerKind::Sector, "Sector", Some(3.2)),
        ];
        let placed = locate_markers(&h.bins, &s, &markers, &opts());
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].bin_index, placed[1].bin_index);
        assert_eq!(placed[0].kind, MarkerKind::Country); // tie keeps input order
        assert_eq!(placed[0].anchor, TextAnchor::End);
        assert_eq!(placed[1].anchor, TextAnchor::Start);
        assert!(placed[0].label_x < placed[1].label_x);
        assert!((placed[1].label_x - placed[0].label_x - 24.0).abs() < 1e-9);
    }

    #[test]
    fn adjacent_bins_cluster_with_middle_untouched() {
        let markers = [
            Marker::new(MarkerKind::Sector, "Sector", Some(3.0)),
            Marker::new(MarkerKind::Country, "Japan", Some(4.5)),
            Marker::new(MarkerKind::Country, "France", Some(6.5)),
        ];
        let placed = locate_markers(&bins_0_to_10(), &scale(), &markers, &opts());
        let anchors: Vec<TextAnchor> = placed.iter().map(|p| p.anchor).collect();
        assert_eq!(anchors, [TextAnchor::End, TextAnchor::Middle, TextAnchor::Start]);
        assert_eq!(placed[1].label_x, placed[1].position);
    }

    #[test]
    fn descending_scale_flips_nudges() {
        let s = compute_scale(Domain::new(0.0, 10.0), 100.0, Orientation::Descending);
        let markers = [
            Marker::new(MarkerKind::Sector, "Sector", Some(5.0)),
            Marker::new(MarkerKind::Country, "Japan", Some(5.5)),
        ];
        let placed = locate_markers(&bins_0_to_10(), &s, &markers, &opts());
        assert_eq!(placed[0].anchor, TextAnchor::Start);
        assert!(placed[0].label_x > placed[0].position);
        assert_eq!(placed[1].anchor, TextAnchor::End);
        assert!(placed[1].label_x < placed[1].position);
    }

    #[test]
    fn company_not_spread_against_benchmarks() {
        let markers = [
            Marker::new(MarkerKind::Company, "Acme", Some(4.5)),
            Marker::new(MarkerKind::Sector, "Sector", Some(4.6)),
            Marker::new(MarkerKind::Country, "Japan", Some(5.5)),
        ];
        let placed = locate_markers(&bins_0_to_10(), &scale(), &markers, &opts());
        let acme = placed.iter().find(|p| p.kind == MarkerKind::Company).unwrap();
        assert_eq!(acme.anchor, TextAnchor::Middle);
        assert_eq!(acme.label_x, acme.position);
        let benchmarks: Vec<TextAnchor> =
            placed.iter().filter(|p| p.kind.is_benchmark()).map(|p| p.anchor).collect();
        assert_eq!(benchmarks, [TextAnchor::End, TextAnchor::Start]);
        // output stays in value order across lanes
        assert!(placed.windows(2).all(|w| w[0].value <= w[1].value));
    }
}
