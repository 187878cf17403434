use peerchart_core::{
    compute_bins, compute_bins_with, compute_scale, format_one_decimal, locate_markers,
    BinStrategy, Domain, Marker, MarkerKind, MarkerOptions, Orientation,
};
use proptest::prelude::*;

// edges are exact on their lattice, so widths only carry the rounding of the edge values
fn same_width(bin_x0: f64, bin_x1: f64, width: f64) -> bool {
    let magnitude = bin_x0.abs().max(bin_x1.abs()).max(1.0);
    ((bin_x1 - bin_x0) - width).abs() <= 1e-12 * magnitude
}

fn strategy() -> impl Strategy<Value = BinStrategy> {
    prop_oneof![Just(BinStrategy::Exact), Just(BinStrategy::Ticks)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn counts_sum_to_filtered_len(
        samples in prop::collection::vec(-1.0e4f64..1.0e4, 1..200),
        desired in 1usize..50,
        strat in strategy(),
    ) {
        let h = compute_bins_with(&samples, desired, strat).unwrap();
        prop_assert_eq!(h.total() as usize, samples.len());
        prop_assert_eq!(h.excluded, 0);
    }

    #[test]
    fn bins_contiguous_and_equal_width(
        samples in prop::collection::vec(-500.0f64..500.0, 1..100),
        desired in 1usize..40,
        strat in strategy(),
    ) {
        let h = compute_bins_with(&samples, desired, strat).unwrap();
        prop_assert!(!h.bins.is_empty());
        for w in h.bins.windows(2) {
            prop_assert_eq!(w[0].x1, w[1].x0);
        }
        for b in &h.bins {
            prop_assert!(b.x1 > b.x0);
            prop_assert!(same_width(b.x0, b.x1, h.width), "width {} vs {}", b.x1 - b.x0, h.width);
        }
        prop_assert_eq!(h.domain.min, h.bins[0].x0);
        prop_assert_eq!(h.domain.max, h.bins[h.bins.len() - 1].x1);
    }

    #[test]
    fn domain_covers_every_sample(
        samples in prop::collection::vec(-1.0e6f64..1.0e6, 1..100),
        desired in 1usize..40,
    ) {
        let h = compute_bins(&samples, desired).unwrap();
        for v in &samples {
            let d = h.domain;
            prop_assert!(d.contains(*v), "{} outside [{}, {}]", v, d.min, d.max);
        }
    }

    #[test]
    fn exact_strategy_honours_hint_when_not_straddling(
        samples in prop::collection::vec(0.0f64..1000.0, 1..100),
        desired in 1usize..40,
    ) {
        let h = compute_bins(&samples, desired).unwrap();
        prop_assert_eq!(h.bins.len(), desired);
    }

    #[test]
    fn non_finite_entries_are_excluded(
        samples in prop::collection::vec(-100.0f64..100.0, 1..50),
        nans in 0usize..10,
    ) {
        let mut all = samples.clone();
        all.extend(std::iter::repeat(f64::NAN).take(nans));
        let h = compute_bins(&all, 8).unwrap();
        prop_assert_eq!(h.excluded, nans);
        prop_assert_eq!(h.total() as usize, samples.len());
    }

    #[test]
    fn scale_monotonic_with_exact_endpoints(
        a in -1.0e3f64..1.0e3,
        span in 0.001f64..1.0e3,
        len in 1.0f64..2000.0,
        x in 0.0f64..1.0,
        y in 0.0f64..1.0,
        descending in any::<bool>(),
    ) {
        let orientation = if descending { Orientation::Descending } else { Orientation::Ascending };
        let s = compute_scale(Domain::new(a, a + span), len, orientation);
        let (lo, hi) = if descending { (len, 0.0) } else { (0.0, len) };
        prop_assert_eq!(s.apply(a), lo);
        prop_assert_eq!(s.apply(a + span), hi);
        let (v1, v2) = (a + span * x.min(y), a + span * x.max(y));
        if descending {
            prop_assert!(s.apply(v1) >= s.apply(v2));
        } else {
            prop_assert!(s.apply(v1) <= s.apply(v2));
        }
    }

    #[test]
    fn markers_never_outside_domain(
        samples in prop::collection::vec(0.0f64..100.0, 1..50),
        values in prop::collection::vec(-50.0f64..150.0, 0..6),
    ) {
        let h = compute_bins(&samples, 10).unwrap();
        let s = compute_scale(h.domain, 300.0, Orientation::Ascending);
        let markers: Vec<Marker> = values
            .iter()
            .map(|v| Marker::new(MarkerKind::Country, "X", Some(*v)))
            .collect();
        let placed = locate_markers(&h.bins, &s, &markers, &MarkerOptions::default());
        for p in &placed {
            prop_assert!(h.domain.contains(p.value));
            let bin = &h.bins[p.bin_index];
            let inside = bin.x0 < p.value && p.value <= bin.x1;
            prop_assert!(inside || (p.bin_index == 0 && p.value == bin.x0));
        }
        prop_assert!(placed.windows(2).all(|w| w[0].value <= w[1].value));
    }

    #[test]
    fn labels_have_one_decimal(v in -1.0e5f64..1.0e5) {
        let label = format_one_decimal(v);
        let (_, frac) = label.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), 1);
    }
}
