//! Chart Plotter Module
//! Turns labelled timing tables into a headless figure description:
//! panels, axis ranges, ticks and the series drawn into each panel.

use crate::config::PlotConfig;
use crate::data::DatasetCollection;
use plotters::style::RGBColor;

/// Series colour cycle ("tab10"), restarted for every panel.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Grey
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

/// Both panels start their x-axis at one thread.
pub const X_MIN: f64 = 1.0;
/// Headroom past the largest thread count.
pub const X_HEADROOM: f64 = 1.1;
/// Fraction of the data span added above and below on the y-axis.
const Y_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

/// Corner the legend box is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// One labelled line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
}

/// One subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub scale: AxisScale,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Pinned x tick positions; `None` lets the axis choose.
    pub x_ticks: Option<Vec<f64>>,
    pub legend: LegendCorner,
    pub series: Vec<Series>,
}

/// Complete two-panel chart, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    /// Left: elapsed wall time, linear axes.
    pub elapsed: Panel,
    /// Right: CPU time breakdown, log-log axes.
    pub cpu: Panel,
}

/// Builds figures from datasets.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn build_figure(datasets: &DatasetCollection, config: &PlotConfig) -> Figure {
        let columns = &config.columns;
        let x_range = (X_MIN, Self::x_upper_bound(datasets, columns.threads));
        log::debug!("shared x range: {:?}", x_range);

        let elapsed_series: Vec<Series> = datasets
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let x = d.table.column(columns.threads).unwrap_or_default();
                let y = d.table.column(columns.elapsed).unwrap_or_default();
                Series {
                    label: d.label.clone(),
                    points: x.into_iter().zip(y).collect(),
                    color: Self::series_color(i),
                }
            })
            .collect();

        let mut cpu_lines: Vec<(String, Vec<(f64, f64)>)> = datasets
            .iter()
            .map(|d| {
                let x = d.table.column(columns.threads).unwrap_or_default();
                let (a, b) = columns.cpu_total;
                let y = d.table.column_sum(a, b).unwrap_or_default();
                (format!("total, {}", d.label), x.into_iter().zip(y).collect())
            })
            .collect();
        for breakdown in &config.breakdowns {
            for d in datasets.iter() {
                let x = d.table.column(columns.threads).unwrap_or_default();
                let y = d.table.column(breakdown.column).unwrap_or_default();
                cpu_lines.push((
                    format!("{}, {}", breakdown.label, d.label),
                    x.into_iter().zip(y).collect(),
                ));
            }
        }

        let cpu_series: Vec<Series> = cpu_lines
            .into_iter()
            .enumerate()
            .map(|(i, (label, points))| {
                let total = points.len();
                let points: Vec<_> = points
                    .into_iter()
                    .filter(|&p| Self::log_plottable(p))
                    .collect();
                if points.len() < total {
                    log::warn!(
                        "'{}': skipped {} non-positive point(s) on the log-log panel",
                        label,
                        total - points.len()
                    );
                }
                Series {
                    label,
                    points,
                    color: Self::series_color(i),
                }
            })
            .collect();

        let first = &datasets.first().table;
        let cpu_ticks: Vec<f64> = first
            .column(columns.threads)
            .unwrap_or_default()
            .into_iter()
            .filter(|&x| x > 0.0 && x.is_finite())
            .collect();

        let elapsed = Self::panel(
            "Elapsed time, seconds",
            AxisScale::Linear,
            x_range,
            None,
            elapsed_series,
        );
        let cpu = Self::panel(
            "CPU time, seconds",
            AxisScale::Log,
            x_range,
            Some(cpu_ticks),
            cpu_series,
        );
        log::debug!(
            "elapsed panel: {} series, y {:?}; cpu panel: {} series, y {:?}",
            elapsed.series.len(),
            elapsed.y_range,
            cpu.series.len(),
            cpu.y_range
        );

        Figure {
            title: config.title.clone(),
            elapsed,
            cpu,
        }
    }

    fn panel(
        y_desc: &'static str,
        scale: AxisScale,
        x_range: (f64, f64),
        x_ticks: Option<Vec<f64>>,
        series: Vec<Series>,
    ) -> Panel {
        let ys = series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
        let y_range = match scale {
            AxisScale::Linear => Self::linear_bounds(ys),
            AxisScale::Log => Self::log_bounds(ys),
        };
        let legend = Self::best_legend_corner(&series, scale, x_range, y_range);
        Panel {
            x_desc: "Thread count",
            y_desc,
            scale,
            x_range,
            y_range,
            x_ticks,
            legend,
            series,
        }
    }

    /// Upper x bound shared by both panels: 1.1 times the largest thread
    /// count across every table.
    pub fn x_upper_bound(datasets: &DatasetCollection, threads: usize) -> f64 {
        let upper = datasets.column_max(threads).unwrap_or(X_MIN) * X_HEADROOM;
        if upper > X_MIN {
            upper
        } else {
            X_MIN * X_HEADROOM
        }
    }

    /// Get color for the n-th series of a panel.
    pub fn series_color(index: usize) -> RGBColor {
        PALETTE[index % PALETTE.len()]
    }

    /// Tick text for thread counts: the integer part.
    pub fn tick_label(value: f64) -> String {
        format!("{}", value.trunc() as i64)
    }

    fn log_plottable((x, y): (f64, f64)) -> bool {
        x > 0.0 && y > 0.0 && x.is_finite() && y.is_finite()
    }

    /// Data range plus a small margin; widened when all values coincide.
    pub fn linear_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let Some((lo, hi)) = Self::min_max(values.filter(|v| v.is_finite())) else {
            return (0.0, 1.0);
        };
        let span = hi - lo;
        if span == 0.0 {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.5 };
            return (lo - pad, hi + pad);
        }
        (lo - span * Y_MARGIN, hi + span * Y_MARGIN)
    }

    /// Like `linear_bounds` but with the margin taken in decades.
    pub fn log_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let positive = values.filter(|v| *v > 0.0 && v.is_finite());
        let Some((lo, hi)) = Self::min_max(positive) else {
            return (1.0, 10.0);
        };
        let (lo, hi) = (lo.log10(), hi.log10());
        let span = hi - lo;
        let pad = if span == 0.0 { 0.5 } else { span * Y_MARGIN };
        (10f64.powf(lo - pad), 10f64.powf(hi + pad))
    }

    fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Pick the corner whose quadrant holds the fewest data points.
    ///
    /// Ties resolve in the order upper right, upper left, lower left,
    /// lower right.
    pub fn best_legend_corner(
        series: &[Series],
        scale: AxisScale,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> LegendCorner {
        let frac = |v: f64, (lo, hi): (f64, f64)| match scale {
            AxisScale::Linear => (v - lo) / (hi - lo),
            AxisScale::Log => (v.log10() - lo.log10()) / (hi.log10() - lo.log10()),
        };

        // upper right, upper left, lower left, lower right
        let mut counts = [0usize; 4];
        for &(x, y) in series.iter().flat_map(|s| s.points.iter()) {
            let (fx, fy) = (frac(x, x_range), frac(y, y_range));
            if !(fx.is_finite() && fy.is_finite()) {
                continue;
            }
            let slot = match (fx >= 0.5, fy >= 0.5) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            counts[slot] += 1;
        }

        let corners = [
            LegendCorner::UpperRight,
            LegendCorner::UpperLeft,
            LegendCorner::LowerLeft,
            LegendCorner::LowerRight,
        ];
        let best = (0..4).min_by_key(|&i| counts[i]).unwrap_or(0);
        corners[best]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Breakdown;
    use crate::data::table::tests::{sample, table};
    use crate::data::table::TimingTable;

    fn collection(tables: Vec<TimingTable>, labels: &[&str]) -> DatasetCollection {
        DatasetCollection::pair(tables, labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn config() -> PlotConfig {
        PlotConfig::new(
            "falsesharing.png",
            Some("False sharing demo".into()),
            vec!["4:system".parse().unwrap()],
            100,
        )
        .unwrap()
    }

    fn labels(panel: &Panel) -> Vec<&str> {
        panel.series.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn two_datasets_give_two_elapsed_and_four_cpu_series() {
        let datasets = collection(vec![sample("a.csv"), sample("b.csv")], &["before", "after"]);
        let fig = ChartPlotter::build_figure(&datasets, &config());

        assert_eq!(fig.title.as_deref(), Some("False sharing demo"));
        assert_eq!(labels(&fig.elapsed), ["before", "after"]);
        assert_eq!(
            labels(&fig.cpu),
            ["total, before", "total, after", "system, before", "system, after"]
        );
        assert_eq!(fig.elapsed.scale, AxisScale::Linear);
        assert_eq!(fig.cpu.scale, AxisScale::Log);
    }

    #[test]
    fn both_panels_share_the_x_range() {
        let datasets = collection(vec![sample("a.csv"), sample("b.csv")], &["before", "after"]);
        let fig = ChartPlotter::build_figure(&datasets, &config());

        assert_eq!(fig.elapsed.x_range.0, 1.0);
        assert!((fig.elapsed.x_range.1 - 4.4).abs() < 1e-12);
        assert_eq!(fig.elapsed.x_range, fig.cpu.x_range);
    }

    #[test]
    fn x_upper_bound_uses_max_over_all_tables() {
        let small = table("s.csv", &[[1.0, 1.0, 1.0, 1.0, 1.0], [3.0, 1.0, 1.0, 1.0, 1.0]]);
        let big = table("b.csv", &[[2.0, 1.0, 1.0, 1.0, 1.0], [32.0, 1.0, 1.0, 1.0, 1.0]]);

        for (tables, expected) in [
            (vec![small.clone()], 3.0 * 1.1),
            (vec![big.clone()], 32.0 * 1.1),
            (vec![small, big], 32.0 * 1.1),
        ] {
            let names: Vec<String> = (0..tables.len()).map(|i| i.to_string()).collect();
            let datasets = DatasetCollection::pair(tables, names).unwrap();
            assert_eq!(ChartPlotter::x_upper_bound(&datasets, 0), expected);
        }
    }

    #[test]
    fn elapsed_series_plots_elapsed_column_in_row_order() {
        let datasets = collection(vec![sample("a.csv")], &["before"]);
        let fig = ChartPlotter::build_figure(&datasets, &config());
        assert_eq!(
            fig.elapsed.series[0].points,
            vec![(1.0, 1.0), (2.0, 0.6), (4.0, 0.35)]
        );
    }

    #[test]
    fn total_series_is_exact_sum_of_cpu_columns() {
        let t = table(
            "t.csv",
            &[[1.0, 0.0, 0.0, 0.125, 0.5], [2.0, 0.0, 0.0, 1.75, 0.25], [8.0, 0.0, 0.0, 3.0, 4.5]],
        );
        let datasets = collection(vec![t], &["run"]);
        let fig = ChartPlotter::build_figure(&datasets, &config());

        let total = &fig.cpu.series[0];
        assert_eq!(total.label, "total, run");
        let ys: Vec<f64> = total.points.iter().map(|p| p.1).collect();
        assert_eq!(ys, vec![0.125 + 0.5, 1.75 + 0.25, 3.0 + 4.5]);
    }

    #[test]
    fn cpu_ticks_pin_to_first_table_threads() {
        let first = table(
            "f.csv",
            &[
                [1.0, 1.0, 1.0, 1.0, 1.0],
                [2.0, 1.0, 1.0, 1.0, 1.0],
                [4.0, 1.0, 1.0, 1.0, 1.0],
                [8.0, 1.0, 1.0, 1.0, 1.0],
            ],
        );
        let datasets = collection(vec![first, sample("b.csv")], &["a", "b"]);
        let fig = ChartPlotter::build_figure(&datasets, &config());

        let ticks = fig.cpu.x_ticks.unwrap();
        assert_eq!(ticks, vec![1.0, 2.0, 4.0, 8.0]);
        let text: Vec<String> = ticks.into_iter().map(ChartPlotter::tick_label).collect();
        assert_eq!(text, ["1", "2", "4", "8"]);
        assert_eq!(fig.elapsed.x_ticks, None);
    }

    #[test]
    fn tick_labels_truncate_to_integers() {
        assert_eq!(ChartPlotter::tick_label(16.0), "16");
        assert_eq!(ChartPlotter::tick_label(2.9), "2");
    }

    #[test]
    fn breakdowns_follow_configured_order() {
        let mut cfg = config();
        cfg.breakdowns = vec![
            Breakdown {
                column: 3,
                label: "user".into(),
            },
            Breakdown {
                column: 4,
                label: "system".into(),
            },
        ];
        let datasets = collection(vec![sample("a.csv"), sample("b.csv")], &["x", "y"]);
        let fig = ChartPlotter::build_figure(&datasets, &cfg);

        assert_eq!(
            labels(&fig.cpu),
            ["total, x", "total, y", "user, x", "user, y", "system, x", "system, y"]
        );
        assert_eq!(fig.cpu.series[2].points[0], (1.0, 0.5));
    }

    #[test]
    fn no_breakdowns_leaves_only_totals() {
        let mut cfg = config();
        cfg.breakdowns.clear();
        let datasets = collection(vec![sample("a.csv")], &["x"]);
        let fig = ChartPlotter::build_figure(&datasets, &cfg);
        assert_eq!(labels(&fig.cpu), ["total, x"]);
    }

    #[test]
    fn colors_restart_per_panel() {
        let datasets = collection(vec![sample("a.csv"), sample("b.csv")], &["x", "y"]);
        let fig = ChartPlotter::build_figure(&datasets, &config());
        assert_eq!(fig.elapsed.series[0].color, PALETTE[0]);
        assert_eq!(fig.cpu.series[0].color, PALETTE[0]);
        assert_eq!(fig.cpu.series[3].color, PALETTE[3]);
        assert_eq!(ChartPlotter::series_color(12), PALETTE[2]);
    }

    #[test]
    fn non_positive_points_are_dropped_from_log_panel() {
        let t = table(
            "z.csv",
            &[[1.0, 1.0, 1.0, 0.5, 0.0], [2.0, 1.0, 1.0, 0.5, 0.25]],
        );
        let datasets = collection(vec![t], &["z"]);
        let fig = ChartPlotter::build_figure(&datasets, &config());

        let system = &fig.cpu.series[1];
        assert_eq!(system.label, "system, z");
        assert_eq!(system.points, vec![(2.0, 0.25)]);
        // the linear panel keeps every row
        assert_eq!(fig.elapsed.series[0].points.len(), 2);
    }

    #[test]
    fn linear_bounds_pad_and_widen() {
        let (lo, hi) = ChartPlotter::linear_bounds([0.0, 10.0].into_iter());
        assert_eq!((lo, hi), (-0.5, 10.5));
        assert_eq!(ChartPlotter::linear_bounds([2.0, 2.0].into_iter()), (1.0, 3.0));
        assert_eq!(ChartPlotter::linear_bounds(std::iter::empty()), (0.0, 1.0));
    }

    #[test]
    fn log_bounds_cover_data() {
        let (lo, hi) = ChartPlotter::log_bounds([0.1, 10.0, -1.0].into_iter());
        assert!(lo < 0.1 && lo > 0.05);
        assert!(hi > 10.0 && hi < 20.0);

        let (lo, hi) = ChartPlotter::log_bounds([1.0].into_iter());
        assert!(lo < 1.0 && hi > 1.0);
    }

    #[test]
    fn legend_avoids_crowded_corners() {
        let falling = Series {
            label: "f".into(),
            points: vec![(1.0, 1.0), (2.0, 0.6), (4.0, 0.35)],
            color: PALETTE[0],
        };
        let corner =
            ChartPlotter::best_legend_corner(&[falling], AxisScale::Linear, (1.0, 4.4), (0.3, 1.05));
        assert_eq!(corner, LegendCorner::UpperRight);

        let rising = Series {
            label: "r".into(),
            points: vec![(1.0, 0.1), (2.0, 0.5), (4.0, 1.0)],
            color: PALETTE[0],
        };
        let corner =
            ChartPlotter::best_legend_corner(&[rising], AxisScale::Linear, (1.0, 4.4), (0.0, 1.05));
        assert_eq!(corner, LegendCorner::UpperLeft);
    }
}
