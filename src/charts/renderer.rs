//! Static Chart Renderer
//! Draws a [`Figure`] with plotters and writes it to disk.
//!
//! Layout:
//! 1. Title centered on top (optional)
//! 2. Two charts side-by-side:
//!    - Left: elapsed time vs thread count, linear axes, circle markers
//!    - Right: CPU time vs thread count, log-log axes, ticks pinned to the
//!      first table's thread counts

use crate::charts::plotter::{ChartPlotter, Figure, LegendCorner, Panel, Series};
use crate::config::{OutputFormat, PlotConfig};
use crate::error::RenderError;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use std::path::Path;

const GRID_BOLD: RGBColor = RGBColor(200, 200, 200);
const GRID_LIGHT: RGBColor = RGBColor(235, 235, 235);
const TITLE_FONT: (&str, u32) = ("sans-serif", 24);
const DESC_FONT: (&str, u32) = ("sans-serif", 16);
const LABEL_FONT: (&str, u32) = ("sans-serif", 13);
const MARKER_SIZE: u32 = 4;

fn drawing_err(err: impl std::fmt::Display) -> RenderError {
    RenderError::Drawing(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `figure` to `config.output`.
    ///
    /// The image goes to a temporary sibling file first and replaces the
    /// destination only once fully written; on failure the temporary file is
    /// removed and the destination is left as it was.
    pub fn render_to_file(figure: &Figure, config: &PlotConfig) -> Result<(), RenderError> {
        let opts = config.render;
        let dir = match config.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".timing-chart-")
            .suffix(&format!(".{}", opts.format.extension()))
            .tempfile_in(dir)?;

        let size = (opts.width, opts.height);
        match opts.format {
            OutputFormat::Svg => {
                let root = SVGBackend::new(staged.path(), size).into_drawing_area();
                Self::draw(&root, figure)?;
                root.present().map_err(drawing_err)?;
            }
            OutputFormat::Png | OutputFormat::Jpeg | OutputFormat::Bmp => {
                let root = BitMapBackend::new(staged.path(), size).into_drawing_area();
                Self::draw(&root, figure)?;
                root.present().map_err(drawing_err)?;
            }
        }

        staged.persist(&config.output)?;
        log::info!(
            "wrote {}x{} chart to '{}'",
            opts.width,
            opts.height,
            config.output.display()
        );
        Ok(())
    }

    /// Draw the whole figure onto any plotters backend.
    pub fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &Figure,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(drawing_err)?;

        let body = match &figure.title {
            Some(title) => root.titled(title, TITLE_FONT).map_err(drawing_err)?,
            None => root.clone(),
        };

        let panels = body.split_evenly((1, 2));
        Self::draw_elapsed_panel(&panels[0], &figure.elapsed)?;
        Self::draw_cpu_panel(&panels[1], &figure.cpu)?;
        Ok(())
    }

    fn draw_elapsed_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        panel: &Panel,
    ) -> Result<(), RenderError> {
        let (x0, x1) = panel.x_range;
        let (y0, y1) = panel.y_range;

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(drawing_err)?;

        chart
            .configure_mesh()
            .x_desc(panel.x_desc)
            .y_desc(panel.y_desc)
            .axis_desc_style(DESC_FONT)
            .label_style(LABEL_FONT)
            .bold_line_style(GRID_BOLD.stroke_width(1))
            .light_line_style(GRID_LIGHT.stroke_width(1))
            .draw()
            .map_err(drawing_err)?;

        Self::draw_lines(&mut chart, &panel.series)?;
        Self::draw_legend(&mut chart, panel.legend)
    }

    fn draw_cpu_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        panel: &Panel,
    ) -> Result<(), RenderError> {
        let (x0, x1) = panel.x_range;
        let (y0, y1) = panel.y_range;
        let ticks = panel.x_ticks.clone().unwrap_or_default();
        let tick_count = ticks.len().max(1);

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(
                (x0..x1).log_scale().with_key_points(ticks),
                (y0..y1).log_scale(),
            )
            .map_err(drawing_err)?;

        chart
            .configure_mesh()
            .x_desc(panel.x_desc)
            .y_desc(panel.y_desc)
            .x_labels(tick_count)
            .x_label_formatter(&|x| ChartPlotter::tick_label(*x))
            .axis_desc_style(DESC_FONT)
            .label_style(LABEL_FONT)
            .bold_line_style(GRID_BOLD.stroke_width(1))
            .light_line_style(GRID_LIGHT.stroke_width(1))
            .draw()
            .map_err(drawing_err)?;

        Self::draw_lines(&mut chart, &panel.series)?;
        Self::draw_legend(&mut chart, panel.legend)
    }

    /// Marker-connected lines, one legend entry each.
    fn draw_lines<'a, DB, CT>(
        chart: &mut ChartContext<'a, DB, CT>,
        series: &[Series],
    ) -> Result<(), RenderError>
    where
        DB: DrawingBackend + 'a,
        CT: CoordTranslate<From = (f64, f64)>,
    {
        for s in series {
            let color = s.color;
            chart
                .draw_series(
                    LineSeries::new(s.points.iter().copied(), color.stroke_width(2))
                        .point_size(MARKER_SIZE),
                )
                .map_err(drawing_err)?
                .label(s.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }
        Ok(())
    }

    fn draw_legend<'a, DB, CT>(
        chart: &mut ChartContext<'a, DB, CT>,
        corner: LegendCorner,
    ) -> Result<(), RenderError>
    where
        DB: DrawingBackend + 'a,
        CT: CoordTranslate,
    {
        let position = match corner {
            LegendCorner::UpperRight => SeriesLabelPosition::UpperRight,
            LegendCorner::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendCorner::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendCorner::LowerRight => SeriesLabelPosition::LowerRight,
        };
        chart
            .configure_series_labels()
            .position(position)
            .label_font(LABEL_FONT)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing_err)
    }
}
