//! Chart description for a [`Table`] and a plotters renderer for it.

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{model::Table, persist::COLUMNS};

pub const CHART_FILE: &str = "solar_intensity_and_temperature.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub marker: Marker,
    pub dashed: bool,
    /// One value per category; `None` leaves a gap in the line.
    pub values: Vec<Option<f64>>,
}

impl Series {
    /// Consecutive runs of present values as `(category index, value)` pairs.
    pub fn segments(&self) -> Vec<Vec<(usize, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();

        for (i, value) in self.values.iter().enumerate() {
            match value {
                Some(v) => current.push((i, *v)),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        runs
    }
}

/// Everything needed to draw the line chart, independent of any backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Time-of-day labels in table order.
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub rotate_tick_labels: bool,
    pub grid: bool,
    pub size: (u32, u32),
}

impl ChartSpec {
    pub fn from_table(table: &Table) -> Self {
        let records = table.records();

        Self {
            title: "Solar Intensity and Temperature Over Time".to_string(),
            x_label: "Time".to_string(),
            y_label: "Value".to_string(),
            categories: records.iter().map(|r| r.time.clone()).collect(),
            series: vec![
                Series {
                    label: COLUMNS[0].to_string(),
                    marker: Marker::Circle,
                    dashed: false,
                    values: records.iter().map(|r| r.solar_intensity).collect(),
                },
                Series {
                    label: COLUMNS[1].to_string(),
                    marker: Marker::Cross,
                    dashed: true,
                    values: records.iter().map(|r| r.temperature).collect(),
                },
            ],
            rotate_tick_labels: true,
            grid: true,
            size: (1000, 600),
        }
    }

    /// Y range covering every present value with a little headroom.
    pub fn value_range(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|s| s.values.iter().flatten().copied());
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if !min.is_finite() {
            return (0.0, 1.0);
        }

        let pad = ((max - min) * 0.05).max(1.0);
        (min - pad, max + pad)
    }
}

/// Draws a chart description somewhere.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<PathBuf>;
}

/// Renders to an SVG file with plotters.
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    path: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self::new(CHART_FILE)
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<PathBuf> {
        draw(&self.path, spec)
            .with_context(|| format!("Failed to render chart: {}", self.path.display()))?;

        info!(path = %self.path.display(), points = spec.categories.len(), "chart written");

        Ok(self.path.clone())
    }
}

fn draw(path: &Path, spec: &ChartSpec) -> Result<()> {
    let root = SVGBackend::new(path, spec.size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = spec.categories.len().max(1) as i32;
    let (lo, hi) = spec.value_range();

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), lo..hi)?;

    let categories = &spec.categories;
    let tick_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            categories.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    let tick_style = if spec.rotate_tick_labels {
        ("sans-serif", 13).into_font().transform(FontTransform::Rotate90)
    } else {
        ("sans-serif", 13).into_font()
    };

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_labels(categories.len().max(1))
            .x_label_formatter(&tick_label)
            .x_label_style(tick_style);
        if !spec.grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;
    }

    let palette = [BLUE, RED];
    for (series, color) in spec.series.iter().zip(palette.iter().cycle()) {
        let color = *color;
        let at = |i: usize| SegmentValue::CenterOf(i as i32);

        for run in series.segments() {
            let points = run.iter().map(|&(i, v)| (at(i), v));
            if series.dashed {
                chart.draw_series(DashedLineSeries::new(points, 8, 5, color.stroke_width(2)))?;
            } else {
                chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
            }
        }

        let points = series.values.iter().enumerate().filter_map(|(i, v)| v.map(|v| (at(i), v)));
        let anno = match series.marker {
            Marker::Circle => {
                chart.draw_series(points.map(|p| Circle::new(p, 4, color.filled())))?
            }
            Marker::Cross => {
                chart.draw_series(points.map(|p| Cross::new(p, 4, color.stroke_width(2))))?
            }
        };
        anno.label(series.label.as_str()).legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
        });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn table() -> Table {
        let rows = [
            ("12:00 AM", None, Some(24.0)),
            ("06:00 AM", Some(120.0), Some(26.5)),
            ("12:00 PM", Some(450.5), None),
            ("06:00 PM", Some(80.0), Some(30.0)),
        ];
        Table::new(
            rows.iter()
                .map(|(time, i, t)| Record {
                    time: time.to_string(),
                    date: "1 Jun, 2024".into(),
                    solar_intensity: *i,
                    temperature: *t,
                })
                .collect(),
        )
    }

    #[test]
    fn spec_follows_table_order() {
        let spec = ChartSpec::from_table(&table());

        assert_eq!(spec.categories, ["12:00 AM", "06:00 AM", "12:00 PM", "06:00 PM"]);
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].label, "Solar Intensity (W/m²)");
        assert_eq!(spec.series[0].marker, Marker::Circle);
        assert_eq!(spec.series[0].values, [None, Some(120.0), Some(450.5), Some(80.0)]);
        assert_eq!(spec.series[1].label, "Temperature (°C)");
        assert_eq!(spec.series[1].marker, Marker::Cross);
        assert!(!spec.series[0].dashed);
        assert!(spec.series[1].dashed);
        assert!(spec.rotate_tick_labels);
        assert!(spec.grid);
    }

    #[test]
    fn segments_split_on_missing() {
        let spec = ChartSpec::from_table(&table());

        assert_eq!(spec.series[0].segments(), vec![vec![(1, 120.0), (2, 450.5), (3, 80.0)]]);
        assert_eq!(spec.series[1].segments(), vec![vec![(0, 24.0), (1, 26.5)], vec![(3, 30.0)]]);
    }

    #[test]
    fn value_range_covers_both_series() {
        let (lo, hi) = ChartSpec::from_table(&table()).value_range();
        assert!(lo < 24.0);
        assert!(hi > 450.5);

        let (lo, hi) = ChartSpec::from_table(&Table::default()).value_range();
        assert_eq!((lo, hi), (0.0, 1.0));
    }

    #[test]
    fn svg_renderer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = SvgChartRenderer::new(dir.path().join(CHART_FILE));

        let path = renderer.render(&ChartSpec::from_table(&table())).unwrap();
        let svg = std::fs::read_to_string(path).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Solar Intensity and Temperature Over Time"));
        assert!(svg.contains("Value"));
    }
}
