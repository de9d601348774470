// src/analysis/charts.rs
//
// Static PNG charts. Each `render_*` writes one multi-panel image and
// returns its path. Categorical axes are drawn on an f64 axis with one
// unit per category; labels are mapped back from integer positions.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use tracing::info;

use super::stats::{self, Column, Metric};
use crate::config::consts::HISTOGRAM_BINS;
use crate::error::{Error, Result};
use crate::file::{chart_path, ensure_directory};
use crate::model::Work;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), Box<dyn StdError>>;

const FONT: &str = "sans-serif";
const LABEL_MAX_CHARS: usize = 18;

// matplotlib "tab10"
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];
const SKYBLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHTCORAL: RGBColor = RGBColor(240, 128, 128);
const LIGHTGREEN: RGBColor = RGBColor(144, 238, 144);

fn color(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

/// Render every chart into `dir`. Empty input → nothing written.
pub fn render_all(works: &[Work], dir: &Path) -> Result<Vec<PathBuf>> {
    if works.is_empty() {
        info!("No works to chart");
        return Ok(Vec::new());
    }
    ensure_directory(dir)?;
    Ok(vec![
        render_ratings(works, dir)?,
        render_word_counts(works, dir)?,
        render_engagement(works, dir)?,
        render_categories(works, dir)?,
    ])
}

pub fn render_ratings(works: &[Work], dir: &Path) -> Result<PathBuf> {
    render(dir, "rating_analysis", (1500, 600), |root| {
        let (left, right) = root.split_horizontally(600);
        let counts = stats::value_counts(works, Column::Rating);
        pie_panel(&left, "Overall Rating Distribution", &counts)?;
        let ct = stats::crosstab(works, Column::Topic, Column::Rating);
        grouped_bar_panel(&right, "Rating Distribution by Fandom", "Count", &ct)
    })
}

pub fn render_word_counts(works: &[Work], dir: &Path) -> Result<PathBuf> {
    render(dir, "word_count_analysis", (1500, 1200), |root| {
        let panels = root.split_evenly((2, 2));
        let words = stats::metric_values(works, Metric::Words);
        let kudos = stats::metric_values(works, Metric::Kudos);

        histogram_panel(&panels[0], "Word Count Distribution (All Works)", &words)?;
        box_panel(&panels[1], "Word Count by Fandom", &stats::boxes_by_topic(works, Metric::Words))?;
        bar_panel(
            &panels[2],
            "Average Word Count by Fandom",
            "Average Words",
            &stats::group_mean(works, Metric::Words),
            color(0),
        )?;
        let caption = match stats::pearson(&words, &kudos) {
            Some(r) => format!("Word Count vs Kudos (Correlation: {r:.3})"),
            None => s!("Word Count vs Kudos"),
        };
        scatter_panel(&panels[3], &caption, "Word Count", "Kudos", &words, &kudos)
    })
}

pub fn render_engagement(works: &[Work], dir: &Path) -> Result<PathBuf> {
    render(dir, "engagement_analysis", (1500, 1200), |root| {
        let panels = root.split_evenly((2, 2));
        bar_panel(
            &panels[0],
            "Average Kudos by Fandom",
            "Average Kudos",
            &stats::group_mean(works, Metric::Kudos),
            SKYBLUE,
        )?;
        bar_panel(
            &panels[1],
            "Average Hits by Fandom",
            "Average Hits",
            &stats::group_mean(works, Metric::Hits),
            LIGHTCORAL,
        )?;
        bar_panel(
            &panels[2],
            "Average Kudos-to-Hits Ratio by Fandom",
            "Kudos/Hits Ratio",
            &stats::kudos_hit_ratio_by_topic(works),
            LIGHTGREEN,
        )?;
        engagement_panel(&panels[3], &stats::normalized_engagement(works))
    })
}

pub fn render_categories(works: &[Work], dir: &Path) -> Result<PathBuf> {
    render(dir, "category_analysis", (1500, 600), |root| {
        let (left, right) = root.split_horizontally(650);
        hbar_panel(&left, "Overall Category Distribution", &stats::value_counts(works, Column::Category))?;
        let ct = stats::crosstab(works, Column::Topic, Column::Category);
        stacked_bar_panel(&right, "Category Distribution by Fandom", &ct)
    })
}

/* ---------------- plumbing ---------------- */

fn render(dir: &Path, name: &str, size: (u32, u32), draw: impl FnOnce(&Area) -> DrawResult) -> Result<PathBuf> {
    let path = chart_path(dir, name);
    {
        let root = BitMapBackend::new(&path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| Error::chart(name, e))?;
        draw(&root).map_err(|e| Error::chart(name, e))?;
        root.present().map_err(|e| Error::chart(name, e))?;
    }
    info!("Saved {name} to {}", path.display());
    Ok(path)
}

fn short(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX_CHARS {
        return s!(label);
    }
    let mut out = crate::core::sanitize::truncate_chars(label, LABEL_MAX_CHARS - 1);
    out.push('…');
    out
}

/// Label for integer positions on a categorical f64 axis; blank between.
fn category_label(names: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return s!();
    }
    names.get(i as usize).map(|n| short(n)).unwrap_or_default()
}

fn upper(max: f64) -> f64 {
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

/* ---------------- panels ---------------- */

fn pie_panel(area: &Area, title: &str, counts: &[(String, usize)]) -> DrawResult {
    let area = area.titled(title, (FONT, 22))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.32;

    let sizes: Vec<f64> = counts.iter().map(|(_, n)| *n as f64).collect();
    let colors: Vec<RGBColor> = (0..counts.len()).map(color).collect();
    let labels: Vec<String> = counts.iter().map(|(l, _)| short(l)).collect();

    let mut pie = Pie::new(&center, &radius, &sizes[..], &colors[..], &labels[..]);
    pie.start_angle(-90.0);
    pie.label_style((FONT, 14).into_font().color(&BLACK));
    pie.percentages((FONT, 13).into_font().color(&WHITE));
    area.draw(&pie)?;
    Ok(())
}

fn bar_panel(area: &Area, title: &str, y_desc: &str, data: &[(String, f64)], fill: RGBColor) -> DrawResult {
    let names: Vec<String> = data.iter().map(|(n, _)| n.clone()).collect();
    let n = data.len().max(1) as f64;
    let y_max = upper(data.iter().map(|(_, v)| *v).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(data.len() + 1)
        .x_label_formatter(&|x| category_label(&names, *x))
        .x_desc("Fandom")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(data.iter().enumerate().map(|(i, (_, v))| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *v)], fill.filled())
    }))?;
    Ok(())
}

fn hbar_panel(area: &Area, title: &str, counts: &[(String, usize)]) -> DrawResult {
    let names: Vec<String> = counts.iter().map(|(n, _)| n.clone()).collect();
    let n = counts.len().max(1) as f64;
    let x_max = upper(counts.iter().map(|(_, c)| *c as f64).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(140)
        .build_cartesian_2d(0f64..x_max, -0.5f64..n - 0.5)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(counts.len() + 1)
        .y_label_formatter(&|y| category_label(&names, *y))
        .x_desc("Count")
        .y_desc("Category")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, c))| {
        let y = i as f64;
        Rectangle::new([(0.0, y - 0.4), (*c as f64, y + 0.4)], color(0).filled())
    }))?;
    Ok(())
}

/// Side-by-side bars: one group per row of `ct`, one bar per column.
fn grouped_bar_panel(area: &Area, title: &str, y_desc: &str, ct: &stats::CrossTab) -> DrawResult {
    let n = ct.rows.len().max(1) as f64;
    let k = ct.cols.len().max(1) as f64;
    let bar = 0.8 / k;
    let y_max = upper(ct.max_cell() as f64);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(ct.rows.len() + 1)
        .x_label_formatter(&|x| category_label(&ct.rows, *x))
        .x_desc("Fandom")
        .y_desc(y_desc)
        .draw()?;

    for (c, col_name) in ct.cols.iter().enumerate() {
        let fill = color(c);
        chart
            .draw_series(ct.counts.iter().enumerate().map(|(r, row)| {
                let x0 = r as f64 - 0.4 + c as f64 * bar;
                Rectangle::new([(x0, 0.0), (x0 + bar, row[c] as f64)], fill.filled())
            }))?
            .label(short(col_name))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}

/// Bars stacked per row of `ct`.
fn stacked_bar_panel(area: &Area, title: &str, ct: &stats::CrossTab) -> DrawResult {
    let n = ct.rows.len().max(1) as f64;
    let y_max = upper((0..ct.rows.len()).map(|r| ct.row_total(r) as f64).fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(ct.rows.len() + 1)
        .x_label_formatter(&|x| category_label(&ct.rows, *x))
        .x_desc("Fandom")
        .y_desc("Count")
        .draw()?;

    // Running top of each stack.
    let mut base = vec![0f64; ct.rows.len()];
    for (c, col_name) in ct.cols.iter().enumerate() {
        let fill = color(c);
        let segments: Vec<(f64, f64, f64)> = ct
            .counts
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let bottom = base[r];
                base[r] += row[c] as f64;
                (r as f64, bottom, base[r])
            })
            .collect();
        chart
            .draw_series(segments.into_iter().map(|(x, y0, y1)| {
                Rectangle::new([(x - 0.4, y0), (x + 0.4, y1)], fill.filled())
            }))?
            .label(short(col_name))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}

fn histogram_panel(area: &Area, title: &str, values: &[f64]) -> DrawResult {
    let Some(h) = stats::histogram(values, HISTOGRAM_BINS) else { return Ok(()) };
    let x_end = h.start + h.width * h.counts.len() as f64;
    let y_max = upper(h.counts.iter().copied().max().unwrap_or(0) as f64);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(h.start..x_end, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Word Count")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(h.counts.iter().enumerate().filter(|(_, c)| **c > 0).map(|(i, c)| {
        let x0 = h.start + h.width * i as f64;
        Rectangle::new([(x0, 0.0), (x0 + h.width, *c as f64)], color(0).filled())
    }))?;
    Ok(())
}

fn box_panel(area: &Area, title: &str, boxes: &[stats::BoxStats]) -> DrawResult {
    let names: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
    let n = boxes.len().max(1) as f64;
    let y_max = upper(
        boxes
            .iter()
            .map(|b| b.outliers.iter().copied().fold(b.high, f64::max))
            .fold(0.0, f64::max),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len() + 1)
        .x_label_formatter(&|x| category_label(&names, *x))
        .x_desc("Fandom")
        .y_desc("Word Count")
        .draw()?;

    let line = BLACK.stroke_width(1);
    for (i, b) in boxes.iter().enumerate() {
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new([(x - 0.3, b.q1), (x + 0.3, b.q3)], color(0).mix(0.35).filled())))?;
        chart.draw_series(std::iter::once(Rectangle::new([(x - 0.3, b.q1), (x + 0.3, b.q3)], line)))?;
        chart.draw_series([
            PathElement::new(vec![(x - 0.3, b.median), (x + 0.3, b.median)], RED.stroke_width(2)),
            PathElement::new(vec![(x, b.q3), (x, b.high)], line),
            PathElement::new(vec![(x, b.q1), (x, b.low)], line),
            PathElement::new(vec![(x - 0.15, b.high), (x + 0.15, b.high)], line),
            PathElement::new(vec![(x - 0.15, b.low), (x + 0.15, b.low)], line),
        ])?;
        chart.draw_series(b.outliers.iter().map(|y| Circle::new((x, *y), 3, line)))?;
    }
    Ok(())
}

fn scatter_panel(area: &Area, title: &str, x_desc: &str, y_desc: &str, xs: &[f64], ys: &[f64]) -> DrawResult {
    let x_max = upper(xs.iter().copied().fold(0.0, f64::max));
    let y_max = upper(ys.iter().copied().fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    chart.draw_series(
        xs.iter()
            .zip(ys)
            .map(|(x, y)| Circle::new((*x, *y), 3, color(0).mix(0.5).filled())),
    )?;
    Ok(())
}

fn engagement_panel(area: &Area, e: &stats::Engagement) -> DrawResult {
    let n = e.topics.len().max(1) as f64;
    let bar = 0.8 / e.metrics.len() as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Normalized Engagement Metrics by Fandom", (FONT, 22))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(e.topics.len() + 1)
        .x_label_formatter(&|x| category_label(&e.topics, *x))
        .x_desc("Fandom")
        .y_desc("Normalized Value")
        .draw()?;

    for (m, metric) in e.metrics.iter().enumerate() {
        let fill = color(m);
        chart
            .draw_series(e.values.iter().enumerate().map(|(t, row)| {
                let x0 = t as f64 - 0.4 + m as f64 * bar;
                Rectangle::new([(x0, 0.0), (x0 + bar, row[m])], fill.filled())
            }))?
            .label(metric.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}
