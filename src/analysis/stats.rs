// src/analysis/stats.rs
//
// Grouped descriptive statistics over a slice of works. Everything is a
// pure function; ordering of every returned list is deterministic.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::model::Work;

/// Numeric columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Words,
    Kudos,
    Bookmarks,
    Hits,
}

impl Metric {
    pub fn of(&self, w: &Work) -> u64 {
        match self {
            Metric::Words => w.words,
            Metric::Kudos => w.kudos,
            Metric::Bookmarks => w.bookmarks,
            Metric::Hits => w.hits,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Words => "words",
            Metric::Kudos => "kudos",
            Metric::Bookmarks => "bookmarks",
            Metric::Hits => "hits",
        }
    }
}

/// Categorical columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Topic,
    Rating,
    Category,
}

impl Column {
    pub fn of<'a>(&self, w: &'a Work) -> &'a str {
        match self {
            Column::Topic => &w.fandom_searched,
            Column::Rating => &w.rating,
            Column::Category => &w.category,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub total_works: usize,
    pub unique_authors: usize,
    pub total_words: u64,
    /// (topic, count), largest first.
    pub by_topic: Vec<(String, usize)>,
    pub avg_words: f64,
    pub median_words: f64,
    pub avg_kudos: f64,
    pub median_kudos: f64,
    pub avg_hits: f64,
    /// Share of works whose chapter count says finished, 0..=1.
    pub completion_rate: f64,
}

pub fn summary(works: &[Work]) -> Summary {
    let words = metric_values(works, Metric::Words);
    let kudos = metric_values(works, Metric::Kudos);
    let hits = metric_values(works, Metric::Hits);
    let authors: HashSet<&str> = works.iter().map(|w| w.author.as_str()).collect();

    Summary {
        total_works: works.len(),
        unique_authors: authors.len(),
        total_words: works.iter().map(|w| w.words).sum(),
        by_topic: value_counts(works, Column::Topic),
        avg_words: mean(&words),
        median_words: median(&words),
        avg_kudos: mean(&kudos),
        median_kudos: median(&kudos),
        avg_hits: mean(&hits),
        completion_rate: completion_rate(works),
    }
}

pub fn metric_values(works: &[Work], m: Metric) -> Vec<f64> {
    works.iter().map(|w| m.of(w) as f64).collect()
}

/// 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, or the mean of the two middle values. 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Linear-interpolated quantile, `q` in 0..=1. 0 for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    quantile_sorted(&v, q)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Count per distinct value: most frequent first, ties by value.
pub fn value_counts(works: &[Work], col: Column) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for w in works {
        *counts.entry(col.of(w)).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().map(|(k, n)| (s!(k), n)).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Row × column count matrix; both axes sorted by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    /// counts[row][col]
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn get(&self, row: &str, col: &str) -> usize {
        let r = self.rows.iter().position(|x| x == row);
        let c = self.cols.iter().position(|x| x == col);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn row_total(&self, r: usize) -> usize {
        self.counts.get(r).map(|row| row.iter().sum()).unwrap_or(0)
    }

    pub fn max_cell(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

pub fn crosstab(works: &[Work], row: Column, col: Column) -> CrossTab {
    let rows: Vec<String> = works.iter().map(|w| row.of(w)).collect::<BTreeSet<_>>().into_iter().map(String::from).collect();
    let cols: Vec<String> = works.iter().map(|w| col.of(w)).collect::<BTreeSet<_>>().into_iter().map(String::from).collect();

    let mut counts = vec![vec![0usize; cols.len()]; rows.len()];
    for w in works {
        // Both keys are present by construction.
        if let (Ok(r), Ok(c)) = (
            rows.binary_search_by(|x| x.as_str().cmp(row.of(w))),
            cols.binary_search_by(|x| x.as_str().cmp(col.of(w))),
        ) {
            counts[r][c] += 1;
        }
    }
    CrossTab { rows, cols, counts }
}

/// Per-topic mean of `f`, highest first (ties by topic name).
pub fn group_mean_by(works: &[Work], f: impl Fn(&Work) -> f64) -> Vec<(String, f64)> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for w in works {
        let e = groups.entry(w.fandom_searched.as_str()).or_default();
        e.0 += f(w);
        e.1 += 1;
    }
    let mut out: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(k, (sum, n))| (s!(k), sum / n as f64))
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

pub fn group_mean(works: &[Work], m: Metric) -> Vec<(String, f64)> {
    group_mean_by(works, |w| m.of(w) as f64)
}

pub fn kudos_hit_ratio_by_topic(works: &[Work]) -> Vec<(String, f64)> {
    group_mean_by(works, Work::kudos_hit_ratio)
}

/// Per-topic means of kudos/bookmarks/hits, each scaled by that metric's
/// largest topic mean so the top topic reads 1.0.
#[derive(Clone, Debug, PartialEq)]
pub struct Engagement {
    pub topics: Vec<String>,
    pub metrics: [Metric; 3],
    /// values[topic][metric], 0..=1
    pub values: Vec<[f64; 3]>,
}

pub fn normalized_engagement(works: &[Work]) -> Engagement {
    let metrics = [Metric::Kudos, Metric::Bookmarks, Metric::Hits];
    let mut groups: BTreeMap<&str, ([f64; 3], usize)> = BTreeMap::new();
    for w in works {
        let e = groups.entry(w.fandom_searched.as_str()).or_default();
        for (i, m) in metrics.iter().enumerate() {
            e.0[i] += m.of(w) as f64;
        }
        e.1 += 1;
    }

    let topics: Vec<String> = groups.keys().map(|k| s!(*k)).collect();
    let means: Vec<[f64; 3]> = groups
        .values()
        .map(|(sums, n)| sums.map(|s| s / *n as f64))
        .collect();

    let mut max = [0f64; 3];
    for row in &means {
        for i in 0..3 {
            max[i] = max[i].max(row[i]);
        }
    }
    let values = means
        .iter()
        .map(|row| {
            let mut out = [0f64; 3];
            for i in 0..3 {
                out[i] = if max[i] > 0.0 { row[i] / max[i] } else { 0.0 };
            }
            out
        })
        .collect();

    Engagement { topics, metrics, values }
}

/// Pearson correlation. `None` for fewer than two points, mismatched
/// lengths, or a constant series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx.sqrt() * syy.sqrt()))
}

/// Box-plot numbers for one group. Whiskers reach the furthest points
/// within 1.5 × IQR of the box; anything beyond is an outlier.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub high: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(label: &str, values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&v, 0.25);
    let med = quantile_sorted(&v, 0.5);
    let q3 = quantile_sorted(&v, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside: Vec<f64> = v.iter().copied().filter(|x| *x >= lo_fence && *x <= hi_fence).collect();
    let low = inside.first().copied().unwrap_or(q1);
    let high = inside.last().copied().unwrap_or(q3);
    let outliers = v.iter().copied().filter(|x| *x < lo_fence || *x > hi_fence).collect();

    Some(BoxStats { label: s!(label), low, q1, median: med, q3, high, outliers })
}

/// One box per topic, topics sorted by name.
pub fn boxes_by_topic(works: &[Work], m: Metric) -> Vec<BoxStats> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for w in works {
        groups.entry(w.fandom_searched.as_str()).or_default().push(m.of(w) as f64);
    }
    groups
        .into_iter()
        .filter_map(|(k, vals)| box_stats(k, &vals))
        .collect()
}

/// Equal-width bins spanning min..=max; the max value lands in the last bin.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // All-equal data still gets one visible bar.
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { start: min, width, counts })
}

/// Works by a metric, highest first. Stable: ties keep input order.
pub fn top_n(works: &[Work], m: Metric, n: usize) -> Vec<&Work> {
    let mut sorted: Vec<&Work> = works.iter().collect();
    sorted.sort_by(|a, b| m.of(b).cmp(&m.of(a)));
    sorted.truncate(n);
    sorted
}

/// Share of works whose chapter string says complete.
pub fn completion_rate(works: &[Work]) -> f64 {
    if works.is_empty() {
        return 0.0;
    }
    works.iter().filter(|w| w.is_complete()).count() as f64 / works.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(topic: &str, author: &str, rating: &str, category: &str, words: u64, kudos: u64, bookmarks: u64, hits: u64) -> Work {
        Work {
            fandom_searched: s!(topic),
            title: format!("{topic} by {author}"),
            author: s!(author),
            rating: s!(rating),
            category: s!(category),
            words,
            kudos,
            bookmarks,
            hits,
            chapters: s!("1/1"),
            ..Work::default()
        }
    }

    /// Mirrors the four-record validation set used when checking the pipeline end to end.
    fn sample() -> Vec<Work> {
        vec![
            w("Sherlock", "TestAuthor1", "Teen And Up Audiences", "M/M", 5000, 150, 20, 1000),
            w("Star Trek", "TestAuthor2", "General Audiences", "Gen", 8000, 200, 35, 1500),
            w("My Chemical Romance", "TestAuthor3", "Mature", "F/M", 12000, 300, 50, 2500),
            w("Fall Out Boy", "TestAuthor4", "Explicit", "M/M", 3000, 100, 15, 800),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn summary_of_sample() {
        let s = summary(&sample());
        assert_eq!(s.total_works, 4);
        assert_eq!(s.unique_authors, 4);
        assert_eq!(s.total_words, 28000);
        assert!(approx(s.avg_words, 7000.0));
        assert!(approx(s.median_words, 6500.0));
        assert!(approx(s.avg_kudos, 187.5));
        assert!(approx(s.median_kudos, 175.0));
        assert!(approx(s.avg_hits, 1450.0));
        assert!(approx(s.completion_rate, 1.0));
        assert_eq!(s.by_topic.len(), 4);
        assert!(s.by_topic.iter().all(|(_, n)| *n == 1));
        // ties sorted by name
        assert_eq!(s.by_topic[0].0, "Fall Out Boy");
    }

    #[test]
    fn summary_of_nothing_is_zeroes() {
        let s = summary(&[]);
        assert_eq!(s.total_works, 0);
        assert_eq!(s.avg_words, 0.0);
        assert_eq!(s.median_kudos, 0.0);
        assert_eq!(s.completion_rate, 0.0);
        assert!(s.by_topic.is_empty());
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.25), 2.0);
    }

    #[test]
    fn value_counts_orders_by_frequency_then_name() {
        let vc = value_counts(&sample(), Column::Category);
        assert_eq!(vc, vec![(s!("M/M"), 2), (s!("F/M"), 1), (s!("Gen"), 1)]);
    }

    #[test]
    fn crosstab_counts_pairs() {
        let mut works = sample();
        works.push(w("Sherlock", "X", "Mature", "M/M", 1, 1, 1, 1));
        let ct = crosstab(&works, Column::Topic, Column::Rating);
        assert_eq!(ct.rows.len(), 4);
        assert_eq!(ct.cols.len(), 4);
        assert_eq!(ct.get("Sherlock", "Mature"), 1);
        assert_eq!(ct.get("Sherlock", "Teen And Up Audiences"), 1);
        assert_eq!(ct.get("Star Trek", "Mature"), 0);
        assert_eq!(ct.get("nope", "Mature"), 0);
        let sherlock = ct.rows.iter().position(|r| r == "Sherlock").unwrap();
        assert_eq!(ct.row_total(sherlock), 2);
        assert_eq!(ct.max_cell(), 1);
    }

    #[test]
    fn group_means_sorted_descending() {
        let mut works = sample();
        works.push(w("Sherlock", "Y", "Mature", "M/M", 15000, 0, 0, 0));
        let gm = group_mean(&works, Metric::Words);
        assert_eq!(gm[0].0, "My Chemical Romance");
        assert!(approx(gm[0].1, 12000.0));
        assert_eq!(gm[1].0, "Sherlock");
        assert!(approx(gm[1].1, 10000.0));
        assert_eq!(gm.last().unwrap().0, "Fall Out Boy");
    }

    #[test]
    fn ratio_by_topic_uses_plus_one() {
        let works = vec![w("A", "a", "r", "c", 0, 10, 0, 9), w("A", "b", "r", "c", 0, 0, 0, 0)];
        let r = kudos_hit_ratio_by_topic(&works);
        assert!(approx(r[0].1, 0.5)); // (1.0 + 0.0) / 2
    }

    #[test]
    fn engagement_is_scaled_by_column_max() {
        let e = normalized_engagement(&sample());
        let mcr = e.topics.iter().position(|t| t == "My Chemical Romance").unwrap();
        assert_eq!(e.values[mcr], [1.0, 1.0, 1.0]);
        let fob = e.topics.iter().position(|t| t == "Fall Out Boy").unwrap();
        assert!(approx(e.values[fob][0], 100.0 / 300.0));
        assert!(approx(e.values[fob][2], 800.0 / 2500.0));
    }

    #[test]
    fn engagement_with_all_zero_column() {
        let works = vec![w("A", "a", "r", "c", 0, 0, 0, 5)];
        let e = normalized_engagement(&works);
        assert_eq!(e.values[0], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn pearson_basics() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!(approx(r, 1.0));
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!(approx(r, -1.0));
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn words_and_kudos_correlate_in_sample() {
        let ws = sample();
        let r = pearson(&metric_values(&ws, Metric::Words), &metric_values(&ws, Metric::Kudos)).unwrap();
        assert!(r > 0.95);
    }

    #[test]
    fn box_stats_flags_outliers() {
        let b = box_stats("x", &[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!((b.q1, b.median, b.q3), (2.0, 3.0, 4.0));
        assert_eq!(b.low, 1.0);
        assert_eq!(b.high, 4.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert!(box_stats("x", &[]).is_none());
    }

    #[test]
    fn boxes_are_per_topic_sorted() {
        let boxes = boxes_by_topic(&sample(), Metric::Words);
        let labels: Vec<&str> = boxes.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Fall Out Boy", "My Chemical Romance", "Sherlock", "Star Trek"]);
    }

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let h = histogram(&[0.0, 5.0, 10.0], 2).unwrap();
        assert_eq!(h.counts, vec![1, 2]);
        assert_eq!(h.width, 5.0);
        let flat = histogram(&[7.0, 7.0], 50).unwrap();
        assert_eq!(flat.counts[0], 2);
        assert!(histogram(&[], 10).is_none());
    }

    #[test]
    fn top_n_is_stable_and_truncated() {
        let mut works = sample();
        works.push(w("Z", "tie", "r", "c", 0, 300, 0, 0));
        let top = top_n(&works, Metric::Kudos, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].author, "TestAuthor3"); // first 300 in input order
        assert_eq!(top[1].author, "tie");
        assert_eq!(top_n(&works, Metric::Hits, 100).len(), 5);
    }

    #[test]
    fn completion_rate_counts_finished() {
        let mut works = sample();
        works[0].chapters = s!("2/?");
        assert!(approx(completion_rate(&works), 0.75));
        assert_eq!(completion_rate(&[]), 0.0);
    }
}
