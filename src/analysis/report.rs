// src/analysis/report.rs
//
// Plain-text report blocks. Returned as strings; the caller decides where they go.

use std::fmt::Write;

use super::stats::{self, Metric, Summary};
use crate::config::consts::TITLE_MAX_CHARS;
use crate::core::sanitize::truncate_chars;
use crate::model::Work;

const RULE: &str = "============================================================";

/// 1234567.6 → "1,234,568"
pub fn thousands(v: f64) -> String {
    let n = v.round();
    let neg = n < 0.0;
    let digits = format!("{:.0}", n.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if neg { join!("-", &out) } else { out }
}

pub fn summary_block(s: &Summary) -> String {
    let mut out = s!();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "FANFICTION DATASET SUMMARY");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Total Works: {}", s.total_works);
    let _ = writeln!(out, "Unique Authors: {}", s.unique_authors);
    let _ = writeln!(out, "Total Words: {}", thousands(s.total_words as f64));
    let _ = writeln!(out);
    let _ = writeln!(out, "Average Word Count: {}", thousands(s.avg_words));
    let _ = writeln!(out, "Median Word Count: {}", thousands(s.median_words));
    let _ = writeln!(out);
    let _ = writeln!(out, "Average Kudos: {:.1}", s.avg_kudos);
    let _ = writeln!(out, "Median Kudos: {:.1}", s.median_kudos);
    let _ = writeln!(out);
    let _ = writeln!(out, "Average Hits: {}", thousands(s.avg_hits));
    let _ = writeln!(out, "Complete Works: {:.1}%", s.completion_rate * 100.0);
    let _ = writeln!(out);
    let _ = writeln!(out, "Works by Fandom:");
    for (topic, count) in &s.by_topic {
        let _ = writeln!(out, "  {topic}: {count}");
    }
    let _ = writeln!(out, "{RULE}");
    out
}

/// "Top N" lists by kudos, hits and length.
pub fn top_works_block(works: &[Work], n: usize) -> String {
    let mut out = s!();
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "TOP {n} WORKS");
    let _ = writeln!(out, "{RULE}");

    let sections: [(&str, Metric, usize); 3] = [
        ("by Kudos", Metric::Kudos, 6),
        ("by Hits", Metric::Hits, 7),
        ("Longest Works", Metric::Words, 8),
    ];
    for (heading, metric, width) in sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top {n} {heading}:");
        for w in stats::top_n(works, metric, n) {
            let _ = writeln!(
                out,
                "  {:>width$} {} - {} by {}",
                metric.of(w),
                metric.label(),
                truncate_chars(&w.title, TITLE_MAX_CHARS),
                w.author,
            );
        }
    }
    out
}

/// Both blocks, as printed by `analyze`.
pub fn full_report(works: &[Work], top: usize) -> String {
    let mut out = summary_block(&stats::summary(works));
    out.push_str(&top_works_block(works, top));
    out
}
