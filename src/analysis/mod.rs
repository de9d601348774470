// src/analysis/mod.rs
//
// Reads a saved dataset back and turns it into a text report + PNG charts.

pub mod charts;
pub mod report;
pub mod stats;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::options::AnalysisOptions;
use crate::model::Work;

/// What one analysis pass produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Analysis {
    pub report: String,
    pub charts: Vec<PathBuf>,
    /// Set when rendering failed; the report is still complete.
    pub chart_error: Option<String>,
}

/// Report always. A chart failure is logged and recorded in `chart_error`.
pub fn analyze(works: &[Work], opts: &AnalysisOptions) -> Analysis {
    info!("Analyzing {} works", works.len());
    let report = report::full_report(works, opts.top_n);

    match charts::render_all(works, &opts.charts_dir) {
        Ok(charts) => {
            info!("Rendered {} charts into {}", charts.len(), opts.charts_dir.display());
            Analysis { report, charts, chart_error: None }
        }
        Err(e) => {
            warn!("Charts not rendered: {e}");
            Analysis { report, charts: Vec::new(), chart_error: Some(e.to_string()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn works() -> Vec<Work> {
        vec![
            Work { fandom_searched: s!("Sherlock"), title: s!("Pink"), author: s!("a"), kudos: 150, ..Work::default() },
            Work { fandom_searched: s!("Star Trek"), title: s!("Final"), author: s!("b"), kudos: 200, ..Work::default() },
        ]
    }

    #[test]
    fn unwritable_chart_dir_keeps_the_report() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("outputs");
        std::fs::write(&blocker, "not a directory").unwrap();
        let opts = AnalysisOptions { charts_dir: blocker, ..AnalysisOptions::default() };

        let out = analyze(&works(), &opts);
        assert!(out.report.contains("Total Works: 2\n"));
        assert!(out.report.contains("200 kudos - Final by b"));
        assert!(out.charts.is_empty());
        assert!(out.chart_error.is_some_and(|e| e.contains("not a directory")));
    }

    #[test]
    fn empty_input_reports_without_charts() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = AnalysisOptions { charts_dir: tmp.path().join("outputs"), ..AnalysisOptions::default() };
        let out = analyze(&[], &opts);
        assert!(out.report.contains("Total Works: 0\n"));
        assert!(out.charts.is_empty());
        assert_eq!(out.chart_error, None);
    }
}
