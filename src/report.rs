//! Plain-text rendering of corpus listings and similarity results.

use std::fmt::Write;

use matcher::{AveragedSimilarity, Similarity};

use crate::ScanHit;

const BANNER_WIDTH: usize = 85;
const BAR_CELLS: usize = 10;
const NAME_COLUMN: usize = 15;

/// Boxed banner listing the documents available for comparison.
pub fn render_listing(names: &[String]) -> String {
    let mut out = String::new();
    let border = "*".repeat(BANNER_WIDTH);
    let _ = writeln!(out, "{border}");
    let _ = writeln!(out, "{}", boxed_line("Documents available to compare"));
    for name in names {
        let _ = writeln!(out, "{}", boxed_line(name));
    }
    let _ = writeln!(out, "{border}");
    out
}

fn boxed_line(text: &str) -> String {
    let inner = BANNER_WIDTH - 2;
    let len = text.chars().count();
    let left = (inner / 2).saturating_sub(len / 2);
    let right = inner.saturating_sub(left + len);
    format!("*{}{}{}*", " ".repeat(left), text, " ".repeat(right))
}

/// The matching / calculated minimums fraction of one comparison.
pub fn render_similarity(sim: &Similarity) -> String {
    format!(
        "Result:\n\
         \x20                           matching minimums         {:.1}\n\
         \x20          Similarity =   ---------------------  =  -------  = {:.2}\n\
         \x20                         # calculated minimums       {:.1}\n",
        sim.matches as f64, sim.score, sim.permutations as f64
    )
}

/// Per-run scores followed by their mean.
pub fn render_average(avg: &AveragedSimilarity) -> String {
    let mut out = String::new();
    for report in &avg.runs {
        let _ = writeln!(out, "* Run {}: {:.2}", report.run, report.similarity.score);
    }
    let _ = writeln!(
        out,
        "Average of all {} rounds: {:.2}",
        avg.runs.len(),
        avg.mean
    );
    out
}

/// Ten-cell `#` bar for a score in `[0, 1]`, one cell per full tenth.
pub fn similarity_bar(score: f64) -> (String, usize) {
    let tenths = ((score.clamp(0.0, 1.0) * 100.0) as usize / 10).min(BAR_CELLS);
    let bar = format!("{}{}", "#".repeat(tenths), " ".repeat(BAR_CELLS - tenths));
    (bar, tenths)
}

/// One bar line per scanned document.
pub fn render_scan(hits: &[ScanHit]) -> String {
    let mut out = String::new();
    for hit in hits {
        let pad = " ".repeat(NAME_COLUMN.saturating_sub(hit.name.chars().count()));
        match &hit.outcome {
            Ok(sim) => {
                let (bar, tenths) = similarity_bar(sim.score);
                let _ = writeln!(
                    out,
                    "File: {}{pad}[{bar}]    ({tenths}/{BAR_CELLS})",
                    hit.name
                );
            }
            Err(err) => {
                let _ = writeln!(out, "File: {}{pad}skipped: {err}", hit.name);
            }
        }
    }
    out
}
