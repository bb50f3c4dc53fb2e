/// Output formatting: terminal ranking, JSON, and label shortening.
use insertrank_core::Item;
use serde::Serialize;
use std::io::{self, Write};

/// Marker appended to labels that had to be shortened.
const ELLIPSIS: &str = "...";

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    id: i64,
    title: &'a str,
    prior_score: Option<f64>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    items: Vec<JsonRankedItem<'a>>,
    total_comparisons: usize,
    complete: bool,
}

/// Shorten `text` to at most `max_chars` characters, ending in "..." when cut.
///
/// Widths smaller than the ellipsis itself yield just the ellipsis.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.chars().count());
    let prefix: String = text.chars().take(keep).collect();
    format!("{}{ELLIPSIS}", prefix.trim_end())
}

/// Write the ranking, best first, 1-indexed.
pub fn write_table(out: &mut impl Write, ranking: &[Item], total_comparisons: usize, complete: bool) -> io::Result<()> {
    let heading = if complete {
        "Final Ranking (Best to Worst):"
    } else {
        "Partial Ranking (Best to Worst):"
    };
    writeln!(out, "{heading}\n")?;

    let rank_width = ranking.len().to_string().len();
    for (i, item) in ranking.iter().enumerate() {
        let score = item
            .prior_score
            .map(|s| format!("  [prior {s}]"))
            .unwrap_or_default();
        writeln!(out, "{:>rank_width$}. {}{}", i + 1, item.title, score)?;
    }

    writeln!(out, "\n{} items ranked with {} comparisons", ranking.len(), total_comparisons)
}

pub fn print_table(ranking: &[Item], total_comparisons: usize, complete: bool) {
    let stdout = io::stdout();
    if let Err(e) = write_table(&mut stdout.lock(), ranking, total_comparisons, complete) {
        tracing::error!("failed to write ranking: {e}");
    }
}

fn to_json(ranking: &[Item], total_comparisons: usize, complete: bool) -> serde_json::Result<String> {
    let items = ranking
        .iter()
        .enumerate()
        .map(|(i, item)| JsonRankedItem {
            rank: i + 1,
            id: item.id,
            title: &item.title,
            prior_score: item.prior_score,
        })
        .collect();

    serde_json::to_string_pretty(&JsonOutput {
        items,
        total_comparisons,
        complete,
    })
}

pub fn print_json(ranking: &[Item], total_comparisons: usize, complete: bool) {
    match to_json(ranking, total_comparisons, complete) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("failed to serialize ranking: {e}"),
    }
}
