//! External renderings of a ranked result: a JSON payload and a
//! human-readable listing. Scores are rounded to three decimals here and
//! nowhere else; ranking always uses full precision.

use crate::models::RankedResult;
use serde_json::json;

pub fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

pub fn to_json(result: &RankedResult) -> serde_json::Value {
    json!({
        "date": result.generated_at.format("%Y-%m-%d").to_string(),
        "results": result
            .results
            .iter()
            .map(|r| json!({
                "document": r.document.text,
                "similarity": round3(r.score),
            }))
            .collect::<Vec<_>>(),
        "skipped": result
            .skipped
            .iter()
            .map(|s| json!({
                "document": s.document.text,
                "reason": s.reason,
            }))
            .collect::<Vec<_>>(),
    })
}

pub fn render_text(result: &RankedResult) -> String {
    let mut out = String::from("Retrieved Context\n");
    out.push_str(&"=".repeat(40));
    out.push_str("\n\n");
    for r in &result.results {
        out.push_str(&format!("Score: {} — {}\n", round3(r.score), r.document.text));
    }
    if !result.skipped.is_empty() {
        out.push('\n');
        out.push_str("Skipped\n");
        for s in &result.skipped {
            out.push_str(&format!("{} ({})\n", s.document.text, s.reason));
        }
    }
    out
}
