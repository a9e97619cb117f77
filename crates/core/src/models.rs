use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One corpus entry. `index` is the position in the original corpus and is
/// the tie-break key during ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub index: usize,
    pub text: String,
}

impl Document {
    pub fn new(index: usize, text: &str) -> Self {
        Self {
            index,
            text: text.trim().to_string(),
        }
    }

    /// Build documents from corpus lines, dropping blank and
    /// whitespace-only lines. Indices count surviving documents.
    pub fn from_lines<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> Vec<Document> {
        lines
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .enumerate()
            .map(|(i, l)| Document::new(i, l))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
}

impl Query {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
        }
    }
}

/// A fixed-length vector tagged with the model that produced it.
/// Vectors from different models are never compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub model: String,
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(model: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            model: model.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub document: Document,
    /// Full-precision cosine similarity; rounding happens at report time.
    pub score: f64,
}

/// A corpus entry that could not be scored, with a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub document: Document,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct RankedResult {
    pub results: Vec<ScoredCandidate>,
    pub skipped: Vec<SkippedDocument>,
    pub generated_at: DateTime<Utc>,
}

impl RankedResult {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            skipped: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lines_filters_blank_lines() {
        let docs = Document::from_lines(["first\n", "   \n", "", "  second  "]);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "first");
        assert_eq!(docs[0].index, 0);
        assert_eq!(docs[1].text, "second");
        assert_eq!(docs[1].index, 1);
    }
}
