use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct SearchPayload {
    pub search_term: Option<String>,
}

impl SearchPayload {
    /// Trimmed, lowercased search term; a missing field behaves like an
    /// empty term, which matches every record.
    pub fn term(&self) -> String {
        self.search_term
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

#[derive(Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}
