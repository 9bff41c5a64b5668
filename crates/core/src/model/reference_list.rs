use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReferenceListResponse {
    #[serde(default)]
    pub lines: Vec<String>,
}

impl ReferenceListResponse {
    /// Trimmed, non-empty lines in their original order.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
            .into_iter()
            .filter_map(|line| {
                let trimmed = line.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect()
    }
}
