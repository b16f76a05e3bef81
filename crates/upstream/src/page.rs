use serde::{Deserialize, Deserializer, Serialize, de::Error};

/// One page of a CourtListener list endpoint, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matches across all pages.
    #[serde(deserialize_with = "deserialize_count")]
    pub count: u64,
    /// URL of the next page.
    pub next: Option<String>,
    /// URL of the previous page.
    pub previous: Option<String>,
    /// The records on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Whether more pages follow.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;

    number
        .as_u64()
        .or_else(|| number.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
        .ok_or_else(|| D::Error::custom(format!("invalid count {number}")))
}
