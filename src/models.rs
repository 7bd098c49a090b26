use serde::Serialize;

/// A catalog entry. Titles are unique within the store.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: i32, rating: f64, poster: Option<String>) -> Self {
        Self {
            title: title.into(),
            year,
            rating,
            poster,
        }
    }
}
