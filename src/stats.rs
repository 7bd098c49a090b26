use crate::models::Movie;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub median: f64,
}

/// Mean and median of the given ratings, or `None` when there are none.
pub fn summarize(ratings: &[f64]) -> Option<RatingSummary> {
    if ratings.is_empty() {
        return None;
    }
    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some(RatingSummary {
        average,
        median: median(ratings)?,
    })
}

pub fn median(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let mut sorted = ratings.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Best rated first. The sort is stable, so equal ratings keep their order.
pub fn sort_by_rating_desc(mut movies: Vec<Movie>) -> Vec<Movie> {
    movies.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    movies
}

/// Movies whose title contains `query`, ignoring case.
pub fn search<'a>(movies: &'a [Movie], query: &str) -> Vec<&'a Movie> {
    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, rating: f64) -> Movie {
        Movie::new(title, 2000, rating, None)
    }

    #[test]
    fn even_count_summary() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.average, 2.5);
        assert_eq!(s.median, 2.5);
    }

    #[test]
    fn odd_count_median_is_middle() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn empty_has_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn sorts_descending_and_keeps_ties_in_order() {
        let sorted = sort_by_rating_desc(vec![
            movie("a", 3.0),
            movie("b", 9.0),
            movie("c", 1.0),
            movie("d", 3.0),
        ]);
        let titles: Vec<_> = sorted.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["b", "a", "d", "c"]);
    }

    #[test]
    fn search_ignores_case() {
        let movies = vec![movie("The Matrix", 8.7), movie("Inception", 8.8)];
        let hits = search(&movies, "MATRIX");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "The Matrix");
        assert!(search(&movies, "godfather").is_empty());
    }
}
