//! Catalog filtering for list requests (`?search=&genre=`).

use serde::Deserialize;

use crate::movie::Movie;

/// Optional filters applied to the full catalog after it is read.
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilter {
    /// Case-insensitive substring matched against title and plot summary.
    pub search: Option<String>,
    /// Case-insensitive exact match against any genre tag.
    pub genre: Option<String>,
}

impl MovieFilter {
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none() && self.genre_term().is_none()
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        let search_ok = self.search_term().map_or(true, |term| {
            movie.title.to_lowercase().contains(&term)
                || movie.plot_summary.to_lowercase().contains(&term)
        });
        let genre_ok = self
            .genre_term()
            .map_or(true, |term| movie.genre.iter().any(|g| g.to_lowercase() == term));
        search_ok && genre_ok
    }

    /// Keep the movies that match, preserving order.
    pub fn apply(&self, movies: Vec<Movie>) -> Vec<Movie> {
        if self.is_empty() {
            return movies;
        }
        movies.into_iter().filter(|m| self.matches(m)).collect()
    }

    fn search_term(&self) -> Option<String> {
        normalized(self.search.as_deref())
    }

    fn genre_term(&self) -> Option<String> {
        normalized(self.genre.as_deref())
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;

    fn movie(title: &str, plot: &str, genre: &[&str]) -> Movie {
        Movie {
            id: Uuid::now_v7(),
            title: title.to_string(),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            genre: genre.iter().map(|g| g.to_string()).collect(),
            runtime: 100,
            plot_summary: plot.to_string(),
            poster_url: None,
            trailer_url: None,
            rating: 0.0,
            review_count: 0,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<Movie> {
        vec![
            movie("Dune", "A noble family on a desert planet", &["Sci-Fi", "Adventure"]),
            movie("Heat", "A detective hunts a crew of thieves", &["Crime", "Drama"]),
            movie("Arrival", "Linguists meet visitors", &["Sci-Fi", "Drama"]),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = MovieFilter {
            search: Some("  ".into()),
            genre: None,
        };
        assert!(filter.is_empty());
        assert_eq!(filter.apply(catalog()).len(), 3);
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let filter = MovieFilter {
            search: Some("dUNE".into()),
            genre: None,
        };
        let titles: Vec<_> = filter.apply(catalog()).into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Dune"]);
    }

    #[test]
    fn search_matches_plot_summary() {
        let filter = MovieFilter {
            search: Some("thieves".into()),
            genre: None,
        };
        let titles: Vec<_> = filter.apply(catalog()).into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Heat"]);
    }

    #[test]
    fn genre_requires_exact_tag() {
        let filter = MovieFilter {
            search: None,
            genre: Some("sci-fi".into()),
        };
        let titles: Vec<_> = filter.apply(catalog()).into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Dune", "Arrival"]);

        let partial = MovieFilter {
            search: None,
            genre: Some("sci".into()),
        };
        assert!(partial.apply(catalog()).is_empty());
    }

    #[test]
    fn search_and_genre_combine() {
        let filter = MovieFilter {
            search: Some("a".into()),
            genre: Some("Drama".into()),
        };
        let titles: Vec<_> = filter.apply(catalog()).into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Heat", "Arrival"]);
    }
}
