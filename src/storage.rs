//! SQLite-backed persistence for the catalog.
//!
//! Every operation opens its own connection and drops it before returning,
//! so nothing stays open while the menu waits on the user.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::Movie;

const CREATE_MOVIES: &str = "
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT UNIQUE NOT NULL,
        year INTEGER NOT NULL,
        rating REAL NOT NULL,
        poster TEXT
    )";

#[derive(Debug, Clone)]
pub struct MovieStore {
    path: PathBuf,
}

impl MovieStore {
    /// Open (or create) the database file at `path` and make sure the
    /// `movies` table exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let store = Self { path };
        store.init()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_MOVIES)
            .context("Failed to create movies table")?;
        Ok(())
    }

    /// All movies in insertion order.
    pub fn list_all(&self) -> Result<Vec<Movie>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT title, year, rating, poster FROM movies ORDER BY id")
            .context("Failed to prepare movie listing")?;
        let movies = stmt
            .query_map([], row_to_movie)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read movies")?;
        debug!("Loaded {} movies from {}", movies.len(), self.path.display());
        Ok(movies)
    }

    pub fn get(&self, title: &str) -> Result<Option<Movie>> {
        let conn = self.connect()?;
        let movie = conn
            .query_row(
                "SELECT title, year, rating, poster FROM movies WHERE title = ?1",
                params![title],
                row_to_movie,
            )
            .optional()
            .with_context(|| format!("Failed to look up '{}'", title))?;
        Ok(movie)
    }

    /// Insert a movie. Returns `Ok(false)` when the title already exists;
    /// the duplicate is logged and nothing is written.
    pub fn add(&self, movie: &Movie) -> Result<bool> {
        let conn = self.connect()?;
        let res = conn.execute(
            "INSERT INTO movies (title, year, rating, poster) VALUES (?1, ?2, ?3, ?4)",
            params![movie.title, movie.year, movie.rating, movie.poster],
        );
        match res {
            Ok(_) => {
                debug!("Inserted '{}' ({})", movie.title, movie.year);
                Ok(true)
            }
            Err(rusqlite::Error::SqliteFailure(e, msg))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                warn!(
                    "Database error adding '{}': {}",
                    movie.title,
                    msg.unwrap_or_else(|| e.to_string())
                );
                Ok(false)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to insert '{}'", movie.title)),
        }
    }

    pub fn delete(&self, title: &str) -> Result<bool> {
        let conn = self.connect()?;
        let removed = conn
            .execute("DELETE FROM movies WHERE title = ?1", params![title])
            .with_context(|| format!("Failed to delete '{}'", title))?;
        debug!("Delete '{}' removed {} row(s)", title, removed);
        Ok(removed > 0)
    }

    pub fn update_rating(&self, title: &str, rating: f64) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn
            .execute(
                "UPDATE movies SET rating = ?1 WHERE title = ?2",
                params![rating, title],
            )
            .with_context(|| format!("Failed to update '{}'", title))?;
        debug!("Update '{}' -> {} changed {} row(s)", title, rating, changed);
        Ok(changed > 0)
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path)
            .with_context(|| format!("Failed to open database {}", self.path.display()))
    }
}

fn row_to_movie(row: &rusqlite::Row<'_>) -> rusqlite::Result<Movie> {
    Ok(Movie {
        title: row.get(0)?,
        year: row.get(1)?,
        rating: row.get(2)?,
        poster: row.get(3)?,
    })
}
