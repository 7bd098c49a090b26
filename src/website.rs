//! Static gallery generation from an HTML template.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::models::Movie;

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

/// Where the gallery template lives, where the page goes, and its heading.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum WebsiteError {
    #[error("{} not found", .0.display())]
    TemplateMissing(PathBuf),
    #[error("website I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// One `<li>` block per movie, in the given order.
pub fn movie_grid(movies: &[Movie]) -> String {
    let mut html = String::new();
    for movie in movies {
        let title = escape_html(&movie.title);
        let poster = escape_html(movie.poster.as_deref().unwrap_or_default());
        html.push_str("<li>\n  <div class=\"movie\">\n");
        html.push_str(&format!(
            "    <img class=\"movie-poster\" src=\"{}\" alt=\"{} poster\"/>\n",
            poster, title
        ));
        html.push_str(&format!("    <div class=\"movie-title\">{}</div>\n", title));
        html.push_str(&format!("    <div class=\"movie-year\">{}</div>\n", movie.year));
        html.push_str("  </div>\n</li>\n");
    }
    html
}

/// Fill both placeholders in one pass over the template, so tokens that
/// appear inside the substituted text are left as they are.
pub fn render_page(template: &str, site_title: &str, movies: &[Movie]) -> String {
    let title = escape_html(site_title);
    let grid = movie_grid(movies);
    let mut page = String::with_capacity(template.len() + grid.len());
    let mut rest = template;
    loop {
        let next = [(TITLE_PLACEHOLDER, &title), (GRID_PLACEHOLDER, &grid)]
            .into_iter()
            .filter_map(|(token, value)| rest.find(token).map(|at| (at, token, value)))
            .min_by_key(|(at, _, _)| *at);
        let Some((at, token, value)) = next else {
            page.push_str(rest);
            return page;
        };
        page.push_str(&rest[..at]);
        page.push_str(value);
        rest = &rest[at + token.len()..];
    }
}

/// Render `template_path` into `output_path`. A missing template leaves the
/// output untouched.
pub fn generate(
    template_path: &Path,
    output_path: &Path,
    site_title: &str,
    movies: &[Movie],
) -> Result<(), WebsiteError> {
    let template = match fs::read_to_string(template_path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(WebsiteError::TemplateMissing(template_path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    fs::write(output_path, render_page(&template, site_title, movies))?;
    info!(
        "Wrote {} movies to {}",
        movies.len(),
        output_path.display()
    );
    Ok(())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<html><head><title>__TEMPLATE_TITLE__</title></head>\
        <body><h1>__TEMPLATE_TITLE__</h1><ol>__TEMPLATE_MOVIE_GRID__</ol></body></html>";

    fn movies() -> Vec<Movie> {
        vec![
            Movie::new("Alien", 1979, 8.5, Some("https://example.com/alien.jpg".into())),
            Movie::new("Heat", 1995, 8.3, None),
        ]
    }

    #[test]
    fn page_has_one_block_per_movie_and_no_placeholders() {
        let page = render_page(TEMPLATE, "My Movies Database", &movies());
        assert_eq!(page.matches("<li>").count(), 2);
        assert!(!page.contains(TITLE_PLACEHOLDER));
        assert!(!page.contains(GRID_PLACEHOLDER));
        assert!(page.contains("<title>My Movies Database</title>"));
        assert!(page.contains("src=\"https://example.com/alien.jpg\""));
        assert!(page.contains("<div class=\"movie-year\">1995</div>"));
    }

    #[test]
    fn placeholder_tokens_in_values_are_not_expanded() {
        let page = render_page(
            TEMPLATE,
            "Grid __TEMPLATE_MOVIE_GRID__",
            &[Movie::new("__TEMPLATE_TITLE__", 2000, 5.0, None)],
        );
        assert_eq!(page.matches("<li>").count(), 1);
        assert!(page.contains("<title>Grid __TEMPLATE_MOVIE_GRID__</title>"));
        assert!(page.contains("<div class=\"movie-title\">__TEMPLATE_TITLE__</div>"));
    }

    #[test]
    fn titles_are_escaped() {
        let grid = movie_grid(&[Movie::new("Tom & Jerry <1>", 1992, 5.0, None)]);
        assert!(grid.contains("Tom &amp; Jerry &lt;1&gt;"));
    }

    #[test]
    fn generate_writes_output() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("index_template.html");
        let output = dir.path().join("index.html");
        fs::write(&template, TEMPLATE).unwrap();

        generate(&template, &output, "Films", &movies()).unwrap();
        let page = fs::read_to_string(&output).unwrap();
        assert_eq!(page.matches("<li>").count(), 2);
    }

    #[test]
    fn missing_template_leaves_previous_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("index.html");
        fs::write(&output, "previous").unwrap();

        let err = generate(&dir.path().join("nope.html"), &output, "Films", &movies())
            .unwrap_err();
        assert!(matches!(err, WebsiteError::TemplateMissing(_)));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }
}
