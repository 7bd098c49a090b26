use crate::models::Movie;
use crate::omdb::{FetchError, MovieLookup};
use crate::prompt::{InputClosed, Prompter};
use crate::stats;
use crate::storage::MovieStore;
use crate::website::{self, SiteOptions, WebsiteError};
use anyhow::Result;
use console::style;
use rand::seq::IndexedRandom;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, error, info};

const BANNER: &str = "********** My Movies App: SQL + API + HTML **********";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    Sorted,
    GenerateWebsite,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::Exit,
        Command::List,
        Command::Add,
        Command::Delete,
        Command::Update,
        Command::Stats,
        Command::Random,
        Command::Search,
        Command::Sorted,
        Command::GenerateWebsite,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Command::Exit => "0",
            Command::List => "1",
            Command::Add => "2",
            Command::Delete => "3",
            Command::Update => "4",
            Command::Stats => "5",
            Command::Random => "6",
            Command::Search => "7",
            Command::Sorted => "8",
            Command::GenerateWebsite => "9",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::Exit => "Exit",
            Command::List => "List movies",
            Command::Add => "Add movie (API)",
            Command::Delete => "Delete movie",
            Command::Update => "Update movie",
            Command::Stats => "Stats",
            Command::Random => "Random movie",
            Command::Search => "Search movie",
            Command::Sorted => "Sorted by rating",
            Command::GenerateWebsite => "Generate website",
        }
    }

    pub fn from_key(input: &str) -> Option<Command> {
        let key = input.trim();
        Command::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Menu-driven controller over an injected store and lookup client.
pub struct App<R, W> {
    store: MovieStore,
    lookup: Arc<dyn MovieLookup>,
    site: SiteOptions,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(
        store: MovieStore,
        lookup: Arc<dyn MovieLookup>,
        site: SiteOptions,
        prompter: Prompter<R, W>,
    ) -> Self {
        Self {
            store,
            lookup,
            site,
            prompter,
        }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// Read-eval loop. Returns on the exit command or when input closes.
    pub async fn run(&mut self) -> Result<()> {
        self.prompter.say(style(BANNER).bold())?;
        loop {
            self.print_menu()?;
            let choice = match self.prompter.line("\nEnter choice: ") {
                Ok(choice) => choice,
                Err(e) if e.is::<InputClosed>() => return self.closed(),
                Err(e) => return Err(e),
            };

            let Some(command) = Command::from_key(&choice) else {
                self.prompter.say(style("Invalid choice.").red())?;
                continue;
            };
            if command == Command::Exit {
                self.prompter.say("Bye!")?;
                return Ok(());
            }

            debug!("Running {:?}", command);
            match self.execute(command).await {
                Ok(()) => {}
                Err(e) if e.is::<InputClosed>() => return self.closed(),
                Err(e) => {
                    error!("{:?} failed: {:#}", command, e);
                    self.prompter.say(format!("Error: {:#}", e))?;
                }
            }

            match self.prompter.line("\nPress Enter to continue...") {
                Ok(_) => {}
                Err(e) if e.is::<InputClosed>() => return self.closed(),
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Exit => Ok(()),
            Command::List => self.list_movies(),
            Command::Add => self.add_movie().await,
            Command::Delete => self.delete_movie(),
            Command::Update => self.update_movie(),
            Command::Stats => self.statistics(),
            Command::Random => self.random_movie(),
            Command::Search => self.search_movies(),
            Command::Sorted => self.sorted_movies(),
            Command::GenerateWebsite => self.generate_website(),
        }
    }

    fn closed(&mut self) -> Result<()> {
        info!("Input closed, leaving");
        self.prompter.say("")?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        self.prompter.say(style("\nMenu:").cyan())?;
        for command in Command::ALL {
            self.prompter
                .say(format!("{}. {}", command.key(), command.label()))?;
        }
        Ok(())
    }

    fn list_movies(&mut self) -> Result<()> {
        let movies = self.store.list_all()?;
        self.prompter
            .say(format!("\n{} movies in total", movies.len()))?;
        for movie in &movies {
            self.prompter.say(format!(
                "{} ({}): Rating {}",
                movie.title,
                movie.year,
                fmt_rating(movie.rating)
            ))?;
        }
        Ok(())
    }

    async fn add_movie(&mut self) -> Result<()> {
        let query = self.prompter.nonempty("Enter movie name to add: ")?;
        let movie = match self.lookup.fetch(&query).await {
            Ok(movie) => movie,
            Err(e) => return self.report_fetch_error(e),
        };

        if self.store.add(&movie)? {
            info!("Added '{}' ({})", movie.title, movie.year);
            self.prompter.say(style(format!(
                "Successfully added: {} ({})",
                movie.title, movie.year
            ))
            .green())?;
        } else {
            self.prompter.say(format!(
                "Movie '{}' is already in the database.",
                movie.title
            ))?;
        }
        Ok(())
    }

    fn report_fetch_error(&mut self, err: FetchError) -> Result<()> {
        let message = match &err {
            FetchError::Service(msg) => format!("API Error: {}", msg),
            FetchError::Connection(_) => {
                "Error: Could not connect to the API. Check your internet connection.".to_string()
            }
            FetchError::Status(code) => format!("API Error: service responded with HTTP {}", code),
            FetchError::Parse(detail) => {
                format!("Error: Unexpected response from the API ({})", detail)
            }
        };
        self.prompter.say(style(message).red())
    }

    fn delete_movie(&mut self) -> Result<()> {
        let title = self.prompter.nonempty("Enter movie name to delete: ")?;
        if self.store.delete(&title)? {
            self.prompter.say(format!("Movie '{}' deleted.", title))
        } else {
            self.prompter.say(format!("Movie '{}' not found.", title))
        }
    }

    fn update_movie(&mut self) -> Result<()> {
        let title = self.prompter.nonempty("Enter movie name to update: ")?;
        let movies = self.store.list_all()?;
        if !movies.iter().any(|m| m.title == title) {
            return self.prompter.say(format!("Movie '{}' not found.", title));
        }

        let rating = self.prompter.rating("Enter new rating (0-10): ")?;
        if self.store.update_rating(&title, rating)? {
            self.prompter.say(format!("Movie '{}' updated.", title))
        } else {
            // Removed between the listing and the update.
            self.prompter.say(format!("Movie '{}' not found.", title))
        }
    }

    fn statistics(&mut self) -> Result<()> {
        let ratings: Vec<f64> = self.store.list_all()?.iter().map(|m| m.rating).collect();
        let Some(summary) = stats::summarize(&ratings) else {
            return self.prompter.say("Database is empty.");
        };
        self.prompter.say("\n--- Statistics ---")?;
        self.prompter
            .say(format!("Average Rating: {:.2}", summary.average))?;
        self.prompter
            .say(format!("Median Rating: {:.2}", summary.median))
    }

    fn random_movie(&mut self) -> Result<()> {
        let movies = self.store.list_all()?;
        let Some(movie) = movies.choose(&mut rand::rng()) else {
            return self.prompter.say("No movies available.");
        };
        self.prompter.say(format!(
            "Your movie for tonight: {} ({}) - Rating: {}",
            movie.title,
            movie.year,
            fmt_rating(movie.rating)
        ))
    }

    fn search_movies(&mut self) -> Result<()> {
        let query = self.prompter.nonempty("Search for: ")?;
        let movies = self.store.list_all()?;
        let hits = stats::search(&movies, &query);
        if hits.is_empty() {
            return self.prompter.say("No matches found.");
        }
        for movie in hits {
            self.prompter.say(short_line(movie))?;
        }
        Ok(())
    }

    fn sorted_movies(&mut self) -> Result<()> {
        let movies = self.store.list_all()?;
        if movies.is_empty() {
            return self.prompter.say("No movies in database.");
        }
        self.prompter.say("\nMovies sorted by rating (best first):")?;
        for movie in &stats::sort_by_rating_desc(movies) {
            self.prompter.say(short_line(movie))?;
        }
        Ok(())
    }

    fn generate_website(&mut self) -> Result<()> {
        let movies = self.store.list_all()?;
        let site = &self.site;
        match website::generate(&site.template_path, &site.output_path, &site.title, &movies) {
            Ok(()) => self.prompter.say("Website was generated successfully."),
            Err(WebsiteError::TemplateMissing(path)) => self
                .prompter
                .say(style(format!("Error: {} not found.", path.display())).red()),
            Err(e) => Err(e.into()),
        }
    }
}

fn short_line(movie: &Movie) -> String {
    format!(
        "{} ({}): {}",
        movie.title,
        movie.year,
        fmt_rating(movie.rating)
    )
}

/// Always show at least one decimal ("9.0", "7.25").
fn fmt_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}
