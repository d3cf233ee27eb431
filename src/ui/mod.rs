use crate::models::{MovieDetail, MovieSummary, WatchedRecord};
use crate::omdb::MetadataProvider;
use crate::search::{SearchController, SearchState, SearchStatus};
use crate::store::WatchedStore;
use crate::translate::Translator;
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

mod links;

use links::streaming_links;

/// One line of user input, either a command or fresh query text.
#[derive(Debug, PartialEq)]
enum Input {
    Query(String),
    Open(usize),
    Rate(f32),
    Add,
    Back,
    Remove(String),
    List,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if !line.starts_with('/') {
        return Input::Query(line.to_string());
    }
    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();
    match command {
        "/open" => match arg.parse() {
            Ok(n) => Input::Open(n),
            Err(_) => Input::Unknown(line.to_string()),
        },
        "/rate" => match arg.parse::<f32>() {
            Ok(r) if (1.0..=10.0).contains(&r) => Input::Rate(r),
            _ => Input::Unknown(line.to_string()),
        },
        "/add" => Input::Add,
        "/back" => Input::Back,
        "/rm" if !arg.is_empty() => Input::Remove(arg.to_string()),
        "/list" => Input::List,
        "/help" => Input::Help,
        "/quit" | "/q" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

/// The interactive terminal session. Everything rendered to the screen
/// funnels through here; nothing below this layer prints.
pub struct Session {
    controller: SearchController,
    provider: Arc<dyn MetadataProvider>,
    translator: Translator,
    store: WatchedStore,
    results: Vec<MovieSummary>,
    selected: Option<MovieDetail>,
    pending_rating: Option<f32>,
}

impl Session {
    pub fn new(
        controller: SearchController,
        provider: Arc<dyn MetadataProvider>,
        translator: Translator,
        store: WatchedStore,
    ) -> Self {
        Self {
            controller,
            provider,
            translator,
            store,
            results: Vec::new(),
            selected: None,
            pending_rating: None,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("🍿 popcorn");
        println!("Type to search for a movie. /help lists the commands.");

        let mut search_rx = self.controller.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed, ending session");
                        break;
                    };
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
                changed = search_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = search_rx.borrow_and_update().clone();
                    self.render_search_state(&state);
                }
            }
        }
        Ok(())
    }

    /// Returns false when the session should end.
    async fn handle_line(&mut self, line: &str) -> bool {
        match parse_input(line) {
            Input::Query(query) => self.controller.set_query(&query),
            Input::Open(n) => self.open(n).await,
            Input::Rate(rating) => {
                self.pending_rating = Some(rating);
                println!("Rating set to {}🌟. /add puts the movie on your list.", rating);
            }
            Input::Add => self.add_selected(),
            Input::Back => {
                self.selected = None;
                self.pending_rating = None;
            }
            Input::Remove(id) => self.remove(&id),
            Input::List => self.render_watched(),
            Input::Help => render_help(),
            Input::Quit => return false,
            Input::Unknown(raw) => println!("Unrecognized command: {} (/help for help)", raw),
        }
        true
    }

    fn render_search_state(&mut self, state: &SearchState) {
        if state.is_loading {
            println!("Searching...");
            return;
        }
        match &state.status {
            SearchStatus::Idle => {}
            SearchStatus::Hint(hint) => println!("{}", hint),
            SearchStatus::Failed(message) => println!("❌ {}", message),
            SearchStatus::Results(movies) => {
                self.results = movies.clone();
                println!("{} results", movies.len());
                for (i, movie) in movies.iter().enumerate() {
                    println!("  {:>2}. {} ({})", i + 1, movie.title, movie.year);
                }
                println!("/open <n> shows a movie's details.");
            }
        }
    }

    async fn open(&mut self, n: usize) {
        let Some(summary) = n.checked_sub(1).and_then(|i| self.results.get(i)) else {
            println!("No result number {}. Search first, then /open <n>.", n);
            return;
        };
        println!("Loading...");
        match self.provider.detail(&summary.imdb_id).await {
            Ok(detail) => {
                let plot = self.translator.translate(&detail.plot).await;
                self.render_detail(&detail, &plot);
                self.selected = Some(detail);
                self.pending_rating = None;
            }
            Err(err) => println!("❌ {}", crate::error::messages::for_fetch_error(&err)),
        }
    }

    fn render_detail(&self, detail: &MovieDetail, plot: &str) {
        println!();
        println!("{} ({})", detail.title, detail.year);
        println!("  Released: {}", detail.released);
        if let Some(minutes) = detail.runtime_minutes {
            println!("  Runtime: {} min", minutes);
        }
        println!("  Genre: {}", detail.genre);
        if let Some(rating) = detail.imdb_rating {
            println!("  ⭐ {} IMDb rating", rating);
        }
        println!();
        println!("  Plot: {}", plot);
        if plot != detail.plot {
            println!("  (original) {}", detail.plot);
        }
        println!("  Actors: {}", detail.actors);
        println!("  Director: {}", detail.director);
        println!();
        for (group, platforms) in streaming_links(&detail.title, &detail.year) {
            println!("  {}", group);
            for (name, url) in platforms {
                println!("    {} — {}", name, url);
            }
        }
        println!();
        match self.store.user_rating_for(&detail.imdb_id) {
            Some(rating) => println!("Already on your list (rated {}🌟).", rating),
            None => println!("/rate <1-10> then /add to put it on your watched list."),
        }
    }

    fn add_selected(&mut self) {
        let Some(detail) = &self.selected else {
            println!("Open a movie first: /open <n>.");
            return;
        };
        if self.store.is_watched(&detail.imdb_id) {
            println!("{} is already on your list.", detail.title);
            return;
        }
        let Some(rating) = self.pending_rating else {
            println!("Rate it first: /rate <1-10>.");
            return;
        };
        let record = WatchedRecord::from_detail(detail, rating);
        let title = record.title.clone();
        match self.store.add(record) {
            Ok(()) => println!("Added {} to your watched list.", title),
            Err(err) => println!("❌ Could not save your list: {}", err),
        }
        self.selected = None;
        self.pending_rating = None;
    }

    fn remove(&mut self, imdb_id: &str) {
        match self.store.remove(imdb_id) {
            Ok(true) => println!("Removed {}.", imdb_id),
            Ok(false) => println!("{} is not on your list.", imdb_id),
            Err(err) => println!("❌ Could not save your list: {}", err),
        }
    }

    fn render_watched(&self) {
        let summary = self.store.summary();
        println!("Watched: {} movies", summary.count);
        if let Some(avg) = summary.avg_imdb_rating {
            println!("  ⭐ {:.2} average IMDb rating", avg);
        }
        if let Some(avg) = summary.avg_user_rating {
            println!("  🌟 {:.2} average of your ratings", avg);
        }
        if let Some(avg) = summary.avg_runtime_minutes {
            println!("  ⏳ {:.0} min average runtime", avg);
        }
        for record in self.store.all() {
            println!(
                "  {} ({}) — ⭐ {} / 🌟 {}  [{}]",
                record.title,
                record.year,
                record
                    .imdb_rating
                    .map_or("N/A".to_string(), |r| r.to_string()),
                record.user_rating,
                record.imdb_id
            );
        }
    }
}

fn render_help() {
    println!("Type anything to search (at least a few characters).");
    println!("  /open <n>    open result number n");
    println!("  /rate <1-10> set your rating for the open movie");
    println!("  /add         add the open, rated movie to your list");
    println!("  /back        close the open movie");
    println!("  /list        show your watched list and averages");
    println!("  /rm <imdbID> remove a movie from your list");
    println!("  /quit        leave");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(parse_input("batman begins"), Input::Query("batman begins".into()));
        assert_eq!(parse_input("  ab  "), Input::Query("ab".into()));
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_input("/open 3"), Input::Open(3));
        assert_eq!(parse_input("/rate 8.5"), Input::Rate(8.5));
        assert_eq!(parse_input("/rm tt0133093"), Input::Remove("tt0133093".into()));
        assert_eq!(parse_input("/quit"), Input::Quit);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        assert_eq!(parse_input("/rate 11"), Input::Unknown("/rate 11".into()));
        assert_eq!(parse_input("/rate 0"), Input::Unknown("/rate 0".into()));
    }

    #[test]
    fn bare_slash_commands_with_missing_args_are_unknown() {
        assert_eq!(parse_input("/open x"), Input::Unknown("/open x".into()));
        assert_eq!(parse_input("/rm"), Input::Unknown("/rm".into()));
    }
}
