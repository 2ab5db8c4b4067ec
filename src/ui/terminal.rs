use std::sync::Arc;

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
    time::Instant,
};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{image_url, Entry, ImageSize},
    services::{
        feed::{load_listing, HomeFeed},
        player::{MovieView, SourceCarousel},
        providers::{Listing, TmdbProvider},
        search::SearchSnapshot,
        session::{SearchHandle, SearchSession},
    },
    ui::pointer::{Point, PointerListeners, Rect},
};

/// Screen area of the search box and its dropdown
const SEARCH_REGION: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 8,
};

/// A press well below the search widget
const OUTSIDE_POINT: Point = Point { x: 0, y: 24 };

const HELP: &str = "\
text          type into the search box
/focus        focus the search box
/blur         click outside the search box
/click X Y    click at a screen position
/clear        clear the search box
/submit       search for the current text
/pick N       choose suggestion N
/home         trending and top lists
/movies       now playing
/tv           popular TV shows
/movie ID     movie details and trailers
/next /prev   switch embed source
/quit         exit";

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Type(String),
    Focus,
    Click(Point),
    Clear,
    Submit,
    Pick(usize),
    Home,
    Movies,
    Tv,
    Movie(String),
    NextSource,
    PreviousSource,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> AppResult<Self> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Type(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let command = match (name, args.as_slice()) {
            ("focus", []) => Command::Focus,
            ("blur", []) => Command::Click(OUTSIDE_POINT),
            ("click", [x, y]) => Command::Click(Point::new(parse_arg(x)?, parse_arg(y)?)),
            ("clear", []) => Command::Clear,
            ("submit", []) => Command::Submit,
            ("pick", [n]) => Command::Pick(parse_arg(n)?),
            ("home", []) => Command::Home,
            ("movies", []) => Command::Movies,
            ("tv", []) => Command::Tv,
            ("movie", [id]) => Command::Movie(id.to_string()),
            ("next", []) => Command::NextSource,
            ("prev", []) => Command::PreviousSource,
            ("help", []) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "Unknown command: {}",
                    line.trim()
                )))
            }
        };

        Ok(command)
    }
}

fn parse_arg<T: std::str::FromStr>(raw: &str) -> AppResult<T> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid argument: {}", raw)))
}

/// Renders an entry as a single line
pub fn format_entry(entry: &Entry, image_base: &str) -> String {
    let mut line = entry.title.clone();
    if let Some(year) = entry.release_year() {
        line.push_str(&format!(" ({})", year));
    }
    if let Some(path) = entry.poster_path.as_deref().filter(|p| !p.is_empty()) {
        line.push_str(&format!(" {}", image_url(image_base, path, ImageSize::W92)));
    }
    line
}

/// Line-oriented front-end driving the library
pub struct Terminal {
    config: Config,
    catalog: Arc<TmdbProvider>,
    pointer: PointerListeners,
    search: SearchHandle,
    carousel: SourceCarousel,
    current_movie: Option<String>,
    started: Instant,
}

impl Terminal {
    pub fn new(config: Config) -> Self {
        let catalog = Arc::new(TmdbProvider::from_config(&config));
        let pointer = PointerListeners::new();
        let search = SearchSession::spawn(
            catalog.clone(),
            config.search_settings(),
            &pointer,
            SEARCH_REGION,
        );
        let carousel = SourceCarousel::new(config.embed_sources.clone());

        Self {
            config,
            catalog,
            pointer,
            search,
            carousel,
            current_movie: None,
            started: Instant::now(),
        }
    }

    /// Reads commands from stdin until `/quit` or end of input
    pub async fn run(mut self) -> anyhow::Result<()> {
        let printer = tokio::spawn(print_updates(
            self.search.subscribe(),
            self.config.tmdb_image_url.clone(),
        ));

        println!("{}", HELP);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if let Err(e) = self.execute(command).await {
                        println!("{}", e);
                    }
                }
                Err(e) => println!("{}", e),
            }
        }

        printer.abort();
        self.search.shutdown().await;
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> AppResult<()> {
        match command {
            Command::Type(text) => self.search.type_text(text),
            Command::Focus => self.search.focus(),
            Command::Click(point) => self.pointer.dispatch(point),
            Command::Clear => self.search.clear(),
            Command::Submit => self.search.submit(),
            Command::Pick(n) => {
                let snapshot = self.search.snapshot();
                let entry = n
                    .checked_sub(1)
                    .and_then(|i| snapshot.suggestions.get(i))
                    .cloned()
                    .ok_or_else(|| AppError::InvalidInput(format!("No suggestion {}", n)))?;
                self.search.pick(entry);
            }
            Command::Home => self.print_home().await?,
            Command::Movies => self.print_listing(Listing::NowPlaying, "Now Playing Movies").await?,
            Command::Tv => self.print_listing(Listing::PopularTv, "Popular TV Shows").await?,
            Command::Movie(id) => self.print_movie(&id).await?,
            Command::NextSource => {
                self.carousel.next();
                self.print_source();
            }
            Command::PreviousSource => {
                self.carousel.previous();
                self.print_source();
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }

        Ok(())
    }

    async fn print_home(&self) -> AppResult<()> {
        let feed = HomeFeed::load(self.catalog.as_ref()).await?;
        let slideshow = feed.slideshow(self.config.slide_interval());

        if let Some(hero) = feed.trending.get(slideshow.position_at(self.started.elapsed())) {
            println!("Featured: {}", hero.title);
            if let Some(overview) = &hero.overview {
                println!("  {}", overview);
            }
        }

        for (heading, shelf) in [
            ("Top Rated Movies", &feed.top_rated),
            ("Upcoming Movies", &feed.upcoming),
            ("Top Rated TV Shows", &feed.top_shows),
        ] {
            println!("{}", heading);
            for entry in shelf {
                println!("  [{}] {}", entry.id, entry.title);
            }
        }

        Ok(())
    }

    async fn print_listing(&self, listing: Listing, heading: &str) -> AppResult<()> {
        let entries = load_listing(self.catalog.as_ref(), listing).await?;
        println!("{}", heading);
        for entry in &entries {
            println!("  [{}] {}", entry.id, format_entry(entry, &self.config.tmdb_image_url));
        }
        Ok(())
    }

    async fn print_movie(&mut self, id: &str) -> AppResult<()> {
        let view = MovieView::load(self.catalog.as_ref(), id).await?;
        let details = &view.details;

        println!("{}", details.title);
        println!("  {}", details.overview);
        if let Some(date) = &details.release_date {
            println!("  Release Date: {}", date);
        }
        println!("  Rating: {}", details.rating_label());
        if let Some(runtime) = details.runtime {
            println!("  Runtime: {} minutes", runtime);
        }
        if let Some(backdrop) = &details.backdrop_path {
            println!(
                "  Backdrop: {}",
                image_url(&self.config.tmdb_image_url, backdrop, ImageSize::Original)
            );
        }
        for video in &view.trailers {
            println!("  {} ({}): {}", video.name, video.video_type, video.embed_url());
        }

        self.current_movie = Some(id.trim().to_string());
        self.print_source();
        Ok(())
    }

    fn print_source(&self) {
        let Some(movie_id) = &self.current_movie else {
            println!("Open a movie first");
            return;
        };

        match self.carousel.embed_url(movie_id) {
            Some(url) => println!("{}: {}", self.carousel.label(), url),
            None => println!("No embed sources configured"),
        }
    }
}

/// Prints dropdown and result changes as the search session publishes them
async fn print_updates(mut state: watch::Receiver<SearchSnapshot>, image_base: String) {
    let mut shown: Vec<u64> = Vec::new();
    let mut was_loading = false;

    while state.changed().await.is_ok() {
        let snapshot = state.borrow_and_update().clone();

        let dropdown: Vec<u64> = if snapshot.dropdown_open() {
            snapshot.suggestions.iter().map(|e| e.id).collect()
        } else {
            Vec::new()
        };
        if dropdown != shown {
            if !dropdown.is_empty() {
                for (i, entry) in snapshot.suggestions.iter().enumerate() {
                    println!("  {}. {}", i + 1, format_entry(entry, &image_base));
                }
            }
            shown = dropdown;
        }

        if snapshot.loading {
            if !was_loading {
                println!("Searching...");
            }
        } else if was_loading {
            print_results(&snapshot, &image_base);
        }
        was_loading = snapshot.loading;
    }
}

fn print_results(snapshot: &SearchSnapshot, image_base: &str) {
    if let Some(error) = &snapshot.error {
        println!("{}", error);
    } else if snapshot.is_empty_result() {
        println!("No movies found for \"{}\"", snapshot.query);
    } else {
        println!("Search Results");
        for entry in &snapshot.results {
            println!("  [{}] {}", entry.id, format_entry(entry, image_base));
        }
    }
}
