/// Catalog data provider abstraction
///
/// The search coordinator only needs free-text search, so that capability is
/// its own trait. Browse pages (home feed, listings, movie detail) use the
/// wider `CatalogBrowse` trait. A real provider implements both.
use std::fmt::Display;

use crate::{
    error::AppResult,
    models::{Entry, MovieDetails, Video},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Free-text catalog search, as consumed by the search coordinator
#[async_trait::async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Search the catalog by title
    ///
    /// Returns entries in upstream relevance order. The coordinator applies its
    /// own poster filtering and truncation.
    async fn search(&self, query: &str) -> AppResult<Vec<Entry>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Curated catalog listings shown on the browse pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    Trending,
    PopularMovies,
    TopRatedMovies,
    NowPlaying,
    Upcoming,
    PopularTv,
    TopRatedTv,
}

impl Listing {
    /// Upstream path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Listing::Trending => "/trending/all/week",
            Listing::PopularMovies => "/movie/popular",
            Listing::TopRatedMovies => "/movie/top_rated",
            Listing::NowPlaying => "/movie/now_playing",
            Listing::Upcoming => "/movie/upcoming",
            Listing::PopularTv => "/tv/popular",
            Listing::TopRatedTv => "/tv/top_rated",
        }
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Listing::Trending => "trending",
            Listing::PopularMovies => "popular_movies",
            Listing::TopRatedMovies => "top_rated_movies",
            Listing::NowPlaying => "now_playing",
            Listing::Upcoming => "upcoming",
            Listing::PopularTv => "popular_tv",
            Listing::TopRatedTv => "top_rated_tv",
        };
        write!(f, "{}", label)
    }
}

/// Listing and detail lookups for the browse pages
#[async_trait::async_trait]
pub trait CatalogBrowse: Send + Sync {
    /// Fetch the first page of a curated listing
    async fn listing(&self, listing: Listing) -> AppResult<Vec<Entry>>;

    /// Fetch the full record of a movie
    async fn movie_details(&self, id: &str) -> AppResult<MovieDetails>;

    /// Fetch all videos attached to a movie
    async fn movie_videos(&self, id: &str) -> AppResult<Vec<Video>>;
}
