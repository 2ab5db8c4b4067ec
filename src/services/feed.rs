use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::Entry,
    services::providers::{CatalogBrowse, Listing},
};

pub const FEED_FAILED_MESSAGE: &str = "Failed to fetch content. Please try again later.";
pub const LISTING_FAILED_MESSAGE: &str = "Failed to fetch movies. Please try again later.";

const TRENDING_LIMIT: usize = 5;
const SHELF_LIMIT: usize = 10;

/// Content of the home page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeed {
    /// Slideshow entries
    pub trending: Vec<Entry>,
    pub top_rated: Vec<Entry>,
    pub upcoming: Vec<Entry>,
    pub top_shows: Vec<Entry>,
}

impl HomeFeed {
    /// Fetches all home page shelves concurrently
    ///
    /// The feed is all or nothing: one failing listing fails the whole load.
    pub async fn load(catalog: &dyn CatalogBrowse) -> AppResult<Self> {
        let fetched = tokio::try_join!(
            catalog.listing(Listing::Trending),
            catalog.listing(Listing::TopRatedMovies),
            catalog.listing(Listing::Upcoming),
            catalog.listing(Listing::TopRatedTv),
        );

        let (trending, top_rated, upcoming, top_shows) = fetched.map_err(|e| {
            tracing::error!(error = %e, "Home feed fetch failed");
            AppError::ExternalApi(FEED_FAILED_MESSAGE.to_string())
        })?;

        let feed = Self {
            trending: truncated(trending, TRENDING_LIMIT),
            top_rated: truncated(top_rated, SHELF_LIMIT),
            upcoming: truncated(upcoming, SHELF_LIMIT),
            top_shows: truncated(top_shows, SHELF_LIMIT),
        };

        tracing::info!(
            trending = feed.trending.len(),
            top_rated = feed.top_rated.len(),
            upcoming = feed.upcoming.len(),
            top_shows = feed.top_shows.len(),
            "Home feed loaded"
        );

        Ok(feed)
    }

    pub fn slideshow(&self, interval: Duration) -> Slideshow {
        Slideshow::new(self.trending.len(), interval)
    }
}

fn truncated(mut entries: Vec<Entry>, limit: usize) -> Vec<Entry> {
    entries.truncate(limit);
    entries
}

/// Fetches a single listing page (movies, TV shows)
pub async fn load_listing(catalog: &dyn CatalogBrowse, listing: Listing) -> AppResult<Vec<Entry>> {
    catalog.listing(listing).await.map_err(|e| {
        tracing::error!(error = %e, listing = %listing, "Listing fetch failed");
        AppError::ExternalApi(LISTING_FAILED_MESSAGE.to_string())
    })
}

/// Auto-advancing hero slideshow position
#[derive(Debug, Clone, PartialEq)]
pub struct Slideshow {
    len: usize,
    current: usize,
    interval: Duration,
}

impl Slideshow {
    pub fn new(len: usize, interval: Duration) -> Self {
        Self {
            len,
            current: 0,
            interval,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Moves to the next slide, wrapping around; no-op when empty
    pub fn advance(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
        self.current
    }

    /// Position after `elapsed` time since the slideshow started
    pub fn position_at(&self, elapsed: Duration) -> usize {
        if self.len == 0 || self.interval.is_zero() {
            return 0;
        }
        let ticks = elapsed.as_millis() / self.interval.as_millis();
        (ticks % self.len as u128) as usize
    }
}
