use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};

pub(crate) mod messages;
pub(crate) mod players;
pub(crate) mod summary;

pub use messages::{ArchivePage, MessagePageExtractor};
pub use players::PlayerExtractor;
pub use summary::SummaryExtractor;

/// Where relative avatar paths are served from.
pub const CDN_ORIGIN: &str = "https://app.roll20.net";

/// Turns one parsed page of the platform into domain data.
pub trait PageExtractor {
    type Output;

    fn extract(&self, document: &Html) -> Result<Self::Output>;
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(e.to_string()))
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Avatars hosted by the platform come as absolute paths, external ones as full URLs.
pub fn absolute_image_url(url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", CDN_ORIGIN, url)
    } else {
        url.to_string()
    }
}

/// Reads the numeric id at the end of a profile link, e.g. `/users/1234`.
pub fn id_from_url(url: &str) -> Result<u64> {
    url.trim()
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<u64>().ok())
        .ok_or_else(|| ScrapeError::Parse(format!("Cannot parse an id from '{}'", url)))
}
