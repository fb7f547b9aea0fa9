//! Scraper for a campaign platform that has no public API.
//!
//! A [`Scrapper`] logs in as a bot account, then reads campaign pages to
//! build rosters, campaign summaries and chat archives.

pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod scrapers;
mod scrapper;

pub use config::{Account, ScrapperOptions};
pub use domain::{IncompleteRoster, Message, MessageOptions, MessageType, Player, Roster, Summary};
pub use error::{Result, ScrapeError};
pub use scrapper::Scrapper;
