use super::{selector, text_of, PageExtractor};
use crate::domain::Message;
use crate::error::{Result, ScrapeError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Start of the script holding the archived messages.
pub const MESSAGE_DATA_PREFIX: &str = "var msgdata =";
/// Closes the quoted base64 value; the script goes on after it.
const MESSAGE_DATA_SUFFIX: &str = "\";\nO";

static PAGINATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Page\s*(\d+)\s*/\s*(\d+)").unwrap());

/// One page of the chat archive.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchivePage {
    /// The requested page is past the last one.
    OutOfRange,
    Messages(Vec<Message>),
}

impl ArchivePage {
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            ArchivePage::OutOfRange => Vec::new(),
            ArchivePage::Messages(messages) => messages,
        }
    }
}

/// Decodes the messages embedded in one chat archive page.
pub struct MessagePageExtractor {
    /// Requested page, starting at 1.
    pub page: u32,
}

struct ArchiveSelectors {
    pagination: Selector,
    script: Selector,
}

impl ArchiveSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            pagination: selector(".pagination div")?,
            script: selector("script")?,
        })
    }
}

impl PageExtractor for MessagePageExtractor {
    type Output = ArchivePage;

    fn extract(&self, document: &Html) -> Result<ArchivePage> {
        let selectors = ArchiveSelectors::new()?;

        let total = page_count(document, &selectors)?;
        if self.page > total {
            debug!("Page {} is past the last page ({})", self.page, total);
            return Ok(ArchivePage::OutOfRange);
        }

        // The payload script sits near the end of the page
        let scripts: Vec<_> = document.select(&selectors.script).collect();
        let script = scripts
            .iter()
            .rev()
            .map(|script| text_of(*script))
            .find(|text| text.trim_start().starts_with(MESSAGE_DATA_PREFIX))
            .ok_or_else(|| {
                ScrapeError::Structure("Couldn't find the msgdata variable".to_string())
            })?;

        let messages = decode_payload(&script)?;
        debug!("Page {}/{} holds {} messages", self.page, total, messages.len());
        Ok(ArchivePage::Messages(messages))
    }
}

/// Reads the total out of the "Page X/Y" indicator.
fn page_count(document: &Html, selectors: &ArchiveSelectors) -> Result<u32> {
    let indicator = document
        .select(&selectors.pagination)
        .next()
        .ok_or_else(|| ScrapeError::Structure("Unable to locate pagination div".to_string()))?;

    let text = text_of(indicator);
    let captures = PAGINATION.captures(text.trim()).ok_or_else(|| {
        ScrapeError::Structure(format!("Unable to read pagination text, got '{}'", text))
    })?;

    captures[2]
        .parse::<u32>()
        .map_err(|e| ScrapeError::Parse(format!("Invalid page count '{}': {}", &captures[2], e)))
}

/// Turns the text of the msgdata script into messages.
///
/// The payload is `[{ "<key>": message, ... }]`, base64 encoded. Messages
/// keep the order they are listed in.
pub fn decode_payload(script: &str) -> Result<Vec<Message>> {
    let value = script
        .trim()
        .strip_prefix(MESSAGE_DATA_PREFIX)
        .ok_or_else(|| ScrapeError::Structure("msgdata prefix is missing".to_string()))?
        .trim();

    let end = value
        .rfind(MESSAGE_DATA_SUFFIX)
        .ok_or_else(|| ScrapeError::Structure("msgdata variable isn't well formatted".to_string()))?;
    let encoded = value[..end]
        .strip_prefix('"')
        .ok_or_else(|| ScrapeError::Structure("msgdata value isn't a string".to_string()))?;

    let decoded = STANDARD.decode(encoded)?;
    let batches: Vec<Batch> = serde_json::from_slice(&decoded)?;

    let batch = batches
        .into_iter()
        .next()
        .ok_or_else(|| ScrapeError::Structure("msgdata holds no message batch".to_string()))?;
    Ok(batch.0)
}

/// Values of one keyed message object, in document order.
struct Batch(Vec<Message>);

impl<'de> Deserialize<'de> for Batch {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(BatchVisitor)
    }
}

struct BatchVisitor;

impl<'de> Visitor<'de> for BatchVisitor {
    type Value = Batch;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object of messages keyed by id")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Batch, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut messages = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((IgnoredAny, message)) = map.next_entry::<IgnoredAny, Message>()? {
            messages.push(message);
        }
        Ok(Batch(messages))
    }
}
