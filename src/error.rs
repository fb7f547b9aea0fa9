use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Invalid credentials provided for {login}. Status: {status}")]
    Auth { login: String, status: StatusCode },
    #[error("Invalid response received. Status is {status}, content length is {content_length:?}")]
    Fetch {
        status: StatusCode,
        content_length: Option<u64>,
    },
    #[error("Unable to retrieve the DOM of {route}: {source}")]
    Route {
        route: String,
        #[source]
        source: Box<ScrapeError>,
    },
    #[error("While parsing page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: Box<ScrapeError>,
    },
    #[error("Could not join game. Status: {status}. Message: {body}")]
    Join { status: StatusCode, body: String },
    #[error("No GM found for this game. Has the game been joined yet?")]
    NoGameMaster,
    #[error("The scrapper couldn't retrieve its own ID, something is not right with the DOM")]
    OwnIdNotFound,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unexpected page structure: {0}")]
    Structure(String),
}

impl ScrapeError {
    pub(crate) fn on_route(self, route: &str) -> Self {
        ScrapeError::Route {
            route: route.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn on_page(self, page: u32) -> Self {
        ScrapeError::Page {
            page,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
