use super::Routes;
use crate::config::Account;
use crate::error::{Result, ScrapeError};
use reqwest::header::ORIGIN;
use reqwest::{Client, StatusCode, Url};
use scraper::Html;
use tracing::{debug, info};

/// An authenticated connection to the platform.
///
/// The login happens once, in [`Session::open`]; the client's cookie store
/// then carries the session for every later request. Nothing is refreshed,
/// a new session is needed to log in again.
#[derive(Debug)]
pub struct Session {
    client: Client,
    base_url: String,
}

impl Session {
    /// `client` must keep cookies, see [`crate::config::http_client`].
    pub async fn open(client: Client, base_url: &str, account: &Account) -> Result<Self> {
        let session = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        };
        session.login(account).await?;
        Ok(session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn login(&self, account: &Account) -> Result<()> {
        let url = self.url(Routes::LOGIN);
        debug!("Logging in to {}", url);

        // The platform rejects a login without an Origin matching its own host.
        let response = self
            .client
            .post(&url)
            .header(ORIGIN, &self.base_url)
            .form(&[
                ("email", account.login.as_str()),
                ("password", account.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::Auth {
                login: account.login.clone(),
                status,
            });
        }

        info!("Logged in as {}", account.login);
        Ok(())
    }

    /// GETs a route and parses the answer into a DOM tree.
    pub async fn fetch_document(&self, route: &str) -> Result<Html> {
        debug!("Fetching {}", route);
        self.fetch_body(route)
            .await
            .map(|body| Html::parse_document(&body))
            .map_err(|e| e.on_route(route))
    }

    async fn fetch_body(&self, route: &str) -> Result<String> {
        let response = self.client.get(self.url(route)).send().await?;

        let status = response.status();
        let content_length = response.content_length();
        if status != StatusCode::OK || content_length == Some(0) {
            return Err(ScrapeError::Fetch {
                status,
                content_length,
            });
        }

        let body = response.text().await?;
        if body.is_empty() {
            return Err(ScrapeError::Fetch {
                status,
                content_length: Some(0),
            });
        }
        Ok(body)
    }

    /// Visits the invitation link of a campaign. The ids are passed through
    /// untouched, the platform answers with an error page for bad codes.
    pub async fn join(&self, game_id: &str, game_code: &str) -> Result<()> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ScrapeError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(Routes::join(game_id, game_code));

        debug!("Joining campaign through {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Join { status, body });
        }
        Ok(())
    }
}
