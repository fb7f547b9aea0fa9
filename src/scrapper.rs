use crate::clients::{Routes, Session};
use crate::config::{http_client, Account, ScrapperOptions};
use crate::domain::{Message, MessageOptions, Roster, Summary};
use crate::error::Result;
use crate::scrapers::{
    ArchivePage, MessagePageExtractor, PageExtractor, PlayerExtractor, SummaryExtractor,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Entry point of the engine: one logged-in bot account and the four
/// operations it can run against a campaign.
///
/// Requests are issued one after the other, never concurrently.
#[derive(Debug)]
pub struct Scrapper {
    session: Session,
    options: ScrapperOptions,
}

impl Scrapper {
    /// Logs in right away with a default client.
    pub async fn new(
        base_url: &str,
        account: &Account,
        options: Option<ScrapperOptions>,
    ) -> Result<Self> {
        let client = http_client(Duration::from_secs(30))?;
        Self::with_client(client, base_url, account, options.unwrap_or_default()).await
    }

    /// Logs in right away on the given client, which must keep cookies.
    pub async fn with_client(
        client: Client,
        base_url: &str,
        account: &Account,
        options: ScrapperOptions,
    ) -> Result<Self> {
        let session = Session::open(client, base_url, account).await?;
        info!("Created new scrapper for {}", session.base_url());
        Ok(Self { session, options })
    }

    pub async fn join_game(&self, game_id: &str, game_code: &str) -> Result<()> {
        info!("Joining campaign {}", game_id);
        self.session.join(game_id, game_code).await
    }

    /// Lists every player of a joined campaign, GMs included.
    ///
    /// Entries that could not be parsed are left out and named in
    /// [`Roster::Partial`].
    pub async fn get_players(&self, campaign_id: &str) -> Result<Roster> {
        info!("Fetching players of campaign {}", campaign_id);
        let route = Routes::campaign_details(campaign_id);
        let document = self.session.fetch_document(&route).await?;

        let extractor = PlayerExtractor {
            ignore_self: self.options.ignore_self,
        };
        let roster = extractor
            .extract(&document)
            .map_err(|e| e.on_route(&route))?;

        if let Some(notice) = roster.incomplete() {
            warn!("Campaign {}: {}", campaign_id, notice);
        }
        Ok(roster)
    }

    pub async fn get_summary(&self, campaign_id: &str) -> Result<Summary> {
        info!("Fetching summary of campaign {}", campaign_id);
        let route = Routes::campaign_details(campaign_id);
        let document = self.session.fetch_document(&route).await?;

        SummaryExtractor
            .extract(&document)
            .map_err(|e| e.on_route(&route))
    }

    /// Walks the chat archive from page 1 until `limit` allowed messages are
    /// collected or a page brings nothing new. Any page failure aborts the
    /// whole walk.
    pub async fn get_messages(
        &self,
        campaign_id: &str,
        limit: usize,
        options: MessageOptions,
    ) -> Result<Vec<Message>> {
        let mut messages = Vec::new();
        if limit == 0 {
            return Ok(messages);
        }

        info!("Fetching messages of campaign {}", campaign_id);
        let mut page = 1;
        while messages.len() < limit {
            let batch = self
                .get_messages_of_page(campaign_id, page)
                .await
                .map_err(|e| e.on_page(page))?
                .into_messages();
            if batch.is_empty() {
                break;
            }

            messages.extend(batch.into_iter().filter(|m| options.is_allowed(m)));
            page += 1;
        }

        // The last page may overshoot
        messages.truncate(limit);

        info!(
            "Fetched {} messages of campaign {}",
            messages.len(),
            campaign_id
        );
        Ok(messages)
    }

    /// Unfiltered messages of a single archive page.
    pub async fn get_messages_of_page(&self, campaign_id: &str, page: u32) -> Result<ArchivePage> {
        let route = Routes::campaign_archive(campaign_id, page);
        let document = self.session.fetch_document(&route).await?;
        debug!("Parsing archive page {} of campaign {}", page, campaign_id);

        MessagePageExtractor { page }
            .extract(&document)
            .map_err(|e| e.on_route(&route))
    }
}
