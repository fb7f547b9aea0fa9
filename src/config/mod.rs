use crate::config::cli::{Args, MessageFilter};
use crate::domain::MessageOptions;
use crate::error::Result;
use clap::Parser;
use reqwest::Client;
use std::time::Duration;

pub mod cli;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Credentials of the bot account. The platform has no service accounts,
/// so this has to be a regular user.
#[derive(Debug, Clone)]
pub struct Account {
    pub login: String,
    pub password: String,
}

impl Account {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScrapperOptions {
    /// Drop the bot account from scraped rosters.
    pub ignore_self: bool,
}

impl Default for ScrapperOptions {
    fn default() -> Self {
        Self { ignore_self: true }
    }
}

/// Builds the cookie-keeping client every session runs on.
pub fn http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;
    Ok(client)
}

pub struct Config {
    pub args: Args,
    pub account: Account,
    pub options: ScrapperOptions,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        let account = Account::new(args.username.clone(), args.password.clone());
        let options = ScrapperOptions {
            ignore_self: !args.include_self,
        };
        let http_client = http_client(Duration::from_secs(args.timeout_secs))?;

        Ok(Self {
            args,
            account,
            options,
            http_client,
        })
    }
}

impl From<&MessageFilter> for MessageOptions {
    fn from(filter: &MessageFilter) -> Self {
        MessageOptions {
            include_rolls: filter.include_rolls,
            include_chat: filter.include_chat,
            include_whispers: filter.include_whispers,
        }
    }
}
