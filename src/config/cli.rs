use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Base URL of the platform, e.g. https://app.roll20.net
    #[arg(long, env = "ROLL20_BASE_URL")]
    pub base_url: String,

    /// Email of the bot account
    #[arg(long, env = "ROLL20_USERNAME")]
    pub username: String,

    /// Password of the bot account
    #[arg(long, env = "ROLL20_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Keep the bot account in the scraped rosters
    #[arg(long)]
    pub include_self: bool,

    /// HTTP timeout for every request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join a campaign with its invitation code
    Join { game_id: String, game_code: String },
    /// List the players of a joined campaign
    Players { campaign_id: String },
    /// Show the id, name and image of a campaign
    Summary { campaign_id: String },
    /// Dump the chat archive of a campaign
    Messages {
        campaign_id: String,
        #[command(flatten)]
        filter: MessageFilter,
    },
}

#[derive(ClapArgs, Debug)]
pub struct MessageFilter {
    /// Max number of messages to return. Default is all available
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub include_rolls: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub include_chat: bool,

    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub include_whispers: bool,
}
