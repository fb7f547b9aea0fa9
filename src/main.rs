use roll20_scrapper::config::cli::Command;
use roll20_scrapper::config::Config;
use roll20_scrapper::{MessageOptions, Result, Roster, Scrapper};
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, info, Level};

#[derive(Serialize)]
struct ErrorTemplate {
    message: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let template = ErrorTemplate {
                message: e.to_string(),
            };
            match serde_json::to_string(&template) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Config::new()?;

    let level = config.args.log_level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let scrapper = Scrapper::with_client(
        config.http_client.clone(),
        &config.args.base_url,
        &config.account,
        config.options,
    )
    .await?;

    match &config.args.command {
        Command::Join { game_id, game_code } => {
            scrapper.join_game(game_id, game_code).await?;
            info!("Joined campaign {}", game_id);
        }
        Command::Players { campaign_id } => {
            let roster = scrapper.get_players(campaign_id).await?;
            if let Roster::Partial(_, notice) = &roster {
                info!("Returning an incomplete roster: {}", notice);
            }
            println!("{}", serde_json::to_string_pretty(roster.players())?);
        }
        Command::Summary { campaign_id } => {
            let summary = scrapper.get_summary(campaign_id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Messages {
            campaign_id,
            filter,
        } => {
            let limit = filter.limit.unwrap_or(usize::MAX);
            let messages = scrapper
                .get_messages(campaign_id, limit, MessageOptions::from(filter))
                .await?;
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
    }

    Ok(())
}
