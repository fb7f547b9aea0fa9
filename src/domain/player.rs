use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A player as listed on the campaign details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Either on the platform CDN or an external URL. Empty when the page has none.
    pub avatar_url: String,
    /// A campaign can have several GMs.
    pub is_gm: bool,
    pub roll20_id: u64,
    /// Account name, not the character name.
    pub username: String,
}

impl Player {
    pub fn new(username: String, roll20_id: u64, avatar_url: String, is_gm: bool) -> Self {
        Self {
            avatar_url,
            is_gm,
            roll20_id,
            username,
        }
    }
}

/// Players whose entry could not be parsed and were left out of a roster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("The following players have been ignored: {}", .ignored.join(","))]
pub struct IncompleteRoster {
    pub ignored: Vec<String>,
}

/// Outcome of a roster extraction.
///
/// `Partial` still carries a trustworthy roster, only missing the entries
/// named by the notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roster {
    Complete(Vec<Player>),
    Partial(Vec<Player>, IncompleteRoster),
}

impl Roster {
    pub(crate) fn new(players: Vec<Player>, ignored: Vec<String>) -> Self {
        if ignored.is_empty() {
            Roster::Complete(players)
        } else {
            Roster::Partial(players, IncompleteRoster { ignored })
        }
    }

    pub fn players(&self) -> &[Player] {
        match self {
            Roster::Complete(players) | Roster::Partial(players, _) => players,
        }
    }

    pub fn into_players(self) -> Vec<Player> {
        match self {
            Roster::Complete(players) | Roster::Partial(players, _) => players,
        }
    }

    pub fn incomplete(&self) -> Option<&IncompleteRoster> {
        match self {
            Roster::Complete(_) => None,
            Roster::Partial(_, notice) => Some(notice),
        }
    }

    pub fn game_masters(&self) -> usize {
        self.players().iter().filter(|p| p.is_gm).count()
    }

    pub fn regular_players(&self) -> usize {
        self.players().iter().filter(|p| !p.is_gm).count()
    }
}
