mod message;
mod player;
mod summary;

pub use message::{Message, MessageOptions, MessageType};
pub use player::{IncompleteRoster, Player, Roster};
pub use summary::Summary;
