use serde::{Deserialize, Serialize};

/// A short overview of a campaign, as shown on its details page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub id: u64,
    pub name: String,
    pub image: String,
}
