/// Paths of the pages the scrapper reads, relative to the base URL.
pub struct Routes;

impl Routes {
    pub const LOGIN: &'static str = "/sessions/create";
    pub const JOIN: &'static str = "join";

    pub fn campaign_details(campaign_id: &str) -> String {
        format!("/campaigns/details/{}", campaign_id)
    }

    pub fn campaign_archive(campaign_id: &str, page: u32) -> String {
        format!(
            "/campaigns/chatarchive/{}?p={}&hiderollresults=true",
            campaign_id, page
        )
    }

    /// Path segments of the join page. Kept as segments so each one gets percent-encoded.
    pub fn join<'a>(game_id: &'a str, game_code: &'a str) -> [&'a str; 3] {
        [Self::JOIN, game_id, game_code]
    }
}
