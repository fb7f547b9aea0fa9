use super::{absolute_image_url, id_from_url, selector, text_of, PageExtractor};
use crate::domain::{Player, Roster};
use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Reads the roster out of a campaign details page.
pub struct PlayerExtractor {
    /// Drop the logged-in account from the roster.
    pub ignore_self: bool,
}

struct PlayerSelectors {
    player: Selector,
    avatar: Selector,
    link: Selector,
    gm_badge: Selector,
    gm_profile: Selector,
    gm_name: Selector,
    gm_avatar: Selector,
    own_profile: Selector,
}

impl PlayerSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            player: selector(".playerlisting .pclisting")?,
            avatar: selector(".circleavatar")?,
            link: selector("a")?,
            gm_badge: selector(".gmbadge")?,
            gm_profile: selector(".playerlisting .profilemeta > .userprofile")?,
            gm_name: selector(".name")?,
            gm_avatar: selector(".playerlisting .userprofile .avatar img")?,
            own_profile: selector(r#".topbarlogin .simple a[href*="wishlists"]"#)?,
        })
    }
}

impl PageExtractor for PlayerExtractor {
    type Output = Roster;

    fn extract(&self, document: &Html) -> Result<Roster> {
        let selectors = PlayerSelectors::new()?;
        let mut players = Vec::new();
        let mut ignored = Vec::new();

        // The campaign creator is not part of this listing, other players
        // holding GM rights are.
        for node in document.select(&selectors.player) {
            match player_from_node(node, &selectors) {
                Ok(player) => players.push(player),
                Err(username) => {
                    warn!("Ignoring player '{}', no usable profile link", username);
                    ignored.push(username);
                }
            }
        }

        let gm = game_master(document, &selectors, &mut ignored)?;
        players.push(gm);

        if self.ignore_self {
            let own_id = own_id(document, &selectors)?;
            debug!("Removing bot account {} from the roster", own_id);
            players.retain(|player| player.roll20_id != own_id);
        }

        Ok(Roster::new(players, ignored))
    }
}

/// Parses one `.pclisting` entry. Without a numeric profile link the entry
/// is unusable; the error then carries whatever username could be read.
fn player_from_node(
    node: ElementRef<'_>,
    selectors: &PlayerSelectors,
) -> std::result::Result<Player, String> {
    let avatar_url = node
        .select(&selectors.avatar)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(absolute_image_url)
        .unwrap_or_default();

    // The listing appends "(GM)" on its own line for players with GM rights
    let text = text_of(node);
    let username = text
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    let roll20_id = match node
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(id_from_url)
    {
        Some(Ok(id)) => id,
        _ => return Err(username),
    };

    let is_gm = node.select(&selectors.gm_badge).next().is_some();

    Ok(Player::new(username, roll20_id, avatar_url, is_gm))
}

fn game_master(
    document: &Html,
    selectors: &PlayerSelectors,
    ignored: &mut Vec<String>,
) -> Result<Player> {
    let mut gm = Player::new(String::new(), 0, String::new(), true);

    for profile in document.select(&selectors.gm_profile) {
        let username = profile
            .select(&selectors.gm_name)
            .map(text_of)
            .collect::<String>()
            .trim()
            .to_string();

        match profile.value().attr("href").map(id_from_url) {
            Some(Ok(id)) => {
                gm.username = username;
                gm.roll20_id = id;
            }
            _ => {
                warn!("Ignoring GM '{}', no usable profile link", username);
                ignored.push(username);
            }
        }
    }

    // The creator's avatar sits outside of the profile link
    for img in document.select(&selectors.gm_avatar) {
        if let Some(src) = img.value().attr("src") {
            gm.avatar_url = absolute_image_url(src);
        }
    }

    if gm.username.is_empty() || gm.roll20_id == 0 {
        return Err(ScrapeError::NoGameMaster);
    }
    Ok(gm)
}

/// Id of the logged-in account, read from the top bar.
fn own_id(document: &Html, selectors: &PlayerSelectors) -> Result<u64> {
    document
        .select(&selectors.own_profile)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| id_from_url(href).ok())
        .ok_or(ScrapeError::OwnIdNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_ID: u64 = 999;

    struct Listing {
        name: &'static str,
        href: Option<&'static str>,
        avatar: Option<&'static str>,
        gm_badge: bool,
    }

    fn listing(name: &'static str, href: &'static str) -> Listing {
        Listing {
            name,
            href: Some(href),
            avatar: Some("/users/avatar/1/30"),
            gm_badge: false,
        }
    }

    fn page(listings: &[Listing], gm: Option<(&str, &str)>, gm_avatar: Option<&str>) -> Html {
        let gm_profile = gm.map(|(name, href)| {
            format!(
                r#"<a class="userprofile" href="{}"><span class="name"> {} </span></a>"#,
                href, name
            )
        });
        page_with_profiles(listings, gm_profile.as_slice(), gm_avatar, "/wishlists/999")
    }

    fn page_with_profiles(
        listings: &[Listing],
        gm_profiles: &[String],
        gm_avatar: Option<&str>,
        wishlist: &str,
    ) -> Html {
        let mut html = String::from(
            r#"<html><body>
            <div class="topbarlogin"><ul class="simple">
              <li><a href="/account/">Account</a></li>
              <li><a href="{wishlist}">Wishlist</a></li>
            </ul></div>
            <div class="playerlisting">"#,
        )
        .replace("{wishlist}", wishlist);

        for profile in gm_profiles {
            html.push_str(r#"<div class="userprofile">"#);
            if let Some(src) = gm_avatar {
                html.push_str(&format!(r#"<div class="avatar"><img src="{}"></div>"#, src));
            }
            html.push_str(&format!(r#"<div class="profilemeta">{}</div></div>"#, profile));
        }

        for entry in listings {
            html.push_str(r#"<div class="pclisting">"#);
            if let Some(src) = entry.avatar {
                html.push_str(&format!(r#"<img class="circleavatar" src="{}">"#, src));
            }
            match entry.href {
                Some(href) => html.push_str(&format!(r#"<a href="{}">{}</a>"#, href, entry.name)),
                None => html.push_str(entry.name),
            }
            if entry.gm_badge {
                html.push_str("\n<span class=\"gmbadge\">(GM)</span>");
            }
            html.push_str("</div>");
        }

        html.push_str("</div></body></html>");
        Html::parse_document(&html)
    }

    fn six_players_and_bot() -> Vec<Listing> {
        vec![
            listing("Alice", "/users/1"),
            listing("Bob", "/users/2"),
            listing("Carol", "/users/3"),
            listing("Dave", "/users/4"),
            listing("Eve", "/users/5"),
            listing("Frank", "/users/6"),
            listing("Scrapper Bot", "/users/999"),
        ]
    }

    #[test]
    fn single_gm_without_bot() {
        let document = page(
            &six_players_and_bot(),
            Some(("Dungeon Master", "/users/100")),
            Some("/users/avatar/100/80"),
        );
        let roster = PlayerExtractor { ignore_self: true }
            .extract(&document)
            .unwrap();

        assert!(roster.incomplete().is_none());
        assert_eq!(roster.players().len(), 7);
        assert_eq!(roster.game_masters(), 1);
        assert_eq!(roster.regular_players(), 6);
        assert!(roster.players().iter().all(|p| p.roll20_id != BOT_ID));

        let gm = roster.players().iter().find(|p| p.is_gm).unwrap();
        assert_eq!(gm.username, "Dungeon Master");
        assert_eq!(gm.roll20_id, 100);
        assert_eq!(gm.avatar_url, "https://app.roll20.net/users/avatar/100/80");
    }

    #[test]
    fn bot_is_kept_when_not_ignoring_self() {
        let document = page(
            &six_players_and_bot(),
            Some(("Dungeon Master", "/users/100")),
            None,
        );
        let roster = PlayerExtractor { ignore_self: false }
            .extract(&document)
            .unwrap();

        assert_eq!(roster.game_masters(), 1);
        assert_eq!(roster.regular_players(), 7);
        assert!(roster.players().iter().any(|p| p.roll20_id == BOT_ID));
    }

    #[test]
    fn badged_players_count_as_gm() {
        let mut listings = six_players_and_bot();
        listings.push(Listing {
            gm_badge: true,
            ..listing("Co GM", "/users/7")
        });
        let document = page(&listings, Some(("Dungeon Master", "/users/100")), None);

        let roster = PlayerExtractor { ignore_self: true }
            .extract(&document)
            .unwrap();

        assert_eq!(roster.game_masters(), 2);
        assert_eq!(roster.regular_players(), 6);
        let co_gm = roster
            .players()
            .iter()
            .find(|p| p.roll20_id == 7)
            .unwrap();
        assert_eq!(co_gm.username, "Co GM");
        assert!(co_gm.is_gm);
    }

    #[test]
    fn unparseable_players_are_reported() {
        let mut listings = six_players_and_bot();
        listings.remove(0);
        listings.push(Listing {
            href: None,
            ..listing("Ignored Player 1", "")
        });
        listings.push(listing("Ignored Player 2", "/users/not-a-number"));
        let document = page(&listings, Some(("Dungeon Master", "/users/100")), None);

        let roster = PlayerExtractor { ignore_self: true }
            .extract(&document)
            .unwrap();

        assert_eq!(roster.game_masters(), 1);
        assert_eq!(roster.regular_players(), 5);
        let notice = roster.incomplete().unwrap().to_string();
        assert_eq!(notice.matches(',').count(), 1);
        assert!(notice.contains("Ignored Player 1"));
        assert!(notice.contains("Ignored Player 2"));
    }

    #[test]
    fn missing_gm_is_a_hard_error() {
        let document = page(&six_players_and_bot(), None, None);
        let result = PlayerExtractor { ignore_self: true }.extract(&document);
        assert!(matches!(result, Err(ScrapeError::NoGameMaster)));
    }

    #[test]
    fn gm_without_avatar_is_fine() {
        let document = page(
            &six_players_and_bot(),
            Some(("Dungeon Master", "/users/100")),
            None,
        );
        let roster = PlayerExtractor { ignore_self: true }
            .extract(&document)
            .unwrap();

        let gm = roster.players().iter().find(|p| p.is_gm).unwrap();
        assert_eq!(gm.avatar_url, "");
        assert_eq!(roster.regular_players(), 6);
    }

    #[test]
    fn missing_player_avatar_is_tolerated() {
        let listings = vec![Listing {
            avatar: None,
            ..listing("Alice", "/users/1")
        }];
        let document = page(&listings, Some(("Dungeon Master", "/users/100")), None);

        let roster = PlayerExtractor { ignore_self: false }
            .extract(&document)
            .unwrap();

        assert_eq!(roster.players()[0].avatar_url, "");
        assert_eq!(roster.players()[0].username, "Alice");
    }

    #[test]
    fn external_avatars_are_kept_as_is() {
        let listings = vec![Listing {
            avatar: Some("https://s3.amazonaws.com/files/alice.png"),
            ..listing("Alice", "/users/1")
        }];
        let document = page(&listings, Some(("Dungeon Master", "/users/100")), None);

        let roster = PlayerExtractor { ignore_self: false }
            .extract(&document)
            .unwrap();

        assert_eq!(
            roster.players()[0].avatar_url,
            "https://s3.amazonaws.com/files/alice.png"
        );
    }

    #[test]
    fn unresolvable_own_id_fails_when_ignoring_self() {
        let document = Html::parse_document(
            r#"<div class="playerlisting">
                 <div class="profilemeta"><a class="userprofile" href="/users/100"><span class="name">GM</span></a></div>
               </div>"#,
        );

        let result = PlayerExtractor { ignore_self: true }.extract(&document);
        assert!(matches!(result, Err(ScrapeError::OwnIdNotFound)));

        let roster = PlayerExtractor { ignore_self: false }
            .extract(&document)
            .unwrap();
        assert_eq!(roster.players().len(), 1);
    }

    #[test]
    fn gm_without_profile_link_is_reported() {
        let profiles = [
            r#"<a class="userprofile"><span class="name">Linkless GM</span></a>"#.to_string(),
        ];
        let document = page_with_profiles(&six_players_and_bot(), &profiles, None, "/wishlists/999");
        let result = PlayerExtractor { ignore_self: true }.extract(&document);
        assert!(matches!(result, Err(ScrapeError::NoGameMaster)));

        let profiles = [
            r#"<a class="userprofile" href="/users/gm"><span class="name">Odd GM</span></a>"#.to_string(),
        ];
        let document = page_with_profiles(&six_players_and_bot(), &profiles, None, "/wishlists/999");
        let result = PlayerExtractor { ignore_self: true }.extract(&document);
        assert!(matches!(result, Err(ScrapeError::NoGameMaster)));
    }

    #[test]
    fn broken_gm_profile_keeps_the_valid_one() {
        let profiles = [
            r#"<a class="userprofile" href="/users/100"><span class="name">Dungeon Master</span></a>"#.to_string(),
            r#"<a class="userprofile"><span class="name">Linkless GM</span></a>"#.to_string(),
        ];
        let document = page_with_profiles(&six_players_and_bot(), &profiles, None, "/wishlists/999");

        let roster = PlayerExtractor { ignore_self: true }
            .extract(&document)
            .unwrap();

        let gm = roster.players().iter().find(|p| p.is_gm).unwrap();
        assert_eq!(gm.username, "Dungeon Master");
        assert_eq!(gm.roll20_id, 100);
        assert!(roster
            .incomplete()
            .unwrap()
            .to_string()
            .contains("Linkless GM"));
    }

    #[test]
    fn non_numeric_own_id_fails_when_ignoring_self() {
        let profiles = [
            r#"<a class="userprofile" href="/users/100"><span class="name">Dungeon Master</span></a>"#.to_string(),
        ];
        let document = page_with_profiles(&six_players_and_bot(), &profiles, None, "/wishlists/mine");

        let result = PlayerExtractor { ignore_self: true }.extract(&document);
        assert!(matches!(result, Err(ScrapeError::OwnIdNotFound)));
    }

    #[test]
    fn unrelated_document_has_no_gm() {
        let document = Html::parse_document("<html><body><p>Not found</p></body></html>");
        let result = PlayerExtractor { ignore_self: true }.extract(&document);
        assert!(matches!(result, Err(ScrapeError::NoGameMaster)));
    }
}
