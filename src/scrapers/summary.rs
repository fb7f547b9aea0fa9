use super::{selector, text_of, PageExtractor};
use crate::domain::Summary;
use crate::error::Result;
use scraper::{Html, Selector};
use tracing::debug;

/// Reads the campaign overview out of a campaign details page.
///
/// Never fails on missing markup: a page without a usable campaign id yields
/// an empty summary, and a campaign without an icon keeps an empty image.
pub struct SummaryExtractor;

struct SummarySelectors {
    details: Selector,
    name: Selector,
    icon: Selector,
}

impl SummarySelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            details: selector(".campaign_details")?,
            name: selector(".campaignname span")?,
            icon: selector(".campaignicon img")?,
        })
    }
}

impl PageExtractor for SummaryExtractor {
    type Output = Summary;

    fn extract(&self, document: &Html) -> Result<Summary> {
        let selectors = SummarySelectors::new()?;
        let mut summary = Summary::default();

        let Some(details) = document.select(&selectors.details).next() else {
            debug!("No campaign details on the page");
            return Ok(summary);
        };

        let Some(id) = details
            .value()
            .attr("data-campaignid")
            .and_then(|id| id.trim().parse::<u64>().ok())
        else {
            debug!("Campaign details without a usable id");
            return Ok(summary);
        };
        summary.id = id;

        summary.name = details
            .select(&selectors.name)
            .map(text_of)
            .collect::<String>()
            .trim()
            .to_string();

        if let Some(src) = details
            .select(&selectors.icon)
            .next()
            .and_then(|img| img.value().attr("src"))
        {
            summary.image = src.to_string();
        }

        Ok(summary)
    }
}
