// src/parse.rs
//! Turn one page of search markup into candidate job cards.

use crate::types::JobCard;
use scraper::{ElementRef, Html, Selector};

// The guest endpoint obfuscates class names but keeps stable suffixes,
// so cards are matched by partial class name.
const CARD_SELECTOR: &str = "li";
const LINK_SELECTOR: &str = "[class*='_full-link']";
const TITLE_SELECTOR: &str = "[class*='_title']";
const COMPANY_SELECTOR: &str = "[class*='_subtitle']";
const LOCATION_SELECTOR: &str = "[class*='_location']";

/// Extract candidate cards from raw markup. A fragment missing its link,
/// title, or company element is a malformed or ad card and is silently
/// discarded; a missing location stays `None`. An empty result means the
/// page had no list fragments and the caller should stop paginating.
pub fn parse_cards(html: &str) -> Vec<JobCard> {
    let document = Html::parse_document(html);
    let card_selector = match Selector::parse(CARD_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut cards = Vec::new();
    for fragment in document.select(&card_selector) {
        let url = first_match(fragment, LINK_SELECTOR)
            .and_then(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty());
        let title = first_text(fragment, TITLE_SELECTOR);
        let company = first_text(fragment, COMPANY_SELECTOR);
        let location = first_text(fragment, LOCATION_SELECTOR);

        let (url, title, company) = match (url, title, company) {
            (Some(url), Some(title), Some(company)) => (url, title, company),
            _ => continue,
        };

        cards.push(JobCard {
            url,
            title,
            company,
            location,
        });
    }
    cards
}

fn first_match<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    scope.select(&selector).next()
}

fn first_text(scope: ElementRef<'_>, selector: &str) -> Option<String> {
    let element = first_match(scope, selector)?;
    let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
