use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// one row of a scraped listing: a series, a season, or an episode.
///
/// `score` is populated by [`crate::rank::rank`] during series search only
/// (lower = closer match) and stays `None` everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub label: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<usize>,
}

impl CatalogEntry {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
            score: None,
        }
    }
}

static NUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number regex must compile"));

static TRAILING_NUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)$").expect("trailing number regex must compile"));

static LINK_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(/*)$").expect("link tail regex must compile"));

/// first numeric token of a label, padding preserved ("Season 08" -> "08").
pub fn first_num(label: &str) -> Option<&str> {
    NUM_RE.find(label).map(|m| m.as_str())
}

/// trailing numeric token of a label ("Episode 16" -> "16").
pub fn trailing_num(label: &str) -> Option<&str> {
    TRAILING_NUM_RE
        .captures(label)
        .and_then(|c| c.get(1).map(|m| m.as_str()))
}

/// extracts every listing anchor from a catalog page, in page order, then
/// reconstructs the pagination tail the site trims off.
///
/// listing pages frequently show only the last few rows of a numbered range
/// (episodes 10-16 of 16). when the last visible label ends in a number,
/// the remaining rows are synthesized from it, counting down to 1. listings
/// without a numeric tail (the top-level series index) pass through
/// untouched.
pub fn parse_listing(html: &str) -> Vec<CatalogEntry> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".data_list .data a").expect("listing selector must compile");

    let mut entries: Vec<CatalogEntry> = document
        .select(&selector)
        .map(|anchor| {
            CatalogEntry::new(
                anchor.text().collect::<String>().trim().to_string(),
                anchor.value().attr("href").unwrap_or_default().to_string(),
            )
        })
        .collect();

    let Some(last) = entries.last() else {
        return entries;
    };

    let Some(num) = trailing_num(&last.label).and_then(|tok| tok.parse::<u32>().ok()) else {
        return entries;
    };

    if num == 0 {
        return entries;
    }

    let last_label = last.label.clone();
    let last_link = last.link.clone();

    for i in (1..num).rev() {
        let token = pad_index(i);
        let label = TRAILING_NUM_RE
            .replace(&last_label, token.as_str())
            .into_owned();
        let link = rewrite_link(&last_link, &last_label, &label);
        entries.push(CatalogEntry::new(label, link));
    }

    entries
}

/// two-digit zero-padding below 10; the site's URL scheme depends on it.
fn pad_index(i: u32) -> String {
    if i < 10 { format!("{i:02}") } else { i.to_string() }
}

/// derives a synthetic link by swapping the hyphen-normalized label fragment
/// inside the original link. labels whose normalized form never occurs in
/// the href (extra separators around the title) fall back to rewriting the
/// link's own trailing numeric run.
fn rewrite_link(link: &str, old_label: &str, new_label: &str) -> String {
    let old_fragment = old_label.replace(' ', "-");
    let new_fragment = new_label.replace(' ', "-");

    if link.contains(&old_fragment) {
        return link.replace(&old_fragment, &new_fragment);
    }

    let Some(token) = trailing_num(new_label) else {
        return link.to_string();
    };

    LINK_TAIL_RE
        .replace(link, |caps: &regex::Captures<'_>| {
            format!("{token}{}", &caps[2])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(rows: &[(&str, &str)]) -> String {
        let mut html = String::from("<html><body><div class=\"data_list\">");
        for (label, link) in rows {
            html.push_str(&format!(
                "<div class=\"data\"><a href=\"{link}\">{label}</a></div>"
            ));
        }
        html.push_str("</div></body></html>");
        html
    }

    #[test]
    fn extracts_rows_in_page_order() {
        let html = listing(&[("Lost", "/Lost/"), ("List", "/List/")]);
        let entries = parse_listing(&html);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Lost");
        assert_eq!(entries[0].link, "/Lost/");
        assert_eq!(entries[1].label, "List");
    }

    #[test]
    fn reconstructs_trimmed_pagination_tail() {
        let html = listing(&[(
            "Show - Episode 16",
            "https://o2tvseries.com/Show/Season-01/Episode-16",
        )]);
        let entries = parse_listing(&html);

        assert_eq!(entries.len(), 16);
        assert_eq!(entries[0].label, "Show - Episode 16");
        assert_eq!(entries[1].label, "Show - Episode 15");
        assert_eq!(entries[15].label, "Show - Episode 01");

        // below ten the label is zero-padded, not bare
        assert_eq!(entries[7].label, "Show - Episode 09");

        for entry in &entries {
            let label_num = trailing_num(&entry.label).unwrap();
            let link_num = trailing_num(&entry.link).unwrap();
            assert_eq!(label_num, link_num, "link tail must track {}", entry.label);
        }
    }

    #[test]
    fn rewrites_link_by_fragment_when_label_occurs_in_href() {
        let html = listing(&[(
            "Episode 12",
            "https://o2tvseries.com/Show/Season-02/Episode-12/index.html",
        )]);
        let entries = parse_listing(&html);
        assert_eq!(entries.len(), 12);
        assert_eq!(
            entries[3].link,
            "https://o2tvseries.com/Show/Season-02/Episode-09/index.html"
        );
    }

    #[test]
    fn skips_reconstruction_without_numeric_tail() {
        let html = listing(&[("Lost", "/Lost/"), ("Last Man Standing", "/Last-Man-Standing/")]);
        let entries = parse_listing(&html);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn empty_page_yields_empty_list() {
        assert!(parse_listing("<html><body></body></html>").is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        let html = listing(&[("Show - Episode 16", "/Show/Episode-16")]);
        assert_eq!(parse_listing(&html), parse_listing(&html));
    }

    #[test]
    fn numeric_token_helpers() {
        assert_eq!(first_num("Season 08"), Some("08"));
        assert_eq!(first_num("Episode 9 of 16"), Some("9"));
        assert_eq!(first_num("Lost"), None);
        assert_eq!(trailing_num("Episode 16"), Some("16"));
        assert_eq!(trailing_num("16 candles"), None);
    }
}
