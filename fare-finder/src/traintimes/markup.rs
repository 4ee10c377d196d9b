//! Field extraction from traintimes.org.uk pages.
//!
//! The pages are scanned rather than parsed: tags are located with small
//! regexes and attributes are read in any order, so whitespace, attribute
//! order and unrelated markup do not matter. All functions here are pure and
//! work on the page body as a string.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::{Direction, JourneyTime, Price};

static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)(\s[^>]*)?/?>").expect("valid regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid regex")
});

static LI_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)li\b[^>]*>").expect("valid regex"));

static RESULT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^result\d+$").expect("valid regex"));

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex")
});

static JOURNEY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+h\s+\d+m").expect("valid regex"));

static ADVANCE_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"£(\d+\.\d+)\s+Advance Single").expect("valid regex"));

static SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"£(\d+\.\d+)\s+Single").expect("valid regex"));

static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<tr\b").expect("valid regex"));

/// One train listed on a results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Departure and arrival label, `"Unknown"` if the row has none.
    pub departure_arrival: String,

    pub journey_time: Option<JourneyTime>,

    /// Cheapest single fare. `None` when the site shows no price yet.
    pub price: Option<Price>,

    /// Link to the calling-points page, as written in the page.
    pub calling_points: Option<String>,

    /// The journey involves a change of train.
    pub has_changes: bool,

    /// The row's markup, from `<li>` through its `</li>`.
    pub block: String,
}

/// An opening tag and where it sits in the page.
struct Tag<'a> {
    name: &'a str,
    attrs: &'a str,
    start: usize,
    end: usize,
}

impl Tag<'_> {
    fn attr(&self, name: &str) -> Option<String> {
        ATTRIBUTE.captures_iter(self.attrs).find_map(|caps| {
            let key = caps.get(1)?.as_str();
            if !key.eq_ignore_ascii_case(name) {
                return None;
            }
            let value = caps.get(2).or(caps.get(3)).or(caps.get(4))?;
            Some(decode_entities(value.as_str()))
        })
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

fn tags<'a>(html: &'a str, name: &'a str) -> impl Iterator<Item = Tag<'a>> + 'a {
    OPEN_TAG.captures_iter(html).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let tag_name = caps.get(1)?.as_str();
        if !tag_name.eq_ignore_ascii_case(name) {
            return None;
        }
        Some(Tag {
            name: tag_name,
            attrs: caps.get(2).map_or("", |m| m.as_str()),
            start: whole.start(),
            end: whole.end(),
        })
    })
}

/// Inner markup of the first `<name>` element, up to its closing tag.
fn first_element<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    let tag = tags(html, name).next()?;
    let rest = &html[tag.end..];
    let close = format!("</{}", tag.name.to_ascii_lowercase());
    let len = rest.to_ascii_lowercase().find(&close).unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Visible text of a markup fragment, with whitespace collapsed.
pub fn text(fragment: &str) -> String {
    let stripped = ANY_TAG.replace_all(fragment, "");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace the character references the site uses with their characters.
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity.strip_prefix('#') {
                Some(num) => match num.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
                    None => num.parse().ok().and_then(char::from_u32),
                },
                None => match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "pound" => Some('£'),
                    "rarr" => Some('→'),
                    "ndash" => Some('–'),
                    _ => None,
                },
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// The site shows an error message instead of results for dates it has no
/// prices for yet.
pub fn is_too_far_in_advance(html: &str) -> bool {
    tags(html, "p").any(|tag| tag.has_class("error-message"))
}

/// A warning box means there are no trains to list.
pub fn has_warning(html: &str) -> bool {
    tags(html, "div").any(|tag| tag.attr("id").as_deref() == Some("warning"))
}

/// Every `<li id="resultN">` block, in page order.
pub fn result_rows(html: &str) -> Vec<ResultRow> {
    tags(html, "li")
        .filter(|tag| tag.attr("id").is_some_and(|id| RESULT_ID.is_match(&id)))
        .map(|tag| parse_row(result_block(html, tag.start)))
        .collect()
}

/// The block starting at the `<li>` at `start`, through its matching `</li>`.
fn result_block(html: &str, start: usize) -> &str {
    let mut depth = 0usize;
    for caps in LI_TAG.captures_iter(&html[start..]) {
        let Some(whole) = caps.get(0) else { continue };
        if caps[1].is_empty() {
            depth += 1;
        } else {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return &html[start..start + whole.end()];
            }
        }
    }
    &html[start..]
}

fn parse_row(block: &str) -> ResultRow {
    let departure_arrival = first_element(block, "strong")
        .map(text)
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let details = first_element(block, "small").map(text).unwrap_or_default();

    let journey_time = JOURNEY_TIME
        .find(&details)
        .and_then(|m| JourneyTime::parse(m.as_str()).ok());

    let price = ADVANCE_SINGLE
        .captures(&details)
        .or_else(|| SINGLE.captures(&details))
        .and_then(|caps| Price::parse(&caps[1]).ok());

    let calling_points = tags(block, "a")
        .find(|tag| tag.has_class("calling_link"))
        .and_then(|tag| tag.attr("href"));

    let has_changes = tags(block, "a").any(|tag| tag.has_class("change_link"));

    ResultRow {
        departure_arrival,
        journey_time,
        price,
        calling_points,
        has_changes,
        block: block.to_string(),
    }
}

/// Link to the page with more trains for `direction`.
///
/// Outbound searches look at earlier departures, return searches at later
/// ones, so that both cover the whole day.
pub fn paging_link(html: &str, direction: Direction) -> Option<String> {
    let data_type = match direction {
        Direction::Outbound => "out-earlier",
        Direction::Return => "out-later",
    };
    tags(html, "a")
        .find(|tag| tag.attr("data-type").as_deref() == Some(data_type))
        .and_then(|tag| tag.attr("href"))
        .filter(|href| !href.is_empty())
}

/// Number of calling points on a calling-points page: the rows of its first
/// table body. `None` if the page has no table body.
pub fn count_calling_points(html: &str) -> Option<usize> {
    let body = first_element(html, "tbody")?;
    Some(TABLE_ROW.find_iter(body).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, label: &str, small: &str, links: &str) -> String {
        format!(
            r#"<li id="{id}" class="result">
  <strong>{label}</strong>
  {links}
  <small>{small}</small>
</li>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            r#"<html><body>
<a href="/warrington+bank+quay/london+euston/08:30a/2025-06-03" data-type="out-earlier">Earlier</a>
<ol class="results">{}</ol>
<a data-type="out-later" href="/warrington+bank+quay/london+euston/12:30a/2025-06-03?x=1&amp;y=2">Later</a>
</body></html>"#,
            rows.join("\n")
        )
    }

    #[test]
    fn extracts_rows() {
        let html = page(&[
            row(
                "result0",
                "10:32 &rarr; 12:17",
                "1h 45m, &pound;35.00 Advance Single",
                r#"<a class="calling_link" href="/ajax-stoppingpoints?id=1&amp;d=2">Calling points</a>"#,
            ),
            row(
                "result1",
                "11:02 → 12:58",
                "1h   56m, £42.50 Anytime Day Single, £80.10 Single",
                r#"<a class="change_link other" href="/c">1 change</a>"#,
            ),
        ]);

        let rows = result_rows(&html);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].departure_arrival, "10:32 → 12:17");
        assert_eq!(rows[0].journey_time.as_ref().map(|t| t.minutes()), Some(105));
        assert_eq!(rows[0].price, Some(Price::from_pence(3500)));
        assert_eq!(
            rows[0].calling_points.as_deref(),
            Some("/ajax-stoppingpoints?id=1&d=2")
        );
        assert!(!rows[0].has_changes);

        assert_eq!(rows[1].journey_time.as_ref().map(|t| t.as_str()), Some("1h 56m"));
        assert_eq!(rows[1].price, Some(Price::from_pence(8010)));
        assert_eq!(rows[1].calling_points, None);
        assert!(rows[1].has_changes);
    }

    #[test]
    fn advance_fare_wins_over_plain_single() {
        let html = page(&[row(
            "result3",
            "x",
            "2h 10m £90.00 Single or £28.40 Advance Single",
            "",
        )]);
        assert_eq!(result_rows(&html)[0].price, Some(Price::from_pence(2840)));
    }

    #[test]
    fn row_without_price_or_label() {
        let html = page(&[r#"<li id="result0"><small>2h 3m</small></li>"#.to_string()]);
        let rows = result_rows(&html);
        assert_eq!(rows[0].departure_arrival, "Unknown");
        assert_eq!(rows[0].price, None);
        assert_eq!(rows[0].journey_time.as_ref().map(|t| t.minutes()), Some(123));
    }

    #[test]
    fn ignores_other_list_items() {
        let html = page(&[
            r#"<li id="header">£1.00 Advance Single</li>"#.to_string(),
            row("result7", "a", "1h 0m £5.00 Advance Single", ""),
            r#"<li id="result">nope</li>"#.to_string(),
        ]);
        let rows = result_rows(&html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, Some(Price::from_pence(500)));
    }

    #[test]
    fn nested_lists_stay_inside_their_row() {
        let html = r#"<ol>
<li id="result0"><strong>a</strong><ul><li>leg 1</li><li>leg 2</li></ul><small>1h 0m £5.00 Advance Single</small></li>
<li id="result1"><strong>b</strong><small>1h 0m £6.00 Advance Single</small></li>
</ol>"#;
        let rows = result_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price, Some(Price::from_pence(500)));
        assert_eq!(rows[1].departure_arrival, "b");
        assert!(rows[0].block.starts_with(r#"<li id="result0">"#));
        assert!(rows[0].block.ends_with("£5.00 Advance Single</small></li>"));
    }

    #[test]
    fn page_markers() {
        assert!(is_too_far_in_advance(
            r#"<p class="big error-message">Sorry, no fares yet</p>"#
        ));
        assert!(!is_too_far_in_advance(r#"<p class="message">ok</p>"#));

        assert!(has_warning(r#"<div class='box' id='warning'>No trains</div>"#));
        assert!(!has_warning(r#"<div id="warnings">x</div>"#));
    }

    #[test]
    fn paging_links_by_direction() {
        let html = page(&[]);
        assert_eq!(
            paging_link(&html, Direction::Outbound).as_deref(),
            Some("/warrington+bank+quay/london+euston/08:30a/2025-06-03")
        );
        assert_eq!(
            paging_link(&html, Direction::Return).as_deref(),
            Some("/warrington+bank+quay/london+euston/12:30a/2025-06-03?x=1&y=2")
        );
        assert_eq!(paging_link("<p>nothing</p>", Direction::Return), None);
    }

    #[test]
    fn calling_points_count_first_body_only() {
        let html = r#"<table>
<thead><tr><th>Station</th></tr></thead>
<tbody>
  <tr><td>Crewe</td></tr>
  <TR class="x"><td>Stafford</td></tr>
  <tr><td>Milton Keynes</td></tr>
</tbody>
</table>
<table><tbody><tr><td>other</td></tr></tbody></table>"#;
        assert_eq!(count_calling_points(html), Some(3));
        assert_eq!(count_calling_points("<table><tbody></tbody></table>"), Some(0));
        assert_eq!(count_calling_points("<p>gone</p>"), None);
    }

    #[test]
    fn entities() {
        assert_eq!(decode_entities("&pound;3 &amp; &#163;4 &#x2192; &bogus;"), "£3 & £4 → &bogus;");
        assert_eq!(text("<b>10:30</b>\n  &nbsp;to <i>12:00</i>"), "10:30 to 12:00");
    }
}
