//! Next-page strategies
//!
//! Basecamp pages most collections through the `Link` response header and
//! search through a `page` query parameter.

use super::types::Cursor;
use reqwest::header::{HeaderMap, LINK};

// ============================================================================
// Link Header Pagination
// ============================================================================

/// Cursor for the page after this response, from its `Link` header
pub fn next_link(headers: &HeaderMap) -> Option<Cursor> {
    let header = headers.get(LINK)?.to_str().ok()?;
    parse_link_header(header, "next").map(Cursor::Url)
}

/// Parse a Link header and extract the URL for the given rel
///
/// Targets are read between `<` and `>`, so commas inside a URL do not
/// split links. `rel` may list several space-separated values.
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    let mut rest = header;
    loop {
        let open = rest.find('<')?;
        let target = &rest[open + 1..];
        let close = target.find('>')?;
        let (params, next) = split_link_params(&target[close + 1..]);

        let matches = params.split(';').filter_map(rel_value).any(|rels| {
            rels.split_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case(target_rel))
        });
        if matches {
            return Some(target[..close].to_string());
        }
        rest = next;
    }
}

/// Split off one link's parameters at the first comma outside quotes
fn split_link_params(input: &str) -> (&str, &str) {
    let mut quoted = false;
    for (i, c) in input.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => return (&input[..i], &input[i + 1..]),
            _ => {}
        }
    }
    (input, "")
}

fn rel_value(param: &str) -> Option<&str> {
    let (key, value) = param.split_once('=')?;
    key.trim()
        .eq_ignore_ascii_case("rel")
        .then(|| value.trim().trim_matches('"').trim_matches('\''))
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Next page number for search results
///
/// A full page means there may be more; a short page is the last one.
pub fn next_page_number(page: u32, per_page: u32, count: usize) -> Option<Cursor> {
    if per_page == 0 {
        return None;
    }
    let full = usize::try_from(per_page).map_or(false, |per_page| count >= per_page);
    full.then(|| Cursor::Page(page.saturating_add(1)))
}
