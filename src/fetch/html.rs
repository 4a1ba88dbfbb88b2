// src/fetch/html.rs
// =============================================================================
// This module extracts href values from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a link checker, we do NOT resolve relative links here. The crawler's
// scope filter decides what a raw href means, so we hand it over untouched.
// =============================================================================

use scraper::{Html, Selector};

use super::FetchError;

// Extracts the href of every <a> tag in the document
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: the raw href values in document order, exactly as written in the
//   page, with empty ones dropped
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href=''>x</a><a>y</a>"
//   result = ["/docs"]
pub fn extract_hrefs(html: &str) -> Result<Vec<String>, FetchError> {
    // html5ever never rejects a document; broken markup is repaired the same
    // way a browser would repair it
    let document = Html::parse_document(html);

    let selector =
        Selector::parse("a[href]").map_err(|e| FetchError::Parse(format!("{:?}", e)))?;

    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        // Whitespace is left alone; the scope filter trims it
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    Ok(hrefs)
}
