//! Icon link discovery and reference resolution.

use scraper::{Html, Selector};
use url::Url;

use crate::fetch::{Origin, UrlError};

/// Find the `href` of the first `<link>` whose `rel` mentions "icon".
///
/// Matching is a case-insensitive substring test on `rel`, so `icon`,
/// `shortcut icon` and `apple-touch-icon` all qualify. Document order wins.
pub fn find_icon_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("link[rel][href]").expect("invalid selector");

    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("rel")
                .is_some_and(|rel| rel.to_ascii_lowercase().contains("icon"))
        })
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(str::to_string)
}

/// Resolve a scraped icon reference against its origin.
///
/// - `//host/path` inherits the origin's scheme.
/// - Anything not starting with `http` becomes `<origin>/<reference>`.
/// - Absolute `http(s)` references are used as-is.
pub fn resolve_icon_href(origin: &Origin, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();

    let resolved = if href.starts_with("//") {
        format!("{}:{}", origin.scheme(), href)
    } else if !href.to_ascii_lowercase().starts_with("http") {
        origin.join(href)
    } else {
        href.to_string()
    };

    Url::parse(&resolved).map_err(|e| UrlError::InvalidUrl(format!("{resolved}: {e}")))
}
