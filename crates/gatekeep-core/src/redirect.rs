//! Redirect target construction for intercepted navigations.

use url::Url;

/// Build the interception-page URL for a blocked navigation: the configured
/// base carrying `domain`, `category` and `url` query parameters, all
/// percent-encoded.
pub fn block_page_url(
    base: &str,
    domain: &str,
    category: &str,
    original_url: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("domain", domain)
        .append_pair("category", category)
        .append_pair("url", original_url);
    Ok(url.to_string())
}
