use url::Url;

/// Returns the normalized hostname of a URL
///
/// The hostname is lowercased and any leading `www.` labels are stripped, so
/// the result is stable under re-application. Returns `None` when the URL has
/// no host (e.g. `mailto:` links).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use driftnet::url::normalized_hostname;
///
/// let url = Url::parse("https://WWW.Example.COM/page").unwrap();
/// assert_eq!(normalized_hostname(&url), Some("example.com".to_string()));
/// ```
pub fn normalized_hostname(url: &Url) -> Option<String> {
    let mut host = url.host_str()?.to_lowercase();
    while let Some(stripped) = host.strip_prefix("www.") {
        host = stripped.to_string();
    }
    Some(host)
}

/// Returns true if the URL has a scheme the crawler will fetch
///
/// Only `http` and `https` URLs are considered crawlable; everything else is
/// silently dropped from the frontier.
pub fn is_crawlable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Parses a discovered candidate link
///
/// Returns `None` when the string does not parse as an absolute URL or
/// parses to something without a hostname. Candidates rejected here never
/// enter the frontier; scheme validity is checked later, at dequeue time.
pub fn parse_candidate(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    url.host_str()?;
    Some(url)
}
