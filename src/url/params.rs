use std::collections::HashMap;
use url::Url;

/// Extracts the query parameters of a URL into a map
///
/// Parameters are derived by splitting the raw query string on `&` and then
/// on the first `=`. Duplicate keys resolve last-wins; pairs without an `=`
/// are skipped.
pub fn query_params(url: &Url) -> HashMap<String, String> {
    let mut params = HashMap::new();

    let Some(query) = url.query() else {
        return params;
    };

    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(key.to_string(), value.to_string());
        }
    }

    params
}
