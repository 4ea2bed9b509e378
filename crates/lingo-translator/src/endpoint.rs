use reqwest::Url;

const LOOPBACK_IPV4: &str = "127.0.0.1";

/// Expand a configured base URL into the endpoints to try, in order.
///
/// The slash-stripped input always comes first. A `localhost` host also gets a
/// `127.0.0.1` variant. Unparseable input is passed through as the only candidate.
pub fn resolve_endpoints(base_url: &str) -> Vec<String> {
    let normalized = base_url.trim_end_matches('/').to_string();
    let mut candidates = vec![normalized.clone()];

    if let Ok(mut url) = Url::parse(&normalized)
        && url.host_str() == Some("localhost")
        && url.set_host(Some(LOOPBACK_IPV4)).is_ok()
    {
        let loopback = url.as_str().trim_end_matches('/').to_string();
        if !candidates.contains(&loopback) {
            candidates.push(loopback);
        }
    }

    candidates
}
