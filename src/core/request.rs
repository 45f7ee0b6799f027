use crate::utils::error::Result;
use url::Url;

pub const LIMIT_PARAM: &str = "limit";

/// Builds `<api_url>?limit=<limit>`.
///
/// The rest of the base URL's query is kept exactly as written. A `limit`
/// segment already on the base URL is dropped so the request carries exactly
/// one. `None` produces a bare `limit` key with no value.
pub fn request_url(api_url: &str, limit: Option<i32>) -> Result<Url> {
    let mut url = Url::parse(api_url)?;

    let limit_segment = match limit {
        Some(limit) => format!("{}={}", LIMIT_PARAM, limit),
        None => LIMIT_PARAM.to_string(),
    };

    let query = match url.query() {
        Some(existing) if !existing.is_empty() => {
            let kept: Vec<&str> = existing
                .split('&')
                .filter(|segment| !is_limit_segment(segment))
                .collect();
            if kept.is_empty() {
                limit_segment
            } else {
                format!("{}&{}", kept.join("&"), limit_segment)
            }
        }
        _ => limit_segment,
    };

    url.set_query(Some(&query));
    Ok(url)
}

fn is_limit_segment(segment: &str) -> bool {
    segment.split('=').next() == Some(LIMIT_PARAM)
}
