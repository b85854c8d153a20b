use url::Url;

use crate::error::SyncError;

/// Parses the server base URL and normalizes it to end with `/` so endpoint
/// paths join under it instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, SyncError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncError::config("server url is not configured"));
    }
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|e| SyncError::config(format!("invalid server url: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(SyncError::config("only http(s) server urls are allowed")),
    }
    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(SyncError::config("invalid server url host"));
    }
    Ok(url)
}

pub fn endpoint_url(base: &Url, path: &str, query: &[(&str, String)]) -> Result<Url, SyncError> {
    let mut url = base
        .join(path.trim_start_matches('/'))
        .map_err(|e| SyncError::config(format!("invalid endpoint path '{path}': {e}")))?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncErrorCode;

    #[test]
    fn joins_paths_under_base_with_or_without_trailing_slash() {
        for raw in ["http://192.168.1.15:5000", "http://192.168.1.15:5000/"] {
            let base = parse_base_url(raw).unwrap();
            let url = endpoint_url(&base, "/get_notes", &[("user_id", "7".to_string())]).unwrap();
            assert_eq!(url.as_str(), "http://192.168.1.15:5000/get_notes?user_id=7");
        }
    }

    #[test]
    fn keeps_base_path_prefix() {
        let base = parse_base_url("https://pantry.example.com/api").unwrap();
        let url = endpoint_url(&base, "/backend/add_note", &[]).unwrap();
        assert_eq!(url.as_str(), "https://pantry.example.com/api/backend/add_note");
    }

    #[test]
    fn encodes_search_terms() {
        let base = parse_base_url("http://127.0.0.1:5000").unwrap();
        let url = endpoint_url(
            &base,
            "/backend/search_pantry_item_by_name",
            &[("name", "oat milk & co".to_string())],
        )
        .unwrap();
        assert_eq!(url.query(), Some("name=oat+milk+%26+co"));
    }

    #[test]
    fn rejects_non_http_schemes_and_blank_urls() {
        assert_eq!(
            parse_base_url("ftp://example.com").unwrap_err().code,
            SyncErrorCode::Config
        );
        assert_eq!(parse_base_url("   ").unwrap_err().code, SyncErrorCode::Config);
    }
}
