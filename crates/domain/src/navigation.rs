//! Construction of cross-portal navigation URLs.

use url::Url;

use crate::error::{DomainError, DomainResult};

/// Query parameter carrying the delegated token.
pub const AUTH_TOKEN_PARAM: &str = "auth_token";

/// Query parameter flagging a cross-portal-authenticated entry.
pub const PORTAL_AUTH_PARAM: &str = "portal_auth";

/// Builds `<origin>/<path>?auth_token=<token>&portal_auth=true`.
///
/// The path is resolved against the origin root, so `dashboard` and
/// `/dashboard` are equivalent. Query pairs already present on the path
/// are kept ahead of the auth parameters.
///
/// # Errors
/// Returns `InvalidPath` if the path is absolute (has its own scheme or
/// host) or cannot be joined onto the origin.
pub fn build_portal_url(base_url: &Url, path: Option<&str>, token: &str) -> DomainResult<Url> {
    let path = path.map(str::trim).filter(|p| !p.is_empty()).unwrap_or("/");

    if path.starts_with("//") || Url::parse(path).is_ok() {
        return Err(DomainError::InvalidPath(path.to_string()));
    }

    let rooted = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let mut url = base_url
        .join(&rooted)
        .map_err(|e| DomainError::InvalidPath(format!("{path}: {e}")))?;

    if url.origin() != base_url.origin() {
        return Err(DomainError::InvalidPath(path.to_string()));
    }

    url.query_pairs_mut()
        .append_pair(AUTH_TOKEN_PARAM, token)
        .append_pair(PORTAL_AUTH_PARAM, "true");

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://cave.example.com").unwrap()
    }

    #[test]
    fn test_root_when_no_path() {
        let url = build_portal_url(&base(), None, "t1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cave.example.com/?auth_token=t1&portal_auth=true"
        );
    }

    #[test]
    fn test_relative_and_rooted_paths_match() {
        let a = build_portal_url(&base(), Some("members/42"), "t1").unwrap();
        let b = build_portal_url(&base(), Some("/members/42"), "t1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.path(), "/members/42");
    }

    #[test]
    fn test_existing_query_is_preserved() {
        let url = build_portal_url(&base(), Some("/search?q=laser"), "t1").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "laser".to_string()),
                ("auth_token".to_string(), "t1".to_string()),
                ("portal_auth".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_token_is_percent_encoded() {
        let url = build_portal_url(&base(), None, "a b&c").unwrap();
        assert!(url.as_str().contains("auth_token=a+b%26c"));
    }

    #[test]
    fn test_foreign_origin_is_rejected() {
        assert!(matches!(
            build_portal_url(&base(), Some("https://evil.example.com/"), "t1"),
            Err(DomainError::InvalidPath(_))
        ));
        assert!(matches!(
            build_portal_url(&base(), Some("//evil.example.com/x"), "t1"),
            Err(DomainError::InvalidPath(_))
        ));
    }
}
