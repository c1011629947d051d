// security/src/middleware.rs

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Picks the request token: the bearer header wins over a `?token=` query value.
pub fn resolve_token<'a>(header: Option<&'a str>, query: Option<&'a str>) -> Option<&'a str> {
    bearer_token(header).or_else(|| query.map(str::trim).filter(|token| !token.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_strip_bearer_prefix() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("Bearer   ")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn should_prefer_header_over_query() {
        assert_eq!(resolve_token(Some("Bearer header"), Some("query")), Some("header"));
        assert_eq!(resolve_token(None, Some("query")), Some("query"));
        assert_eq!(resolve_token(Some("garbage"), Some("")), None);
    }
}
