use url::Url;

/// Resolve an `open` target against the current location.
///
/// Absolute URLs are normalised; relative ones are joined onto `current`.
/// Anything unparseable is passed through untouched.
pub fn resolve_location(current: Option<&str>, target: &str) -> String {
    if let Ok(url) = Url::parse(target) {
        return url.to_string();
    }
    if let Some(base) = current.and_then(|c| Url::parse(c).ok())
        && let Ok(joined) = base.join(target)
    {
        return joined.to_string();
    }
    target.to_string()
}

pub fn same_location(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalised() {
        assert!(same_location("https://example.com", "https://example.com/"));
        assert!(!same_location(
            "https://example.com/a",
            "https://example.com/b"
        ));
    }

    #[test]
    fn relative_targets_join_the_current_page() {
        assert_eq!(
            resolve_location(Some("https://example.com/forms/start"), "step2"),
            "https://example.com/forms/step2"
        );
        assert_eq!(
            resolve_location(Some("https://example.com/forms/start"), "/home"),
            "https://example.com/home"
        );
    }

    #[test]
    fn unparseable_targets_pass_through() {
        assert_eq!(resolve_location(None, "not a url"), "not a url");
        assert!(same_location("about:blank", "about:blank"));
    }
}
