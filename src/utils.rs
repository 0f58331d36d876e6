/// First value of the `token` query parameter; later repeats are ignored.
pub fn first_token(query: &[(String, String)]) -> Option<&str> {
    query
        .iter()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.as_str())
}

/// Helper function for checking the shared-secret token.
/// A missing token never matches.
pub fn verify_token(expected: &str, supplied: Option<&str>) -> bool {
    match supplied {
        Some(token) => token == expected,
        None => false,
    }
}
