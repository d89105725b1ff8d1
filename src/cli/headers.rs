//! `--extra-headers` parsing
//!
//! One `key: value` pair per line. Keys are lower-cased; a repeated key
//! joins its values with `, `.

use crate::errors::{BrokerError, Result};
use crate::models::HeaderMap;

/// Fold header lines into `initial`, returning the combined map.
pub fn parse_extra_headers(input: &str, initial: HeaderMap) -> Result<HeaderMap> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .try_fold(initial, |headers, line| fold_header_line(headers, line))
}

fn fold_header_line(mut headers: HeaderMap, line: &str) -> Result<HeaderMap> {
    let (key, value) = line.split_once(':').ok_or_else(|| {
        BrokerError::Configuration(format!("Invalid header line (expected 'key: value'): {}", line))
    })?;

    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return Err(BrokerError::Configuration(format!(
            "Invalid header line (empty name): {}",
            line
        )));
    }
    let value = value.trim();

    match headers.get_mut(&key) {
        Some(existing) => {
            existing.push_str(", ");
            existing.push_str(value);
        }
        None => {
            headers.insert(key, value.to_string());
        }
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        let headers = parse_extra_headers("X-Team: platform\n\n  Accept : text/plain  \n", HeaderMap::new()).unwrap();
        let pairs: Vec<_> = headers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("x-team", "platform"), ("accept", "text/plain")]);
    }

    #[test]
    fn test_duplicate_keys_joined() {
        let headers = parse_extra_headers("X-A: 1\nx-a: 2\nX-B: 3\nX-A: 4", HeaderMap::new()).unwrap();
        assert_eq!(headers["x-a"], "1, 2, 4");
        assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["x-a", "x-b"]);
    }

    #[test]
    fn test_value_keeps_colons() {
        let headers = parse_extra_headers("x-forwarded-for: http://proxy:8080", HeaderMap::new()).unwrap();
        assert_eq!(headers["x-forwarded-for"], "http://proxy:8080");
    }

    #[test]
    fn test_folds_over_initial() {
        let mut initial = HeaderMap::new();
        initial.insert("x-team".to_string(), "platform".to_string());
        let headers = parse_extra_headers("X-Team: infra", initial).unwrap();
        assert_eq!(headers["x-team"], "platform, infra");
    }

    #[test]
    fn test_line_without_colon_rejected() {
        let err = parse_extra_headers("not-a-header", HeaderMap::new()).unwrap_err();
        assert!(matches!(err, BrokerError::Configuration(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_extra_headers("  \n\n", HeaderMap::new()).unwrap().is_empty());
    }
}
