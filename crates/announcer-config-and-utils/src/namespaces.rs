//! Namespace list parsing.
//!
//! A namespace filter is written either as `all` (no restriction) or as a
//! comma separated list of non-negative namespace numbers, e.g. `0, 4, 14`.

use crate::{CoreError, CoreResult};

/// Parse a namespace filter. `all` yields an empty list.
pub fn parse_namespaces(raw: &str) -> CoreResult<Vec<u32>> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(Vec::new());
    }

    trimmed
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u32>().map_err(|_| {
                CoreError::Config(format!(
                    "invalid namespace '{}': expected 'all' or comma separated non-negative numbers",
                    part
                ))
            })
        })
        .collect()
}

/// Render a namespace filter back to its textual form.
pub fn format_namespaces(namespaces: &[u32]) -> String {
    if namespaces.is_empty() {
        return "all".to_string();
    }
    namespaces
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_means_no_restriction() {
        assert_eq!(parse_namespaces("all").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_namespaces(" ALL ").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn parses_comma_list_with_whitespace() {
        assert_eq!(parse_namespaces("0").unwrap(), vec![0]);
        assert_eq!(parse_namespaces("0 , 4,14").unwrap(), vec![0, 4, 14]);
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert!(parse_namespaces("-1").is_err());
        assert!(parse_namespaces("0,main").is_err());
        assert!(parse_namespaces("").is_err());
        assert!(parse_namespaces("0,,1").is_err());
    }

    #[test]
    fn formats_like_it_parses() {
        assert_eq!(format_namespaces(&[]), "all");
        assert_eq!(format_namespaces(&[0, 4]), "0, 4");
        assert_eq!(parse_namespaces(&format_namespaces(&[1, 2])).unwrap(), vec![1, 2]);
    }
}
