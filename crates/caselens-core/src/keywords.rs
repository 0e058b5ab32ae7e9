//! Splitting a labeling-service response into keywords.
//!
//! The service answers in free text: sometimes a single title, sometimes a
//! list joined by commas, ideographic commas, semicolons, spaces, or newlines.
//! [`parse_keywords`] tries each separator in turn and keeps the first one
//! that yields more than one token. It is a heuristic, not a grammar.

/// Separators tried in order.
pub const SEPARATORS: [&str; 7] = [",", "，", " ", "、", "\n", "；", ";"];

/// Split `response` into trimmed, non-empty keywords.
///
/// Returns the whole trimmed response as one keyword when no separator
/// produces at least two tokens, and an empty list for a blank response.
pub fn parse_keywords(response: &str) -> Vec<String> {
    let response = response.trim();
    if response.is_empty() {
        return Vec::new();
    }

    for sep in SEPARATORS {
        if !response.contains(sep) {
            continue;
        }
        let parts: Vec<String> = response
            .split(sep)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        if parts.len() > 1 {
            return parts;
        }
    }

    vec![response.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_title() {
        assert_eq!(parse_keywords("  車禍損害賠償  "), vec!["車禍損害賠償"]);
    }

    #[test]
    fn test_comma_separated() {
        assert_eq!(
            parse_keywords("contract, breach ,damages"),
            vec!["contract", "breach", "damages"]
        );
    }

    #[test]
    fn test_ideographic_comma() {
        assert_eq!(parse_keywords("詐欺、竊盜、洗錢"), vec!["詐欺", "竊盜", "洗錢"]);
    }

    #[test]
    fn test_fullwidth_comma_and_semicolon() {
        assert_eq!(parse_keywords("租賃，押金"), vec!["租賃", "押金"]);
        assert_eq!(parse_keywords("lease；deposit"), vec!["lease", "deposit"]);
        assert_eq!(parse_keywords("lease;deposit"), vec!["lease", "deposit"]);
    }

    #[test]
    fn test_whitespace_and_newlines() {
        assert_eq!(parse_keywords("tax  appeal"), vec!["tax", "appeal"]);
        assert_eq!(parse_keywords("tax\nappeal"), vec!["tax", "appeal"]);
    }

    #[test]
    fn test_comma_takes_precedence_over_space() {
        assert_eq!(
            parse_keywords("traffic accident, insurance claim"),
            vec!["traffic accident", "insurance claim"]
        );
    }

    #[test]
    fn test_separator_without_second_token_is_ignored() {
        assert_eq!(parse_keywords("labour dispute,"), vec!["labour", "dispute,"]);
        assert_eq!(parse_keywords("single,"), vec!["single,"]);
    }

    #[test]
    fn test_blank_response() {
        assert!(parse_keywords("   \n ").is_empty());
    }
}
