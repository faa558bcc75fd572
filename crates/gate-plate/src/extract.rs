use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const FALLBACK_MIN_LEN: usize = 6;
const FALLBACK_MAX_LEN: usize = 12;
const FALLBACK_KEEP_LEN: usize = 10;

/// Which rule produced a plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchSource {
    Compact,
    Spaced,
    Hyphenated,
    Cleaned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlateMatch {
    pub plate: String,
    pub source: MatchSource,
}

// Two letters, one or two digits, one to three letters, one to four digits.
static PLATE_PATTERNS: Lazy<[(MatchSource, Regex); 3]> = Lazy::new(|| {
    [
        (
            MatchSource::Compact,
            Regex::new(r"[A-Z]{2}[0-9]{1,2}[A-Z]{1,3}[0-9]{1,4}").expect("compact plate pattern"),
        ),
        (
            MatchSource::Spaced,
            Regex::new(r"[A-Z]{2}\s*[0-9]{1,2}\s*[A-Z]{1,3}\s*[0-9]{1,4}")
                .expect("spaced plate pattern"),
        ),
        (
            MatchSource::Hyphenated,
            Regex::new(r"[A-Z]{2}-[0-9]{1,2}-[A-Z]{1,3}-[0-9]{1,4}")
                .expect("hyphenated plate pattern"),
        ),
    ]
});

/// Pulls a plate number out of raw recognizer output.
///
/// Patterns are tried in order and the leftmost match of the first pattern
/// that hits wins. When none hit, the text is reduced to `A-Z0-9` and kept if
/// it has a plausible length. Matching is case-sensitive: recognizers report
/// plates in capitals and lowercase noise is discarded.
pub fn extract_plate(raw: &str) -> Option<PlateMatch> {
    for (source, pattern) in PLATE_PATTERNS.iter() {
        if let Some(found) = pattern.find(raw) {
            let plate = strip_separators(found.as_str());
            debug!(?source, %plate, "plate pattern matched");
            return Some(PlateMatch {
                plate,
                source: *source,
            });
        }
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();
    if (FALLBACK_MIN_LEN..=FALLBACK_MAX_LEN).contains(&cleaned.len()) {
        let plate: String = cleaned.chars().take(FALLBACK_KEEP_LEN).collect();
        debug!(%plate, "plate recovered from cleaned text");
        return Some(PlateMatch {
            plate,
            source: MatchSource::Cleaned,
        });
    }

    debug!(cleaned_len = cleaned.len(), "no plate in recognized text");
    None
}

fn strip_separators(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate(raw: &str) -> Option<String> {
        extract_plate(raw).map(|m| m.plate)
    }

    #[test]
    fn clean_input_is_returned_unchanged() {
        let found = extract_plate("KA01AB1234").expect("match");
        assert_eq!(found.plate, "KA01AB1234");
        assert_eq!(found.source, MatchSource::Compact);
    }

    #[test]
    fn separators_are_stripped() {
        let spaced = extract_plate("KA 01 AB 1234").expect("spaced");
        assert_eq!(spaced.plate, "KA01AB1234");
        assert_eq!(spaced.source, MatchSource::Spaced);

        let hyphenated = extract_plate("KA-01-AB-1234").expect("hyphenated");
        assert_eq!(hyphenated.plate, "KA01AB1234");
        assert_eq!(hyphenated.source, MatchSource::Hyphenated);
    }

    #[test]
    fn plate_is_found_inside_noisy_multiline_text() {
        let raw = "  ~ IND |\nMH 12 DE 1433 .\n";
        assert_eq!(plate(raw).as_deref(), Some("MH12DE1433"));
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            plate("DL3CAF4321 then KA01AB1234").as_deref(),
            Some("DL3CAF4321")
        );
    }

    #[test]
    fn fallback_length_bounds() {
        assert_eq!(plate("A1B2C"), None);
        assert_eq!(plate("A1-B2 C3").as_deref(), Some("A1B2C3"));
        assert_eq!(plate("A1B2C3D4E5F6").as_deref(), Some("A1B2C3D4E5"));
        assert_eq!(plate("A1B2C3D4E5F6G"), None);
    }

    #[test]
    fn fallback_drops_lowercase_noise() {
        let found = extract_plate("x1y A1b B2c C3").expect("fallback");
        assert_eq!(found.plate, "1A1B2C3");
        assert_eq!(found.source, MatchSource::Cleaned);
    }

    #[test]
    fn empty_text_is_not_a_plate() {
        assert_eq!(plate(""), None);
        assert_eq!(plate("\n \t"), None);
    }
}
