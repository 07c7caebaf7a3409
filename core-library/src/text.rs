//! Name normalization shared by search indexing and ordering

const QUOTES: &[char] = &['\'', '"', '`', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// Splits text into lower-cased search words.
///
/// Quotes are dropped (`"Don't"` becomes `dont`) and any other character that
/// is not a letter, digit or whitespace separates words.
pub fn search_tokens(text: &str) -> Vec<String> {
    let cleared: String = text
        .chars()
        .filter(|c| !QUOTES.contains(c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleared.split_whitespace().map(str::to_string).collect()
}

/// Sorted, de-duplicated words of all inputs joined by single spaces
pub fn sanitize_strings(texts: &[&str]) -> String {
    let mut words: Vec<String> = texts.iter().flat_map(|t| search_tokens(t)).collect();
    words.sort();
    words.dedup();
    words.join(" ")
}

/// Value stored in the `full_text` column. The leading space lets searches
/// anchor a token at a word start with `LIKE '% token%'`.
pub fn format_full_text(texts: &[&str]) -> String {
    format!(" {}", sanitize_strings(texts))
}

/// Lower-cased name with a leading ignored article removed
pub fn order_name(name: &str, ignored_articles: &[String]) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();

    for article in ignored_articles {
        let prefix = format!("{} ", article.to_lowercase());
        if let Some(rest) = lower.strip_prefix(&prefix) {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }

    lower
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles() -> Vec<String> {
        "The El La Los Las Le Les Os As O A"
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_full_text_sorts_and_dedups_words() {
        assert_eq!(
            format_full_text(&["Eddie Van Halen", "Van Halen, Eddie"]),
            " eddie halen van"
        );
    }

    #[test]
    fn test_search_tokens_strip_punctuation() {
        assert_eq!(search_tokens("AC/DC"), vec!["ac", "dc"]);
        assert_eq!(search_tokens("Guns N' Roses"), vec!["guns", "n", "roses"]);
        assert_eq!(search_tokens("Don't Stop"), vec!["dont", "stop"]);
        assert!(search_tokens("  ;:, ").is_empty());
    }

    #[test]
    fn test_full_text_of_empty_name() {
        assert_eq!(format_full_text(&["", ""]), " ");
    }

    #[test]
    fn test_order_name_strips_leading_article() {
        assert_eq!(order_name("The Beatles", &articles()), "beatles");
        assert_eq!(order_name("Los Lobos", &articles()), "lobos");
        assert_eq!(order_name("Kraftwerk", &articles()), "kraftwerk");
    }

    #[test]
    fn test_order_name_keeps_article_only_names() {
        assert_eq!(order_name("The", &articles()), "the");
        assert_eq!(order_name("Theatre of Tragedy", &articles()), "theatre of tragedy");
    }
}
