/// Characters stripped from both ends of a keyword: list brackets and quotes
/// left over from list-form skillsets such as `['python', 'sql']`.
const KEYWORD_TRIM: [char; 3] = ['[', ']', '\''];

/// Normalize a keyword: lowercase, then trim brackets, quotes and whitespace.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword
        .to_lowercase()
        .trim_matches(|c: char| KEYWORD_TRIM.contains(&c) || c.is_whitespace())
        .to_string()
}

/// Normalize document text for matching.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

/// Split a comma-separated skillset into raw keyword tokens.
pub fn split_skillset(skillset: &str) -> Vec<String> {
    skillset.split(',').map(str::to_string).collect()
}
