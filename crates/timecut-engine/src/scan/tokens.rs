//! Cell text tokenization.

/// Characters stripped from both ends of every token.
const DECORATION: &[char] = &[' ', '(', ')', '[', ']'];

/// Split cell text on whitespace and strip bracket decoration from each token.
///
/// Tokens keep first-seen order; duplicates and tokens that were pure
/// decoration are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for raw in text.split_whitespace() {
        let token = strip_decoration(raw);
        if token.is_empty() || tokens.iter().any(|t| t == token) {
            continue;
        }
        tokens.push(token.to_string());
    }
    tokens
}

pub fn strip_decoration(token: &str) -> &str {
    token.trim_matches(DECORATION)
}
