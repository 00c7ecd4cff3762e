//! Chain-of-thought extraction.
//!
//! Models asked to reason out loud wrap that reasoning in
//! `<thinking>...</thinking>` before the answer. These helpers separate the
//! two without knowing anything about providers.

use regex_lite::Regex;
use std::sync::OnceLock;

fn thinking_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<thinking>.*?</thinking>").expect("static regex"))
}

/// Splits `text` into its thinking blocks (tags included) and the remainder.
///
/// Removal repeats until no complete block is left, so blocks that only
/// form after an inner block is removed are taken too. Every byte of the
/// input ends up in exactly one of the two outputs.
pub fn split_thinking(text: &str) -> (Vec<String>, String) {
    let re = thinking_re();
    let mut blocks = Vec::new();
    let mut rest = text.to_string();

    while re.is_match(&rest) {
        blocks.extend(re.find_iter(&rest).map(|m| m.as_str().to_string()));
        rest = re.replace_all(&rest, "").into_owned();
    }

    (blocks, rest)
}

/// Returns the thinking blocks of `text`, concatenated in order.
pub fn extract_thinking(text: &str) -> String {
    split_thinking(text).0.concat()
}

/// Returns `text` with every thinking block removed.
pub fn strip_thinking(text: &str) -> String {
    split_thinking(text).1
}

/// Reasoning inside the blocks without the tags, for display.
pub fn thinking_body(text: &str) -> Option<String> {
    let body = split_thinking(text)
        .0
        .iter()
        .map(|block| {
            block
                .trim_start_matches("<thinking>")
                .trim_end_matches("</thinking>")
                .trim()
        })
        .filter(|b| !b.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    (!body.is_empty()).then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "<thinking>\n1. renamed a field\n</thinking>\n{\"typ\":\"fix\"}";

    #[test]
    fn strips_block_and_keeps_answer() {
        assert_eq!(strip_thinking(REPLY), "\n{\"typ\":\"fix\"}");
    }

    #[test]
    fn strip_is_idempotent() {
        let once = strip_thinking(REPLY);
        assert_eq!(strip_thinking(&once), once);

        let nested = "<thi<thinking>a</thinking>nking>b</thinking>tail";
        let once = strip_thinking(nested);
        assert_eq!(once, "tail");
        assert_eq!(strip_thinking(&once), once);
    }

    #[test]
    fn extract_and_strip_partition_input() {
        for text in [REPLY, "no tags", "<thinking>x</thinking>a<thinking>y</thinking>b", ""] {
            let thought = extract_thinking(text);
            let rest = strip_thinking(text);
            assert_eq!(thought.len() + rest.len(), text.len(), "input: {text:?}");
        }
        assert_eq!(
            extract_thinking("<thinking>x</thinking>a<thinking>y</thinking>b"),
            "<thinking>x</thinking><thinking>y</thinking>"
        );
    }

    #[test]
    fn unterminated_block_is_left_alone() {
        let text = "<thinking> never closed {\"typ\":\"fix\"}";
        assert_eq!(strip_thinking(text), text);
        assert_eq!(extract_thinking(text), "");
    }

    #[test]
    fn body_drops_tags() {
        assert_eq!(thinking_body(REPLY).as_deref(), Some("1. renamed a field"));
        assert_eq!(thinking_body("plain"), None);
    }
}
