use once_cell::sync::Lazy;
use regex::Regex;

// Terminal punctuation, a whitespace run, then the first character of the next
// sentence. The leading character is matched rather than looked ahead, so the
// split point is recovered from the match bounds.
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?।]\s+[\p{Lu}0-9०-९]").expect("sentence boundary pattern is valid")
});

/// Split text into trimmed, non-empty sentences.
///
/// A boundary is terminal punctuation (`.`, `!`, `?`, `।`) followed by
/// whitespace and an uppercase letter or an ASCII/Devanagari digit. The
/// whitespace between sentences is dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BOUNDARY.find_iter(text) {
        let matched = m.as_str();
        let punct_len = matched.chars().next().map_or(1, char::len_utf8);
        let lead_len = matched.chars().next_back().map_or(0, char::len_utf8);

        push_trimmed(&mut sentences, &text[start..m.start() + punct_len]);
        start = m.end() - lead_len;
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        out.push(fragment);
    }
}

/// Length in characters, the unit every size bound is expressed in
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_terminal_punctuation_before_capital() {
        let text = "First rule applies. Second rule follows! Is it third? Yes.";
        assert_eq!(
            split_sentences(text),
            vec![
                "First rule applies.",
                "Second rule follows!",
                "Is it third?",
                "Yes."
            ]
        );
    }

    #[test]
    fn keeps_lowercase_continuations_together() {
        let text = "Refer to e.g. the annex. Then proceed.";
        assert_eq!(
            split_sentences(text),
            vec!["Refer to e.g. the annex.", "Then proceed."]
        );
    }

    #[test]
    fn splits_before_digits() {
        let text = "See the table. 12 bids were received.";
        assert_eq!(
            split_sentences(text),
            vec!["See the table.", "12 bids were received."]
        );
    }

    #[test]
    fn handles_devanagari_terminator_and_digits() {
        let text = "यह पहला वाक्य है। २ यह दूसरा है।";
        assert_eq!(split_sentences(text), vec!["यह पहला वाक्य है।", "२ यह दूसरा है।"]);
    }

    #[test]
    fn drops_empty_and_whitespace_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t ").is_empty());
    }

    #[test]
    fn newline_counts_as_whitespace() {
        let text = "Clause one ends.\n\nClause two starts.";
        assert_eq!(
            split_sentences(text),
            vec!["Clause one ends.", "Clause two starts."]
        );
    }

    #[test]
    fn char_len_counts_scalars_not_bytes() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("है।"), 3);
    }
}
