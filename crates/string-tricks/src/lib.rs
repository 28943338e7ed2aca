//! Demo text transforms.
//!
//! Both transforms only touch non-whitespace characters; whitespace is
//! copied through unchanged.

/// Emoji printed next to [`hacker_case`] output in the demo.
pub const HACKER_EMOJI: &str = "😎";

/// Emoji printed next to [`hangman`] output in the demo.
pub const HANGMAN_EMOJI: &str = "🤕";

/// Alternate the case of every non-whitespace character, starting with
/// upper case: `"hello world"` becomes `"HeLlO wOrLd"`. The first character
/// is upper cased on purpose, so output always opens with a capital.
/// Whitespace does not advance the alternation.
pub fn hacker_case(text: &str) -> String {
    let mut upper_next = true;
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if c.is_whitespace() {
            out.push(c);
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper_next = !upper_next;
    }

    out
}

/// Replace every non-whitespace character with `-`.
pub fn hangman(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() { c } else { '-' })
        .collect()
}

/// Lines logged by the demo entry point for `text`.
pub fn demo_lines(text: &str) -> Vec<String> {
    vec![
        text.to_string(),
        format!("{} {}", HACKER_EMOJI, hacker_case(text)),
        format!("{} {}", HANGMAN_EMOJI, hangman(text)),
    ]
}
