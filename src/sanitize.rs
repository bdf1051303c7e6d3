//! Flavor-text cleanup pipeline
//!
//! Raw species flavor text arrives with hard line breaks, form feeds, legacy
//! glyphs and missing post-punctuation spacing. The steps below run in a
//! fixed order; later steps assume the earlier ones already ran (the spacing
//! fix relies on line breaks having become spaces first).

/// Characters the sanitizer keeps besides ASCII alphanumerics and spaces.
const KEPT_PUNCTUATION: [char; 6] = ['.', ',', '?', '!', '\'', '-'];

/// Clean one raw flavor-text string. Pure and idempotent; empty in, empty out.
pub fn clean_flavor_text(raw: &str) -> String {
    let text = flatten_line_breaks(raw);
    let text = strip_foreign_chars(&text);
    let text = collapse_whitespace(&text);
    let text = space_after_punctuation(&text);
    brand_pokemon(&text)
}

/// Step 1: newline, form feed and carriage return each become a space.
pub fn flatten_line_breaks(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\n' | '\u{000C}' | '\r' => ' ',
            _ => ch,
        })
        .collect()
}

/// Step 2: drop everything that is not an ASCII letter or digit, a space,
/// kept punctuation, or `é` (either case).
pub fn strip_foreign_chars(text: &str) -> String {
    text.chars()
        .filter(|ch| {
            ch.is_ascii_alphanumeric()
                || *ch == ' '
                || KEPT_PUNCTUATION.contains(ch)
                || matches!(ch, 'é' | 'É')
        })
        .collect()
}

/// Step 3: collapse whitespace runs to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Step 4: insert a space after `. , ! ?` when a letter or digit follows
/// directly. Already-correct spacing is left alone.
pub fn space_after_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if matches!(ch, '.' | ',' | '!' | '?')
            && chars.peek().is_some_and(|next| next.is_ascii_alphanumeric())
        {
            out.push(' ');
        }
    }
    out
}

/// Step 5: canonicalize every `pok[eé]mon` occurrence, any casing, to the
/// literal `Pokémon`.
pub fn brand_pokemon(text: &str) -> String {
    const CANONICAL: &str = "Pokémon";
    const FOLDED: [char; 7] = ['p', 'o', 'k', 'e', 'm', 'o', 'n'];

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let window = &chars[i..chars.len().min(i + FOLDED.len())];
        let is_match = window.len() == FOLDED.len()
            && window
                .iter()
                .zip(FOLDED)
                .all(|(ch, folded)| fold_char(*ch) == folded);
        if is_match {
            out.push_str(CANONICAL);
            i += FOLDED.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

fn fold_char(ch: char) -> char {
    match ch {
        'é' | 'É' => 'e',
        _ => ch.to_ascii_lowercase(),
    }
}
