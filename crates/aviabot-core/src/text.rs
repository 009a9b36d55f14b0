/// Title-case a string: the first alphabetic character of every word is
/// uppercased and the rest lowercased, where a word boundary is any
/// non-alphabetic character. City names are stored and validated in this
/// canonical form, so "санкт-петербург" becomes "Санкт-Петербург".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Drop the last character of a string, if any.
pub fn strip_last_char(input: &str) -> String {
    let mut chars = input.chars();
    chars.next_back();
    chars.as_str().to_string()
}
