//! Field-name to column-name derivation.

/// Convert a PascalCase or camelCase name to snake_case.
///
/// Consecutive uppercase runs collapse into one word so acronyms stay intact:
/// `UserID` becomes `user_id` and `HTMLParser` becomes `html_parser`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && !chars[i - 1].is_uppercase();
            let next_lower = i > 0 && i < chars.len() - 1 && !chars[i + 1].is_uppercase();
            if prev_lower || next_lower {
                out.push('_');
            }
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            out.push(c);
        }
    }
    out
}
