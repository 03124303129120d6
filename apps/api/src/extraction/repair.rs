//! Bounded textual repairs for near-miss JSON from language models.
//!
//! Only two repairs exist: single-quoted strings become double-quoted, and
//! trailing commas before `}` / `]` are dropped. Both leave the contents of
//! double-quoted strings untouched.

/// Applies every repair in order.
pub fn repair_json(text: &str) -> String {
    strip_trailing_commas(&requote_single_quoted(text))
}

/// Rewrites `'key': 'value'` style strings with double quotes.
///
/// Inside a single-quoted string `\'` becomes a plain apostrophe and a bare
/// `"` is escaped.
pub fn requote_single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push('"');
                copy_double_quoted(&mut chars, &mut out);
            }
            '\'' => {
                out.push('"');
                while let Some(c) = chars.next() {
                    match c {
                        '\'' => break,
                        '"' => out.push_str("\\\""),
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some(escaped) => {
                                out.push('\\');
                                out.push(escaped);
                            }
                            None => out.push('\\'),
                        },
                        _ => out.push(c),
                    }
                }
                out.push('"');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Removes commas that are followed (after optional whitespace) by `}` or `]`.
pub fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Copies the rest of a double-quoted string (the opening quote is already
/// written) through its closing quote.
fn copy_double_quoted(chars: &mut std::str::Chars<'_>, out: &mut String) {
    let mut escaped = false;
    for c in chars.by_ref() {
        out.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return;
        }
    }
}
