//! Minimal English inflections for field and model names.
//!
//! Covers the cases form naming needs: `CamelCase` and `::` namespaces to
//! snake case, regular plurals, and human-readable labels.

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// `"Admin::SignUp"` becomes `"admin/sign_up"`.
pub fn underscore(word: &str) -> String {
    let word = word.replace("::", "/");
    let mut out = String::with_capacity(word.len() + 4);
    let mut prev: Option<char> = None;
    let mut chars = word.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_uppercase() {
            let next_is_lower = chars.peek().is_some_and(|n| n.is_lowercase());
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next_is_lower,
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == '-' {
            out.push('_');
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Last path segment of a namespaced name: `"admin/sign_up"` becomes `"sign_up"`.
pub fn demodulize(path: &str) -> &str {
    path.rsplit(['/', ':']).next().unwrap_or(path)
}

pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let (head, last) = match word.rfind(['/', '_']) {
        Some(i) => word.split_at(i + 1),
        None => ("", word),
    };
    format!("{}{}", head, pluralize_word(last))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if lower == "person" {
        return format!("{}eople", &word[..1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        return format!("{}es", word);
    }
    if let Some(stem) = lower.strip_suffix('y') {
        let before_vowel = stem.ends_with(['a', 'e', 'i', 'o', 'u']);
        if !stem.is_empty() && !before_vowel {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }
    format!("{}s", word)
}

/// `"account_name"` becomes `"Account name"`; a trailing `_id` is dropped.
pub fn humanize(word: &str) -> String {
    let word = word.strip_suffix("_id").unwrap_or(word);
    let spaced = word.replace('_', " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
