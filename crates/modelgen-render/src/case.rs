//! Identifier case conversions exposed to templates.

const SEPARATORS: [char; 4] = ['-', ' ', '|', ':'];

/// Splits an identifier into words.
///
/// When the input contains `-`, space, `|` or `:` it is split on those
/// characters only. Otherwise it is treated as camelCase/PascalCase and
/// split before each uppercase letter that starts a new word; a run of
/// uppercase letters stays one word (`HTTPServer` → `HTTP`, `Server`).
pub fn split_words(input: &str) -> Vec<String> {
    if input.contains(SEPARATORS) {
        return input
            .split(SEPARATORS)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
    }

    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (idx, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|next| next.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn join_mapped(input: &str, separator: &str, map: fn(&str) -> String) -> String {
    split_words(input)
        .iter()
        .map(|word| map(word))
        .collect::<Vec<_>>()
        .join(separator)
}

/// `userAccount` → `user-account`
pub fn kebab_case(input: &str) -> String {
    join_mapped(input, "-", str::to_lowercase)
}

/// `userAccount` → `user_account`
pub fn snake_case(input: &str) -> String {
    join_mapped(input, "_", str::to_lowercase)
}

/// `userAccount` → `USER-ACCOUNT`
pub fn upper_kebab_case(input: &str) -> String {
    join_mapped(input, "-", str::to_uppercase)
}

/// `userAccount` → `USER_ACCOUNT`
pub fn upper_snake_case(input: &str) -> String {
    join_mapped(input, "_", str::to_uppercase)
}

/// `user account` → `UserAccount`
pub fn pascal_case(input: &str) -> String {
    join_mapped(input, "", capitalize)
}

/// `user account` → `userAccount`
pub fn camel_case(input: &str) -> String {
    split_words(input)
        .iter()
        .enumerate()
        .map(|(idx, word)| {
            if idx == 0 {
                word.to_lowercase()
            } else {
                capitalize(word)
            }
        })
        .collect()
}
