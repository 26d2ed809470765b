/// Split an identifier into words on separators and case boundaries.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();

    for chunk in input.split(|c: char| !c.is_alphanumeric()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                // fooBar -> foo|Bar, XMLHttp -> XML|Http, a1b -> a1|b
                let boundary = if c.is_uppercase() {
                    prev.is_lowercase()
                        || prev.is_ascii_digit()
                        || (prev.is_uppercase() && next_is_lower)
                } else {
                    c.is_lowercase() && prev.is_ascii_digit()
                };
                if boundary {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }

        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

/// Convert a wire key (`memo_visibility`, `telegram-user-id`, ...) to the
/// camelCase field name used on the client.
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (i, word) in split_words(input).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}
