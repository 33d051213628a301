/// Normalize a candidate tag: trimmed, `None` when nothing is left
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split `text` on any of `delimiters`.
///
/// Returns the completed tags (trimmed, empties dropped) and the trailing
/// text that was not terminated by a delimiter.
pub fn split_tags(text: &str, delimiters: &[char]) -> (Vec<String>, String) {
    let mut tags = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if delimiters.contains(&ch) {
            if let Some(tag) = normalize_tag(&current) {
                tags.push(tag);
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }

    (tags, current)
}

/// Split `text` and treat the remainder as a final tag, as a blur would
pub fn parse_tags(text: &str, delimiters: &[char]) -> Vec<String> {
    let (mut tags, rest) = split_tags(text, delimiters);
    if let Some(tag) = normalize_tag(&rest) {
        tags.push(tag);
    }
    tags
}

/// Delimiters that are actually in force once `allow_spaces_in_tags` is applied
pub fn effective_delimiters(delimiters: &[char], allow_spaces_in_tags: bool) -> Vec<char> {
    delimiters
        .iter()
        .copied()
        .filter(|c| !(allow_spaces_in_tags && *c == ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_space_and_keeps_remainder() {
        let (tags, rest) = split_tags("first second thi", &[' ']);
        assert_eq!(tags, vec!["first", "second"]);
        assert_eq!(rest, "thi");
    }

    #[test]
    fn repeated_delimiters_produce_no_empty_tags() {
        let (tags, rest) = split_tags(" ,a,, b ,", &[' ', ',']);
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(rest, "");
    }

    #[test]
    fn parse_tags_commits_the_remainder() {
        assert_eq!(parse_tags("some tag", &[' ']), vec!["some", "tag"]);
        assert!(parse_tags("   ", &[' ']).is_empty());
    }

    #[test]
    fn allowing_spaces_drops_space_delimiter() {
        assert_eq!(effective_delimiters(&[' ', ','], true), vec![',']);
        assert_eq!(effective_delimiters(&[' ', ','], false), vec![' ', ',']);

        let delims = effective_delimiters(&[' ', ','], true);
        assert_eq!(parse_tags("multiple words rock", &delims), vec!["multiple words rock"]);
    }
}
