//! Turning item titles into file names.
//!
//! Every article lives at `<feed_directory>/<source>/<name>`, where `<name>`
//! is derived from the item title here.  The mapping has to be deterministic:
//! the next run recognises an already-downloaded item only because its title
//! produces the same name again.

/// Upper bound for a file name, in bytes.  Most filesystems cap a single
/// path component at 255 bytes.
pub const MAX_FILE_NAME_LENGTH: usize = 255;

/// Characters that are never allowed in a file name on any platform we care
/// about.
const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Trim the title and strip path separators, reserved characters and control
/// characters.  Everything else (including non-ASCII text) passes through.
///
/// Returns an empty string when nothing usable is left; callers treat that as
/// "unnamed" and skip the item.
pub fn safe_article_name(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter(|c| !FORBIDDEN.contains(c) && (*c as u32) >= 32)
        .collect()
}

/// Cut `s` to at most `max` bytes without splitting a multi-byte character.
///
/// Strings already within the limit are returned unchanged.
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// The file name an item with this title is stored under.
pub fn article_file_name(title: &str) -> String {
    let safe = safe_article_name(title);
    truncate(&safe, MAX_FILE_NAME_LENGTH).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_reserved_characters() {
        let cases = [
            ("  hello world  ", "hello world"),
            ("question?mark", "questionmark"),
            ("slash/path", "slashpath"),
            ("back\\slash", "backslash"),
            ("colon:name", "colonname"),
            ("|pipes|", "pipes"),
            ("<a href=\"x\">*</a>", "a href=xa"),
            ("\nnew\nlines", "newlines"),
            ("tab\tbed", "tabbed"),
            ("", ""),
            ("   ", ""),
        ];

        for (input, want) in cases {
            assert_eq!(safe_article_name(input), want, "input {input:?}");
        }
    }

    #[test]
    fn keeps_non_ascii() {
        assert_eq!(safe_article_name("Café – Ünïcode 我"), "Café – Ünïcode 我");
    }

    #[test]
    fn only_reserved_characters_yields_empty() {
        assert_eq!(article_file_name("/?*:|"), "");
    }

    #[test]
    fn truncate_is_identity_within_limit() {
        let short = "我".repeat(32);
        assert_eq!(truncate(&short, MAX_FILE_NAME_LENGTH), short);
        assert_eq!(truncate("short", MAX_FILE_NAME_LENGTH), "short");

        // 85 x 3 bytes = exactly 255
        let exact = "我".repeat(85);
        assert_eq!(truncate(&exact, MAX_FILE_NAME_LENGTH), exact);
    }

    #[test]
    fn truncate_never_splits_a_character() {
        // 3-byte characters: 255 bytes is a boundary, 256 would not be.
        let long = "我".repeat(256);
        let cut = truncate(&long, MAX_FILE_NAME_LENGTH);
        assert_eq!(cut.len(), 255);
        assert_eq!(cut.chars().count(), 85);

        // Limit falling mid-character shortens to the previous boundary.
        assert_eq!(truncate("aé", 2), "a");
        assert_eq!(truncate("我我", 4), "我");
    }

    #[test]
    fn truncate_to_zero_is_empty() {
        assert_eq!(truncate("abc", 0), "");
        assert_eq!(truncate("我", 2), "");
    }

    #[test]
    fn file_name_is_bounded_and_clean() {
        let title = format!("{}/{}", "a".repeat(200), "b?".repeat(200));
        let name = article_file_name(&title);

        assert!(name.len() <= MAX_FILE_NAME_LENGTH);
        assert!(!name.contains(FORBIDDEN));
        assert!(name.chars().all(|c| c as u32 >= 32));
    }

    #[test]
    fn file_name_is_deterministic() {
        let title = "Example Article / 1?";
        assert_eq!(article_file_name(title), article_file_name(title));
        assert_eq!(article_file_name(title), "Example Article  1");
    }
}
