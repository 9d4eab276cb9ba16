/// Derive a URL-safe slug from a title or name.
///
/// ASCII alphanumerics are lowercased; every other run of characters
/// collapses into a single hyphen. Leading and trailing hyphens are
/// stripped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn collapses_runs_of_separators() {
        assert_eq!(slugify("  Rust --  Web   Services "), "rust-web-services");
    }

    #[test]
    fn strips_leading_and_trailing_hyphens() {
        assert_eq!(slugify("...dots..."), "dots");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Top 10 Posts of 2025"), "top-10-posts-of-2025");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }
}
