//! Slugification for cache slots and public path segments.

/// Turn arbitrary text into a lowercase ASCII slug.
///
/// Unicode is transliterated, every run of characters outside `[a-z0-9]`
/// becomes a single `-`, and dashes are trimmed from both ends.
///
/// # Examples
/// ```ignore
/// assert_eq!(slugify("fonts.googleapis.com/css-family=Inter"), "fonts-googleapis-com-css-family-inter");
/// assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
/// ```
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_ascii_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("fonts.googleapis.com/css-family=Inter"),
            "fonts-googleapis-com-css-family-inter"
        );
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("--a__b--"), "a-b");
        assert_eq!(slugify(""), "");
    }
}
