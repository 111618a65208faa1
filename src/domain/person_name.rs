use unicode_segmentation::UnicodeSegmentation;

const FORBIDDEN_CHARS: [char; 9] = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
const MAX_GRAPHEMES: usize = 256;

/// A display name that is safe to embed in an HTML email body.
#[derive(Debug, Clone)]
pub struct PersonName(String);

impl PersonName {
    pub fn parse(s: &str) -> Result<PersonName, String> {
        let is_empty = s.trim().is_empty();

        let is_too_long = s.graphemes(true).count() > MAX_GRAPHEMES;

        let contains_forbidden_chars = s.chars().any(|c| FORBIDDEN_CHARS.contains(&c));

        if is_empty || is_too_long || contains_forbidden_chars {
            Err(format!("{} is not a valid name.", s))
        } else {
            Ok(Self(s.to_string()))
        }
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
