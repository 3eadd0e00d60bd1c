use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

/// One half of a registrant's name, as typed into `rcp_user_first` or
/// `rcp_user_last`.
///
/// Unlike an email, a name is never rejected: it is cleaned up instead. Markup
/// is stripped, runs of whitespace (including newlines and tabs) collapse to a
/// single space, the ends are trimmed, and the result is capped at 256
/// graphemes. An empty name part is perfectly valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePart(String);

impl NamePart {
    pub fn sanitize(raw: &str) -> Self {
        let without_tags = strip_tags(raw);
        let collapsed = without_tags.split_whitespace().collect::<Vec<_>>().join(" ");
        let capped: String = collapsed.graphemes(true).take(MAX_GRAPHEMES).collect();
        Self(capped)
    }
}

impl AsRef<str> for NamePart {
    fn as_ref(&self) -> &str { &self.0 }
}

/// Drop everything between `<` and the next `>`. An unterminated `<` swallows
/// the rest of the input.
fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match (in_tag, c) {
            (false, '<') => in_tag = true,
            (false, c) => out.push(c),
            (true, '>') => in_tag = false,
            (true, _) => {}
        }
    }
    out
}

/// The contact name sent to GetResponse: first and last name joined by a
/// single space, even when one (or both) of them is empty.
pub fn compose_contact_name(
    first: &str,
    last: &str,
) -> String {
    format!("{first} {last}")
}
