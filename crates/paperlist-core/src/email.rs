//! Email-shaped token detection in free text

/// Punctuation that commonly wraps an address in affiliation text
const WRAPPING: &[char] = &[
    '.', ',', ';', ':', '(', ')', '<', '>', '[', ']', '"', '\'',
];

/// First `local@domain.tld` token in `text`, with wrapping punctuation removed.
pub fn find_email(text: &str) -> Option<&str> {
    email_tokens(text).next()
}

/// All email-shaped tokens in `text`, in order of appearance.
pub fn email_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(WRAPPING))
        .filter(|token| is_email(token))
}

/// Whether `token` has the shape `local@domain.tld`.
pub fn is_email(token: &str) -> bool {
    let Some((local, domain)) = token.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    if !local_ok || local.starts_with('.') || local.ends_with('.') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld = labels[labels.len() - 1];
    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
