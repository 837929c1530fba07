//! PII masking applied to display strings before rendering.
//!
//! The reveal flag is a single session-wide toggle held by the case session;
//! masking itself is a pure string transform with no side effects.

const TEXT_MASK_SUFFIX: &str = "••••";
const EMAIL_REDACTED: &str = "***";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskKind {
    #[default]
    Text,
    Email,
}

/// Redacts `text` unless `reveal` is set. Email addresses keep their domain
/// and the first character of the local part; anything that is not a
/// well-formed single-`@` address collapses to a fixed marker.
pub fn mask(text: &str, kind: MaskKind, reveal: bool) -> String {
    if reveal {
        return text.to_string();
    }
    if text.is_empty() {
        return String::new();
    }

    match kind {
        MaskKind::Email => match text.split_once('@') {
            Some((local, domain)) if !domain.contains('@') => {
                let initial: String = local.chars().take(1).collect();
                format!("{initial}***@{domain}")
            }
            _ => EMAIL_REDACTED.to_string(),
        },
        MaskKind::Text => {
            let initial: String = text.chars().take(1).collect();
            format!("{initial}{TEXT_MASK_SUFFIX}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_keeping_domain() {
        assert_eq!(
            mask("ab@example.com", MaskKind::Email, false),
            "a***@example.com"
        );
    }

    #[test]
    fn collapses_malformed_email_to_marker() {
        assert_eq!(mask("not-an-email", MaskKind::Email, false), "***");
        assert_eq!(mask("a@b@c", MaskKind::Email, false), "***");
    }

    #[test]
    fn masks_text_after_first_character() {
        assert_eq!(mask("Alice Smith", MaskKind::Text, false), "A••••");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(mask("", MaskKind::Text, false), "");
        assert_eq!(mask("", MaskKind::Email, false), "");
    }

    #[test]
    fn reveal_returns_input_unchanged() {
        for kind in [MaskKind::Text, MaskKind::Email] {
            assert_eq!(mask("ab@example.com", kind, true), "ab@example.com");
            assert_eq!(mask("203.0.113.7", kind, true), "203.0.113.7");
        }
    }
}
