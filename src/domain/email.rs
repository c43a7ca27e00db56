use serde::{Deserialize, Serialize};

/// Opaque backend identifier (e.g. "197640cc612987c5").
pub type EmailId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSummary {
    pub id: EmailId,
    pub sender: String,
    pub subject: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub timestamp: String,

    /// Transient client-side marker: an analysis request for this email is
    /// in flight. Never sent to or received from the backend.
    #[serde(skip)]
    pub is_analyzing: bool,
}

impl EmailSummary {
    /// Display name part of the sender ("Jane <jane@x.com>" -> "Jane").
    pub fn sender_name(&self) -> &str {
        match self.sender.split_once('<') {
            Some((name, _)) if !name.trim().is_empty() => name.trim(),
            _ => self.sender.trim(),
        }
    }

    /// Address part of the sender, without angle brackets.
    pub fn sender_address(&self) -> &str {
        match self.sender.split_once('<') {
            Some((_, rest)) => rest.trim_end().trim_end_matches('>'),
            None => self.sender.trim(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(sender: &str) -> EmailSummary {
        EmailSummary {
            id: "e1".into(),
            sender: sender.into(),
            subject: "S".into(),
            preview: String::new(),
            timestamp: String::new(),
            is_analyzing: false,
        }
    }

    #[test]
    fn sender_with_display_name_splits() {
        let s = summary("Security Team <security@paypai-verify.com>");
        assert_eq!(s.sender_name(), "Security Team");
        assert_eq!(s.sender_address(), "security@paypai-verify.com");
    }

    #[test]
    fn bare_address_is_both_name_and_address() {
        let s = summary("noreply@amazon.com");
        assert_eq!(s.sender_name(), "noreply@amazon.com");
        assert_eq!(s.sender_address(), "noreply@amazon.com");
    }
}
