//! The in-memory home of the decrypted mnemonic.

use zeroize::Zeroize;

/// Holds the decrypted mnemonic while the wallet is unlocked.
///
/// The phrase is readable only through [`SecretSlot::read`]; clearing (on
/// lock or wipe) zeroes the backing memory, as does dropping the slot.
#[derive(Default)]
pub struct SecretSlot {
    phrase: Option<String>,
}

impl SecretSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.phrase.is_some()
    }

    /// The explicit read path; `None` unless a secret is loaded.
    pub fn read(&self) -> Option<&str> {
        self.phrase.as_deref()
    }

    /// Loads a decrypted phrase, zeroing any previously held one.
    pub fn load(&mut self, phrase: String) {
        self.clear();
        self.phrase = Some(phrase);
    }

    /// Clears the secret and zeroes its backing memory.
    pub fn clear(&mut self) {
        if let Some(mut phrase) = self.phrase.take() {
            phrase.zeroize();
        }
    }
}

impl Drop for SecretSlot {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for SecretSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSlot")
            .field("phrase", &self.phrase.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let slot = SecretSlot::new();
        assert!(!slot.is_loaded());
        assert_eq!(slot.read(), None);
    }

    #[test]
    fn load_and_read() {
        let mut slot = SecretSlot::new();
        slot.load("abandon abandon about".into());
        assert!(slot.is_loaded());
        assert_eq!(slot.read(), Some("abandon abandon about"));
    }

    #[test]
    fn clear_removes_secret() {
        let mut slot = SecretSlot::new();
        slot.load("secret phrase".into());
        slot.clear();
        assert!(!slot.is_loaded());
        assert_eq!(slot.read(), None);
    }

    #[test]
    fn load_replaces_previous_secret() {
        let mut slot = SecretSlot::new();
        slot.load("first".into());
        slot.load("second".into());
        assert_eq!(slot.read(), Some("second"));
    }

    #[test]
    fn debug_redacts_phrase() {
        let mut slot = SecretSlot::new();
        slot.load("super secret words".into());
        let debug = format!("{slot:?}");
        assert!(!debug.contains("super secret"));
        assert!(debug.contains("REDACTED"));
    }
}
