use std::collections::BTreeMap;

use bookshelf_kernel::settings::AuthSettings;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user and wrong password are deliberately indistinguishable.
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Fixed username to password table, loaded once at startup.
///
/// Passwords are held and compared as plaintext.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: BTreeMap<String, String>,
}

impl CredentialStore {
    pub fn new(users: BTreeMap<String, String>) -> Self {
        Self { users }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.users.clone())
    }

    /// Returns the subject to embed in a token when the pair matches exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        match self.users.get(username) {
            Some(expected) if expected == password => Ok(username.to_string()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::from_settings(&AuthSettings::default())
    }

    #[test]
    fn accepts_matching_pair() {
        assert_eq!(
            store().authenticate("johndoe", "secretpassword"),
            Ok("johndoe".to_string())
        );
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let store = store();
        let wrong_password = store.authenticate("johndoe", "nope").unwrap_err();
        let unknown_user = store.authenticate("janedoe", "secretpassword").unwrap_err();

        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.to_string(), "invalid username or password");
    }

    #[test]
    fn comparison_is_exact() {
        let store = store();
        assert!(store.authenticate("JohnDoe", "secretpassword").is_err());
        assert!(store.authenticate("johndoe", "secretpassword ").is_err());
        assert!(store.authenticate("johndoe", "").is_err());
    }
}
