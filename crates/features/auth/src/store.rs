//! In-memory account store backing the built-in auth slice.
//!
//! Token issuance here is bookkeeping only: opaque one-shot strings tied to
//! an account. Real credential hashing and signed tokens belong to the
//! external authentication collaborator.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Confirm,
    PasswordReset,
    Access,
}

#[derive(Debug)]
pub struct UserStore {
    accounts: RwLock<HashMap<String, Account>>,
    tokens: RwLock<HashMap<String, (TokenKind, String)>>,
    counter: AtomicU64,
}

impl Default for UserStore {
    fn default() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(1),
        }
    }
}

impl UserStore {
    /// Inserts an unconfirmed account. Returns `false` when the email is
    /// already taken.
    pub fn insert(&self, username: &str, email: &str, password: &str) -> bool {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(email) {
            return false;
        }
        accounts.insert(
            email.to_owned(),
            Account {
                username: username.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
                confirmed: false,
            },
        );
        true
    }

    pub fn get(&self, email: &str) -> Option<Account> {
        self.accounts.read().get(email).cloned()
    }

    /// Verifies credentials against a confirmed account.
    pub fn verify(&self, email: &str, password: &str) -> bool {
        self.accounts
            .read()
            .get(email)
            .is_some_and(|a| a.confirmed && a.password == password)
    }

    /// Issues a one-shot token bound to an account.
    pub fn issue_token(&self, kind: TokenKind, email: &str) -> String {
        let token = format!("{}-{}", prefix(kind), self.counter.fetch_add(1, Ordering::Relaxed));
        self.tokens.write().insert(token.clone(), (kind, email.to_owned()));
        token
    }

    /// Consumes a token, returning the bound email when kind matches.
    pub fn consume_token(&self, kind: TokenKind, token: &str) -> Option<String> {
        let mut tokens = self.tokens.write();
        match tokens.get(token) {
            Some((stored, _)) if *stored == kind => tokens.remove(token).map(|(_, email)| email),
            _ => None,
        }
    }

    /// Marks an account confirmed. Returns `false` for unknown or
    /// already-confirmed accounts.
    pub fn confirm(&self, email: &str) -> bool {
        let mut accounts = self.accounts.write();
        match accounts.get_mut(email) {
            Some(account) if !account.confirmed => {
                account.confirmed = true;
                true
            },
            _ => false,
        }
    }

    /// Replaces an account's password.
    pub fn set_password(&self, email: &str, password: &str) -> bool {
        let mut accounts = self.accounts.write();
        match accounts.get_mut(email) {
            Some(account) => {
                account.password = password.to_owned();
                true
            },
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

const fn prefix(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Confirm => "confirm",
        TokenKind::PasswordReset => "reset",
        TokenKind::Access => "access",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_confirm_login_roundtrip() {
        let store = UserStore::default();
        assert!(store.insert("ada", "ada@example.com", "s3cret"));
        assert!(!store.insert("ada2", "ada@example.com", "other"), "email is unique");

        // Unconfirmed accounts cannot log in.
        assert!(!store.verify("ada@example.com", "s3cret"));

        let token = store.issue_token(TokenKind::Confirm, "ada@example.com");
        let email = store.consume_token(TokenKind::Confirm, &token).expect("token resolves");
        assert!(store.confirm(&email));
        assert!(store.verify("ada@example.com", "s3cret"));

        // Tokens are one-shot.
        assert!(store.consume_token(TokenKind::Confirm, &token).is_none());
    }

    #[test]
    fn reset_token_kind_is_checked() {
        let store = UserStore::default();
        store.insert("ada", "ada@example.com", "s3cret");
        let token = store.issue_token(TokenKind::PasswordReset, "ada@example.com");
        assert!(store.consume_token(TokenKind::Confirm, &token).is_none());
        assert!(store.consume_token(TokenKind::PasswordReset, &token).is_some());
    }
}
