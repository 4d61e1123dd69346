//! Identity manager: signup, local login, federated login, and token
//! resolution over a [`UserRepository`].

use std::sync::Arc;

use tracing::{info, warn};

use mnemo_core::{AuthProvider, Error, Result, User, UserRepository};

use crate::token::TokenService;
use crate::vault::CredentialVault;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Owns the User entity: creation, login, federated linking, and
/// resolving bearer tokens to live users.
pub struct IdentityManager {
    users: Arc<dyn UserRepository>,
    vault: CredentialVault,
    tokens: TokenService,
}

impl IdentityManager {
    pub fn new(users: Arc<dyn UserRepository>, vault: CredentialVault, tokens: TokenService) -> Self {
        Self {
            users,
            vault,
            tokens,
        }
    }

    /// Register a local account and issue a session token.
    ///
    /// Fails with `Conflict` if the email is already registered.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<(User, String)> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("email already registered".to_string()));
        }

        let password_hash = self.vault.hash(password)?;
        let user = self
            .users
            .insert(User::new_local(&email, name, password_hash))
            .await?;
        let token = self.tokens.issue(user.id)?;

        info!(
            subsystem = "auth",
            component = "identity",
            op = "signup",
            user_id = %user.id,
            "User registered"
        );
        Ok((user, token))
    }

    /// Authenticate a local account and issue a fresh session token.
    ///
    /// Prior tokens remain valid (stateless sessions). All negative
    /// outcomes collapse into `InvalidCredentials`: unknown email,
    /// passwordless (pure-federated) account, or failed verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let email = normalize_email(email)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(Error::InvalidCredentials)?;
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(Error::InvalidCredentials)?;
        if !self.vault.verify(password, hash) {
            return Err(Error::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        info!(
            subsystem = "auth",
            component = "identity",
            op = "login",
            user_id = %user.id,
            "User logged in"
        );
        Ok((user, token))
    }

    /// Federated (OAuth-style) login or account link by email.
    ///
    /// A new email creates a verified federated account. An existing
    /// account is converted: provider becomes federated, the picture is
    /// replaced, and the account is marked verified. The conversion does
    /// not re-verify that the caller controls the email out-of-band.
    pub async fn federated_login(
        &self,
        external_token: &str,
        email: &str,
        name: &str,
        picture: Option<String>,
    ) -> Result<(User, String)> {
        if external_token.trim().is_empty() {
            return Err(Error::InvalidInput("missing external token".to_string()));
        }
        let email = normalize_email(email)?;

        let user = match self.users.find_by_email(&email).await? {
            Some(mut existing) => {
                if existing.auth_provider == AuthProvider::Local {
                    warn!(
                        subsystem = "auth",
                        component = "identity",
                        op = "federated_login",
                        user_id = %existing.id,
                        "Linking local account to federated provider"
                    );
                }
                existing.auth_provider = AuthProvider::Federated;
                existing.profile_picture_url = picture;
                existing.is_verified = true;
                self.users.update(existing).await?
            }
            None => {
                self.users
                    .insert(User::new_federated(&email, name, picture))
                    .await?
            }
        };

        let token = self.tokens.issue(user.id)?;
        info!(
            subsystem = "auth",
            component = "identity",
            op = "federated_login",
            user_id = %user.id,
            "Federated login"
        );
        Ok((user, token))
    }

    /// Resolve a bearer token to the live user it runs as.
    ///
    /// Fails with `Unauthenticated` when the subject no longer maps to a
    /// user; token-level failures (`InvalidToken`, `TokenExpired`) pass
    /// through from the token service.
    pub async fn resolve(&self, token: &str) -> Result<User> {
        let subject = self.tokens.validate(token)?;
        self.users
            .get(subject)
            .await?
            .ok_or_else(|| Error::Unauthenticated(format!("no user for subject {subject}")))
    }

    /// The token service in use (for issuing in tests and tooling).
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.len() < 3 || !email.contains('@') {
        return Err(Error::InvalidInput("invalid email address".to_string()));
    }
    Ok(email)
}
