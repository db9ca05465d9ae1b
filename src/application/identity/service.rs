//! User management service: application-layer orchestration
//!
//! All account-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{generate_password, hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const GENERATED_PASSWORD_LEN: usize = 12;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Voter registration input (self sign-up or admin-added)
#[derive(Debug, Clone)]
pub struct VoterRegistration {
    pub name: String,
    pub email: String,
    pub username: String,
    pub id_number: String,
    pub password: Option<String>,
}

/// Admin or candidate account created by an admin
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// User service: orchestrates all identity use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn check_identity(name: &str, email: &str, username: &str) -> DomainResult<()> {
    require("Name", name)?;
    require("Username", username)?;
    if username.len() < 3 || username.len() > 64 {
        return Err(DomainError::Validation(
            "Username must be 3-64 characters".into(),
        ));
    }
    if !email.contains('@') {
        return Err(DomainError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn check_password(password: &str) -> DomainResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn hash(password: &str) -> DomainResult<String> {
    hash_password(password)
        .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username + password and return a JWT.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_username(username.trim()).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!(username = %user.username, "Failed login attempt");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(user.id, &user.username, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        info!(user_id = user.id, role = %user.role, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Voter self sign-up. The role is always `voter`.
    pub async fn signup_voter(&self, registration: VoterRegistration) -> DomainResult<User> {
        let password = registration
            .password
            .clone()
            .ok_or_else(|| DomainError::Validation("Password is required".into()))?;
        check_password(&password)?;

        let user = self.insert_voter(registration, &password).await?;
        info!(user_id = user.id, username = %user.username, "Voter signed up");
        Ok(user)
    }

    /// Admin adds a voter. Without a password a temporary one is generated
    /// and returned alongside the user; it is not stored in clear anywhere.
    pub async fn add_voter(
        &self,
        registration: VoterRegistration,
    ) -> DomainResult<(User, Option<String>)> {
        let (password, generated) = match registration.password.clone() {
            Some(p) if !p.is_empty() => {
                check_password(&p)?;
                (p, false)
            }
            _ => (generate_password(GENERATED_PASSWORD_LEN), true),
        };

        let user = self.insert_voter(registration, &password).await?;
        info!(user_id = user.id, username = %user.username, generated, "Voter added by admin");
        Ok((user, generated.then_some(password)))
    }

    async fn insert_voter(&self, registration: VoterRegistration, password: &str) -> DomainResult<User> {
        check_identity(&registration.name, &registration.email, &registration.username)?;
        require("ID number", &registration.id_number)?;

        self.repos
            .users()
            .create(NewUser {
                name: registration.name.trim().to_string(),
                email: registration.email.trim().to_string(),
                username: registration.username.trim().to_string(),
                password_hash: hash(password)?,
                role: UserRole::Voter,
                id_number: Some(registration.id_number.trim().to_string()),
            })
            .await
    }

    /// Create an admin or candidate account.
    pub async fn add_user(&self, account: NewAccount) -> DomainResult<User> {
        if account.role == UserRole::Voter {
            return Err(DomainError::Validation(
                "Voters are added through the voter registration".into(),
            ));
        }
        check_identity(&account.name, &account.email, &account.username)?;
        check_password(&account.password)?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                name: account.name.trim().to_string(),
                email: account.email.trim().to_string(),
                username: account.username.trim().to_string(),
                password_hash: hash(&account.password)?,
                role: account.role,
                id_number: None,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "Account created");
        Ok(user)
    }

    /// Seed the configured admin account if no user with that username exists.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        username: &str,
        password: &str,
    ) -> DomainResult<bool> {
        if self.repos.users().find_by_username(username).await?.is_some() {
            return Ok(false);
        }

        self.repos
            .users()
            .create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                username: username.to_string(),
                password_hash: hash(password)?,
                role: UserRole::Admin,
                id_number: None,
            })
            .await?;
        Ok(true)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn me(&self, user_id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))
    }

    pub async fn list_voters(&self) -> DomainResult<Vec<User>> {
        self.repos.users().list_by_role(UserRole::Voter).await
    }

    pub async fn count(&self, role: UserRole) -> DomainResult<u64> {
        self.repos.users().count_by_role(role).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "election-service".into(),
        }
    }

    async fn service() -> UserService {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        UserService::new(repos, jwt())
    }

    fn registration(username: &str, password: Option<&str>) -> VoterRegistration {
        VoterRegistration {
            name: "Grace Hopper".into(),
            email: format!("{}@example.com", username),
            username: username.into(),
            id_number: "NID-77".into(),
            password: password.map(String::from),
        }
    }

    #[tokio::test]
    async fn signup_then_login_issues_voter_token() {
        let svc = service().await;
        let user = svc
            .signup_voter(registration("grace", Some("correct horse")))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Voter);

        let auth = svc.login("grace", "correct horse").await.unwrap();
        let claims = verify_token(&auth.token, &jwt()).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.role().unwrap(), UserRole::Voter);
        assert_eq!(auth.expires_in, 3600);
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_user_is_unauthorized() {
        let svc = service().await;
        svc.signup_voter(registration("grace", Some("correct horse")))
            .await
            .unwrap();

        assert!(matches!(
            svc.login("grace", "wrong password").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.login("nobody", "correct horse").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn signup_requires_id_number_and_password() {
        let svc = service().await;

        let mut missing_id = registration("grace", Some("correct horse"));
        missing_id.id_number = "  ".into();
        assert!(matches!(
            svc.signup_voter(missing_id).await,
            Err(DomainError::Validation(_))
        ));

        assert!(matches!(
            svc.signup_voter(registration("grace", None)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn admin_added_voter_gets_generated_password() {
        let svc = service().await;
        let (user, password) = svc.add_voter(registration("ada", None)).await.unwrap();

        let password = password.expect("generated password");
        assert_eq!(password.len(), GENERATED_PASSWORD_LEN);
        assert_eq!(svc.login("ada", &password).await.unwrap().user.id, user.id);

        let (_, none) = svc
            .add_voter(registration("bob", Some("chosen password")))
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn add_user_rejects_voter_role_and_duplicates() {
        let svc = service().await;
        let account = NewAccount {
            name: "Cand".into(),
            email: "cand@example.com".into(),
            username: "cand".into(),
            password: "password123".into(),
            role: UserRole::Candidate,
        };
        svc.add_user(account.clone()).await.unwrap();

        assert!(matches!(
            svc.add_user(account.clone()).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            svc.add_user(NewAccount {
                role: UserRole::Voter,
                username: "other".into(),
                ..account
            })
            .await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let svc = service().await;
        assert!(svc.ensure_admin("Admin", "admin@example.com", "admin", "admin123").await.unwrap());
        assert!(!svc.ensure_admin("Admin", "admin@example.com", "admin", "admin123").await.unwrap());
        assert_eq!(svc.count(UserRole::Admin).await.unwrap(), 1);
    }
}
