use std::sync::{Arc, LazyLock};

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use regex::Regex;

use crate::config::AppConfig;
use crate::database::RedisService;
use crate::middleware::auth::{create_token, create_token_with_session};
use crate::user::model::{LoginForm, SignupForm, USERNAME_MAX_CHARS, User};
use crate::user::repository::UserRepository;
use crate::utils::error::CustomError;
use crate::utils::form::{FormErrors, FormOutcome, NON_FIELD, REQUIRED};
use crate::utils::{hashing, password_validation};

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        UserService {
            repository,
            bcrypt_cost,
        }
    }

    /// Store a user with a hashed password. The password policy is not
    /// applied here; signup does that.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, CustomError> {
        if self.repository.username_exists(username).await? {
            return Err(CustomError::ConflictError(
                "Username already exists".to_string(),
            ));
        }

        let hashed_password = hashing::hash_password(password, self.bcrypt_cost)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        let user = User {
            id: ObjectId::new(),
            username: username.to_string(),
            password: hashed_password,
            created_at: Utc::now(),
        };

        let user = self.repository.insert(user).await?;
        log::info!("user {} registered", user.username);
        Ok(user)
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<FormOutcome<User>, CustomError> {
        let mut errors = FormErrors::default();
        let username = form.username.trim();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > USERNAME_MAX_CHARS
            || !USERNAME_PATTERN.is_match(username)
        {
            errors.add(
                "username",
                format!(
                    "Enter a valid username of at most {} letters, digits and @/./+/-/_ characters.",
                    USERNAME_MAX_CHARS
                ),
            );
        } else if self.repository.username_exists(username).await? {
            errors.add("username", "A user with that username already exists.");
        }

        if form.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else if let Err(CustomError::ValidationError(message)) =
            password_validation::validate_password(&form.password1)
        {
            errors.add("password1", message);
        }

        if form.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if form.password1 != form.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        if !errors.is_empty() {
            return Ok(FormOutcome::Invalid(errors));
        }

        let user = self.create_user(username, &form.password1).await?;
        Ok(FormOutcome::Saved(user))
    }

    /// The user owning these credentials, if they match.
    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, CustomError> {
        let Some(user) = self.repository.find_by_username(username).await? else {
            return Ok(None);
        };

        let matches = hashing::verify_password(password, &user.password)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        Ok(matches.then_some(user))
    }

    /// Check the credentials and issue a session token for them.
    pub async fn login_fn(
        &self,
        form: &LoginForm,
        config: &AppConfig,
        redis_service: Option<&RedisService>,
    ) -> Result<FormOutcome<String>, CustomError> {
        let mut errors = FormErrors::default();
        if form.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if form.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        if !errors.is_empty() {
            return Ok(FormOutcome::Invalid(errors));
        }

        let Some(user) = self
            .authenticate_user(form.username.trim(), &form.password)
            .await?
        else {
            log::warn!("failed login for {}", form.username.trim());
            errors.add(NON_FIELD, INVALID_LOGIN);
            return Ok(FormOutcome::Invalid(errors));
        };

        // Create token with Redis session if available
        let token = match redis_service {
            Some(redis) => create_token_with_session(&user.id, &user.username, config, redis).await?,
            None => create_token(&user.id, &user.username, config)?,
        };

        log::info!("user {} logged in", user.username);
        Ok(FormOutcome::Saved(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::InMemoryUserRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::default()), 4)
    }

    fn signup_form(username: &str, password1: &str, password2: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            password1: password1.into(),
            password2: password2.into(),
        }
    }

    #[actix_web::test]
    async fn signup_then_authenticate() {
        let users = service();
        let outcome = users
            .signup(&signup_form("alice", "Password1", "Password1"))
            .await
            .unwrap();
        assert!(matches!(outcome, FormOutcome::Saved(_)));

        assert!(users.authenticate_user("alice", "Password1").await.unwrap().is_some());
        assert!(users.authenticate_user("alice", "password1").await.unwrap().is_none());
        assert!(users.authenticate_user("nobody", "Password1").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn signup_reports_field_errors() {
        let users = service();
        users.create_user("taken", "whatever").await.unwrap();

        let FormOutcome::Invalid(errors) = users
            .signup(&signup_form("taken", "short", "different"))
            .await
            .unwrap()
        else {
            panic!("invalid signup accepted");
        };
        assert!(errors.has("username"));
        assert!(errors.has("password1"));
        assert!(errors.has("password2"));

        let FormOutcome::Invalid(errors) = users.signup(&SignupForm::default()).await.unwrap()
        else {
            panic!("empty signup accepted");
        };
        assert!(errors.has("username"));
    }

    #[actix_web::test]
    async fn duplicate_user_is_a_conflict() {
        let users = service();
        users.create_user("bob", "pw").await.unwrap();
        let err = users.create_user("bob", "pw").await.unwrap_err();
        assert!(matches!(err, CustomError::ConflictError(_)));
    }

    #[actix_web::test]
    async fn login_issues_a_token_only_for_valid_credentials() {
        let users = service();
        let config = AppConfig::default();
        users.create_user("carol", "testpassword").await.unwrap();

        let good = LoginForm {
            username: "carol".into(),
            password: "testpassword".into(),
            next: String::new(),
        };
        let FormOutcome::Saved(token) = users.login_fn(&good, &config, None).await.unwrap() else {
            panic!("valid login rejected");
        };
        assert!(!token.is_empty());

        let bad = LoginForm {
            password: "wrong".into(),
            ..good
        };
        let FormOutcome::Invalid(errors) = users.login_fn(&bad, &config, None).await.unwrap() else {
            panic!("invalid login accepted");
        };
        assert!(errors.has(NON_FIELD));
    }
}
