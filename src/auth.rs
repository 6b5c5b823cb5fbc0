// Account lifecycle: registration with OTP email verification, login issuing
// a JWT pair, and OTP-based password reset.
//
// Mail is a side effect, never a gate: a failed send is logged and the record
// changes stand. The OTP itself only ever travels by email.

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;
use crate::mailer::{Mailer, OutboundMail};
use crate::models::User;
use crate::presenter::{user_view, UserView};
use crate::store::TravelStore;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("this username is already taken")]
    UsernameTaken,

    #[error("no account found for this email")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is not verified")]
    NotVerified,

    #[error("invalid or expired OTP")]
    InvalidOtp,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u64,
    pub username: String,
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub struct AuthService {
    store: Arc<TravelStore>,
    mailer: Arc<dyn Mailer>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(store: Arc<TravelStore>, mailer: Arc<dyn Mailer>, jwt: JwtConfig) -> Self {
        Self { store, mailer, jwt }
    }

    async fn send_best_effort(&self, mail: OutboundMail) {
        let recipient = mail.to.clone();
        if let Err(err) = self.mailer.send(mail).await {
            tracing::warn!(to = %recipient, error = %err, "mail send failed");
        }
    }

    /// Creates an unverified account and emails the verification OTP. The
    /// account is kept even when the mail bounces.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserView, AuthError> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::Validation("username is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("a valid email is required".to_string()));
        }
        if request.password.len() < 8 {
            return Err(AuthError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
        if self.store.user_by_email(&email).is_some() {
            return Err(AuthError::EmailTaken);
        }
        if self.store.user_by_username(&username).is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let otp = generate_otp();
        let user = self.store.insert_user(User {
            id: 0,
            username,
            email: email.clone(),
            password_hash: hash_password(&request.password)?,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            is_verified: false,
            otp_code: otp.clone(),
        });

        self.send_best_effort(OutboundMail {
            to: email,
            subject: "Your OTP Code".to_string(),
            body: format!("Your OTP code is: {}", otp),
        })
        .await;

        Ok(user_view(&user))
    }

    /// Marks the account verified when the submitted OTP matches.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<UserView, AuthError> {
        let mut user = self
            .store
            .user_by_email(email)
            .ok_or(AuthError::UserNotFound)?;
        if user.otp_code.is_empty() || user.otp_code != otp {
            return Err(AuthError::InvalidOtp);
        }

        user.is_verified = true;
        user.otp_code.clear();
        self.store.update_user(user.clone());

        self.send_best_effort(OutboundMail {
            to: user.email.clone(),
            subject: "Welcome aboard".to_string(),
            body: format!(
                "Hi {}, your account has been verified. Happy travels!",
                user.username
            ),
        })
        .await;

        Ok(user_view(&user))
    }

    /// Verifies credentials and issues an access/refresh pair. A login
    /// notification mail goes out in the background.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user = self
            .store
            .user_by_email(email)
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(AuthError::NotVerified);
        }

        let pair = self.issue_pair(&user)?;

        let mailer = Arc::clone(&self.mailer);
        let mail = OutboundMail {
            to: user.email.clone(),
            subject: "New login to your account".to_string(),
            body: format!(
                "Hi {}, your account was just signed in at {}.",
                user.username,
                Utc::now().format("%Y-%m-%d %H:%M UTC")
            ),
        };
        tokio::spawn(async move {
            let recipient = mail.to.clone();
            if let Err(err) = mailer.send(mail).await {
                tracing::warn!(to = %recipient, error = %err, "login notification failed");
            }
        });

        Ok(LoginResponse {
            access: pair.access,
            refresh: pair.refresh,
            user: user_view(&user),
        })
    }

    /// Stores a fresh OTP on the account and emails it.
    pub async fn forgot_password_request(&self, email: &str) -> Result<(), AuthError> {
        let mut user = self
            .store
            .user_by_email(email)
            .ok_or(AuthError::UserNotFound)?;

        let otp = generate_otp();
        user.otp_code = otp.clone();
        self.store.update_user(user.clone());

        self.send_best_effort(OutboundMail {
            to: user.email,
            subject: "Your OTP Code".to_string(),
            body: format!("Your OTP code is: {}", otp),
        })
        .await;

        Ok(())
    }

    /// Consumes the reset OTP and replaces the password.
    pub async fn forgot_password_verify(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut user = self
            .store
            .user_by_email(email)
            .ok_or(AuthError::UserNotFound)?;
        if user.otp_code.is_empty() || user.otp_code != otp {
            return Err(AuthError::InvalidOtp);
        }
        if new_password.len() < 8 {
            return Err(AuthError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }

        user.password_hash = hash_password(new_password)?;
        user.otp_code.clear();
        self.store.update_user(user);
        Ok(())
    }

    fn issue_token(&self, user: &User, token_type: &str, lifetime: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            token_type: token_type.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )?)
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue_token(user, "access", Duration::minutes(self.jwt.access_minutes))?,
            refresh: self.issue_token(user, "refresh", Duration::days(self.jwt.refresh_days))?,
        })
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }

    /// Resolves a bearer access token to its account.
    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.decode_claims(token)?;
        if claims.token_type != "access" {
            return Err(AuthError::InvalidCredentials);
        }
        self.store.user(claims.sub).ok_or(AuthError::UserNotFound)
    }

    /// Exchanges a valid refresh token for a fresh pair.
    pub fn refresh(&self, token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.decode_claims(token)?;
        if claims.token_type != "refresh" {
            return Err(AuthError::InvalidCredentials);
        }
        let user = self.store.user(claims.sub).ok_or(AuthError::UserNotFound)?;
        self.issue_pair(&user)
    }
}
