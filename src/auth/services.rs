pub(crate) use crate::auth::dto::{Claims, JwtKeys, TokenKind};
use crate::auth::dto::RegisterRequest;
use crate::config::JwtConfig;
use crate::error::{AppError, FieldErrors};
use crate::state::AppState;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, warn};
use uuid::Uuid;

const PASSWORD_SPECIALS: &str = "!@#$%^&*";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"\S+@\S+\.\S+").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn len_between(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.chars().count())
}

/// Checks every registration field and reports all failures together.
pub(crate) fn validate_registration(req: &RegisterRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !len_between(&req.first_name, 1, 15) {
        errors.insert("first_name", "First name must be 1-15 characters in length".into());
    }
    if !len_between(&req.last_name, 1, 15) {
        errors.insert("last_name", "Last name must be 1-15 characters in length".into());
    }
    if !len_between(&req.username, 5, 15) {
        errors.insert("username", "Username must be 5-15 characters in length".into());
    }

    if req.email.is_empty() {
        errors.insert("email", "Please enter your email address".into());
    } else if !is_valid_email(&req.email) {
        errors.insert("email", "Please enter a valid email address".into());
    }

    if !len_between(&req.password, 8, 25) {
        errors.insert("password", "Password must be 8-25 characters".into());
    } else if !req.password.chars().any(|c| c.is_ascii_digit())
        || !req.password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
    {
        errors.insert(
            "password",
            "Must contain at least 1 number and special character (!,@,#,$,%,^,&,*)".into(),
        );
    }

    if req.password != req.confirm_password {
        errors.insert("confirm_password", "Passwords do not match".into());
    }
    if !req.accepted_terms {
        errors.insert(
            "accepted_terms",
            "Must accept the terms and conditions to continue".into(),
        );
    }

    errors
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
            refresh_ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            access_ttl: Duration::from_secs((ttl_minutes as u64) * 60),
            refresh_ttl: Duration::from_secs((refresh_ttl_minutes as u64) * 60),
        }
    }
}

/// Access and refresh token issued together.
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl JwtKeys {
    fn sign_with_kind(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        kind: TokenKind,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            sid: session_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, session_id = %session_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_pair(&self, user_id: Uuid, session_id: Uuid) -> anyhow::Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign_with_kind(user_id, session_id, TokenKind::Access)?,
            refresh_token: self.sign_with_kind(user_id, session_id, TokenKind::Refresh)?,
        })
    }

    /// When a session created now should expire.
    pub fn session_expiry(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + TimeDuration::seconds(self.refresh_ttl.as_secs() as i64)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }
}


#[cfg(test)]
mod registration_tests {
    use super::*;

    fn valid() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada_l".into(),
            email: "ada@example.com".into(),
            password: "engine#1843".into(),
            confirm_password: "engine#1843".into(),
            accepted_terms: true,
        }
    }

    #[test]
    fn valid_request_has_no_errors() {
        assert!(validate_registration(&valid()).is_empty());
    }

    #[test]
    fn collects_every_failing_field() {
        let req = RegisterRequest {
            first_name: String::new(),
            last_name: "a-very-long-last-name".into(),
            username: "abc".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            confirm_password: "other".into(),
            accepted_terms: false,
        };
        let errors = validate_registration(&req);
        let keys: Vec<_> = errors.keys().copied().collect();
        assert_eq!(
            keys,
            [
                "accepted_terms",
                "confirm_password",
                "email",
                "first_name",
                "last_name",
                "password",
                "username"
            ]
        );
    }

    #[test]
    fn password_needs_digit_and_special() {
        let mut req = valid();
        req.password = "nodigits!!".into();
        req.confirm_password = req.password.clone();
        assert!(validate_registration(&req)["password"].starts_with("Must contain"));

        req.password = "nospecial1".into();
        req.confirm_password = req.password.clone();
        assert!(validate_registration(&req).contains_key("password"));
    }

    #[test]
    fn empty_email_has_its_own_message() {
        let mut req = valid();
        req.email.clear();
        assert_eq!(validate_registration(&req)["email"], "Please enter your email address");
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
    }
}

/// The caller's login session, built from the bearer access token.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(AppError::Unauthorized("Invalid or expired token".into()));
            }
        };

        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthorized("Access token required".into()));
        }

        // a logged-out or never-opened session invalidates its access tokens
        match state.sessions.is_active(claims.sid, claims.sub).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(session_id = %claims.sid, "access token for ended session");
                state.searches.remove(claims.sid);
                return Err(AppError::Unauthorized("Session has ended".into()));
            }
            Err(e) => {
                error!(error = %e, session_id = %claims.sid, "session lookup failed");
                return Err(AppError::Internal(e));
            }
        }

        Ok(Session {
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_access_token() {
        let keys = make_keys();
        let (user_id, session_id) = (Uuid::new_v4(), Uuid::new_v4());
        let pair = keys.sign_pair(user_id, session_id).expect("sign pair");
        let claims = keys.verify(&pair.access_token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.sid, session_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn refresh_token_verifies_as_refresh() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let pair = keys.sign_pair(user_id, Uuid::new_v4()).expect("sign pair");
        let claims = keys.verify_refresh(&pair.refresh_token).expect("verify refresh");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[tokio::test]
    async fn verify_refresh_rejects_access_token() {
        let keys = make_keys();
        let pair = keys.sign_pair(Uuid::new_v4(), Uuid::new_v4()).expect("sign pair");
        let err = keys.verify_refresh(&pair.access_token).unwrap_err();
        assert!(err.to_string().contains("not a refresh token"));
    }

    #[tokio::test]
    async fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys();
        let mut bad_keys = make_keys();
        bad_keys.issuer = "bad-iss".into();
        bad_keys.audience = "bad-aud".into();
        let pair = good_keys.sign_pair(Uuid::new_v4(), Uuid::new_v4()).expect("sign pair");
        assert!(bad_keys.verify(&pair.access_token).is_err());
    }

    #[tokio::test]
    async fn session_expiry_follows_refresh_ttl() {
        let keys = make_keys();
        let left = keys.session_expiry() - OffsetDateTime::now_utc();
        assert!(left > TimeDuration::minutes(59) && left <= TimeDuration::minutes(60));
    }
}
