use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // principal name
    pub role: String,
    pub exp: i64, // expiration time
    pub iat: i64, // issued at
    pub jti: String, // JWT ID
}

impl Claims {
    pub fn new(subject: String, role: String, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: subject,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signs a bearer token, returning it with its expiry instant.
pub fn issue_token(
    subject: String,
    role: String,
    secret: &str,
    expiration_hours: u64,
) -> anyhow::Result<(String, DateTime<Utc>)> {
    let claims = Claims::new(subject, role, expiration_hours);
    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| anyhow::anyhow!("Token expiry out of range"))?;
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok((token, expires_at))
}

pub fn verify_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims)
}
