use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let jwt_expiration_hours = match std::env::var("JWT_EXPIRATION_HOURS") {
            Ok(raw) => raw
                .parse()
                .context("JWT_EXPIRATION_HOURS must be an integer")?,
            Err(_) => 24,
        };
        Ok(Self {
            jwt_secret,
            jwt_expiration_hours,
        })
    }
}
