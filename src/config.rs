use anyhow::Context;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// S3-compatible bucket holding profile pictures.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// USDA FoodData Central lookup settings.
#[derive(Debug, Clone)]
pub struct FdcConfig {
    pub base_url: String,
    pub api_key: String,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub s3: S3Config,
    pub fdc: FdcConfig,
}

fn required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("missing env var {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "gymify"),
            audience: env_or("JWT_AUDIENCE", "gymify-users"),
            ttl_minutes: env_parse_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let s3 = S3Config {
            endpoint: env_or("S3_ENDPOINT", "http://localhost:9000"),
            bucket: env_or("S3_BUCKET", "gymify"),
            access_key: env_or("S3_ACCESS_KEY", "minioadmin"),
            secret_key: env_or("S3_SECRET_KEY", "minioadmin"),
            region: env_or("S3_REGION", "us-east-1"),
        };
        let fdc = FdcConfig {
            base_url: env_or("FDC_BASE_URL", "https://api.nal.usda.gov/fdc/v1"),
            api_key: required("FDC_API_KEY")?,
            page_size: env_parse_or("FDC_PAGE_SIZE", 25),
        };
        Ok(Self {
            database_url,
            jwt,
            s3,
            fdc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("GYMIFY_TEST_PAGE_SIZE", "lots");
        assert_eq!(env_parse_or("GYMIFY_TEST_PAGE_SIZE", 25u32), 25);
        std::env::set_var("GYMIFY_TEST_PAGE_SIZE", "10");
        assert_eq!(env_parse_or("GYMIFY_TEST_PAGE_SIZE", 25u32), 10);
        std::env::remove_var("GYMIFY_TEST_PAGE_SIZE");
    }

    #[test]
    fn missing_required_var_names_the_key() {
        std::env::remove_var("GYMIFY_TEST_REQUIRED");
        let err = required("GYMIFY_TEST_REQUIRED").unwrap_err();
        assert_eq!(err.to_string(), "missing env var GYMIFY_TEST_REQUIRED");
    }

    #[test]
    fn env_or_uses_default_when_unset() {
        std::env::remove_var("GYMIFY_TEST_UNSET");
        assert_eq!(env_or("GYMIFY_TEST_UNSET", "fallback"), "fallback");
    }
}
