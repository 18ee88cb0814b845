use anyhow::{anyhow, Result};

/// Accepts absolute `http`/`https` URLs with a host part.
pub fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .ok_or_else(|| anyhow!("{} must start with http:// or https://", name))?;
    if rest.split('/').next().unwrap_or_default().is_empty() {
        return Err(anyhow!("{} has no host", name));
    }
    Ok(())
}

pub fn validate_redis_url(value: &str) -> Result<()> {
    if value.starts_with("redis://") || value.starts_with("rediss://") || value.starts_with("unix://") {
        return Ok(());
    }
    Err(anyhow!("redis_url must use redis://, rediss:// or unix://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_urls() {
        assert!(validate_http_url("feed_url", "https://example.com/database/feed/global").is_ok());
        assert!(validate_http_url("feed_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_http_url("feed_url", "ftp://example.com").is_err());
        assert!(validate_http_url("feed_url", "https:///path").is_err());
    }

    #[test]
    fn redis_urls() {
        assert!(validate_redis_url("redis://localhost:6379/0").is_ok());
        assert!(validate_redis_url("localhost:6379").is_err());
    }
}
