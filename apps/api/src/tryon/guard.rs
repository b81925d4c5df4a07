use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use redis::Script;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::image_client::ImageGenError;

// Deletes the key only while it still holds our token.
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

pub fn lock_key(client_id: i64, garment_id: i64) -> String {
    format!("tryon:lock:{client_id}:{garment_id}")
}

/// Marks an AI generation for one client and garment as running.
/// Expires after the TTL if never released.
#[derive(Debug)]
pub struct GenerationLock {
    redis: redis::Client,
    key: String,
    token: String,
}

impl GenerationLock {
    /// `SET NX EX`. Returns `None` when another generation holds the lock.
    pub async fn acquire(
        redis: &redis::Client,
        client_id: i64,
        garment_id: i64,
        ttl_secs: u64,
    ) -> Result<Option<Self>> {
        let key = lock_key(client_id, garment_id);
        let token = Uuid::new_v4().to_string();

        let mut conn = redis
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")?;
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&token)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("Failed to acquire {key}"))?;

        if reply.is_none() {
            debug!("{key} is already held");
            return Ok(None);
        }

        Ok(Some(Self {
            redis: redis.clone(),
            key,
            token,
        }))
    }

    /// Releases the lock. Failures are logged; the TTL frees the key anyway.
    pub async fn release(self) {
        if let Err(e) = self.try_release().await {
            warn!("Could not release {}: {e:#}", self.key);
        }
    }

    async fn try_release(&self) -> Result<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let deleted: i32 = Script::new(RELEASE_SCRIPT)
            .key(&self.key)
            .arg(&self.token)
            .invoke_async(&mut conn)
            .await?;
        if deleted == 0 {
            debug!("{} expired before release", self.key);
        }
        Ok(())
    }
}

/// Runs `work` for at most the lock TTL so it never outlives its lock.
pub async fn within_ttl<T, F>(ttl_secs: u64, work: F) -> std::result::Result<T, AppError>
where
    F: Future<Output = std::result::Result<T, AppError>>,
{
    match tokio::time::timeout(Duration::from_secs(ttl_secs), work).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!("Generation abandoned after the {ttl_secs}s lock TTL");
            Err(ImageGenError::TimedOut { secs: ttl_secs }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_is_per_pair() {
        assert_eq!(lock_key(3, 14), "tryon:lock:3:14");
        assert_ne!(lock_key(3, 14), lock_key(31, 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_work_is_cut_at_lock_ttl() {
        let started = tokio::time::Instant::now();
        let result: std::result::Result<(), AppError> = within_ttl(120, async {
            tokio::time::sleep(Duration::from_secs(726)).await;
            Ok(())
        })
        .await;
        assert!(matches!(
            result,
            Err(AppError::ImageGeneration(ImageGenError::TimedOut { secs: 120 }))
        ));
        assert!(started.elapsed() >= Duration::from_secs(120));
        assert!(started.elapsed() < Duration::from_secs(121));
    }

    #[tokio::test(start_paused = true)]
    async fn test_work_within_ttl_keeps_its_outcome() {
        let result = within_ttl(120, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AppError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);

        let result: std::result::Result<(), AppError> =
            within_ttl(120, async { Err(AppError::NotFound("garment".into())) }).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
