use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Round trip to the database that reports its current time.
#[async_trait]
pub trait DatabaseClock: Send + Sync {
    async fn now(&self) -> anyhow::Result<NaiveDateTime>;
}
