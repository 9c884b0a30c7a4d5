use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use sqlx::MySqlPool;

use super::models::{Booking, BookingPayload};

/// Persistence for bookings; each call is one round trip to the backing store
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Every booking, in storage order
    async fn list(&self) -> anyhow::Result<Vec<Booking>>;

    /// Insert a booking and return its id
    async fn create(&self, payload: &BookingPayload) -> anyhow::Result<i64>;

    async fn get(&self, id: i64) -> anyhow::Result<Option<Booking>>;

    /// Replace every field of booking `id`; `false` if it does not exist
    async fn update(&self, id: i64, payload: &BookingPayload) -> anyhow::Result<bool>;

    /// `false` if booking `id` does not exist
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

const SELECT_ALL: &str =
    "SELECT id, service, doctor_name, start_time, end_time, date FROM bookings";
const SELECT_ONE: &str =
    "SELECT id, service, doctor_name, start_time, end_time, date FROM bookings WHERE id = ?";

pub struct MySqlBookingStore {
    pool: MySqlPool,
}

impl MySqlBookingStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: i64) -> anyhow::Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl BookingStore for MySqlBookingStore {
    async fn list(&self) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, payload: &BookingPayload) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO bookings (service, doctor_name, start_time, end_time, date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&payload.service)
        .bind(&payload.doctor)
        .bind(&payload.start_time)
        .bind(&payload.end_time)
        .bind(payload.date)
        .execute(&self.pool)
        .await?;

        i64::try_from(result.last_insert_id()).context("inserted id out of range")
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, payload: &BookingPayload) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET service = ?, doctor_name = ?, start_time = ?, end_time = ?, date = ? WHERE id = ?",
        )
        .bind(&payload.service)
        .bind(&payload.doctor)
        .bind(&payload.start_time)
        .bind(&payload.end_time)
        .bind(payload.date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // MySQL counts changed rows, not matched ones: an identical
        // replacement affects nothing.
        self.exists(id).await
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Process-local store with MySQL-like id assignment: ids start at 1 and
/// are never reused.
#[derive(Default)]
pub struct MemoryBookingStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    last_id: i64,
    rows: BTreeMap<i64, Booking>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> anyhow::Result<std::sync::RwLockReadGuard<'_, MemoryInner>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("booking store lock poisoned"))
    }

    fn write(&self) -> anyhow::Result<std::sync::RwLockWriteGuard<'_, MemoryInner>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("booking store lock poisoned"))
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn list(&self) -> anyhow::Result<Vec<Booking>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    async fn create(&self, payload: &BookingPayload) -> anyhow::Result<i64> {
        let mut inner = self.write()?;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.insert(id, Booking::from_payload(id, payload));
        Ok(id)
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Booking>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, payload: &BookingPayload) -> anyhow::Result<bool> {
        let mut inner = self.write()?;
        match inner.rows.get_mut(&id) {
            Some(row) => {
                *row = Booking::from_payload(id, payload);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.write()?.rows.remove(&id).is_some())
    }
}
