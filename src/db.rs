use actix_web::web;
use anyhow::{Context, Result};
use diesel::PgConnection;
use diesel::r2d2::{self, ConnectionManager};

use crate::error::{ApiError, ApiResult};

/// Database connection pool type shared by both portals.
pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

const POOL_MAX_SIZE: u32 = 10;

/// Pools for the two portal databases. Both processes hold both: the doctor
/// portal's dashboard and education administration read patient-side tables.
#[derive(Clone)]
pub struct Pools {
    pub doctor: DbPool,
    pub patient: DbPool,
}

impl Pools {
    pub fn from_urls(doctor_url: &str, patient_url: &str) -> Result<Self> {
        Ok(Pools {
            doctor: build_pool(doctor_url).context("doctor database pool")?,
            patient: build_pool(patient_url).context("patient database pool")?,
        })
    }
}

/// Create a connection pool, establishing connections eagerly so a bad URL
/// fails at startup rather than on the first request.
pub fn build_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(POOL_MAX_SIZE)
        .build(manager)
        .context("failed to create database pool")
}

/// Create a pool without establishing any connection up front. Used by tests
/// that exercise request paths which reject before touching the database.
pub fn build_pool_lazy(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .min_idle(Some(0))
        .build_unchecked(manager)
}

/// Run a diesel closure on the blocking thread pool with a pooled
/// connection. Every handler funnels its database work through here.
pub async fn execute<F, T>(pool: &DbPool, f: F) -> ApiResult<T>
where
    F: FnOnce(&mut PgConnection) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|_| ApiError::Internal("blocking task cancelled".into()))?
}
