//! Distributor Repository

use super::{RepoError, RepoResult};
use shared::models::{Distributor, DistributorCreate, DistributorUpdate};
use sqlx::SqlitePool;

const DISTRIBUTOR_SELECT: &str =
    "SELECT id, name, last_name, national_id, delivery_value, zone_id FROM distributor";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Distributor>> {
    let rows = sqlx::query_as::<_, Distributor>(&format!("{DISTRIBUTOR_SELECT} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Distributor>> {
    let row = sqlx::query_as::<_, Distributor>(&format!("{DISTRIBUTOR_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_zone(pool: &SqlitePool, zone_id: i64) -> RepoResult<Vec<Distributor>> {
    let rows = sqlx::query_as::<_, Distributor>(&format!(
        "{DISTRIBUTOR_SELECT} WHERE zone_id = ? ORDER BY id"
    ))
    .bind(zone_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: DistributorCreate) -> RepoResult<Distributor> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO distributor (name, last_name, national_id, delivery_value, zone_id) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.last_name)
    .bind(&data.national_id)
    .bind(data.delivery_value)
    .bind(data.zone_id)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create distributor".into()))
}

/// Full replacement, `zone_id` included
pub async fn update(pool: &SqlitePool, id: i64, data: DistributorUpdate) -> RepoResult<Distributor> {
    let rows = sqlx::query(
        "UPDATE distributor SET name = ?1, last_name = ?2, national_id = ?3, delivery_value = ?4, zone_id = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.last_name)
    .bind(&data.national_id)
    .bind(data.delivery_value)
    .bind(data.zone_id)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Distributor {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Distributor {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM distributor WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Distributor {id} not found")));
    }
    Ok(true)
}
