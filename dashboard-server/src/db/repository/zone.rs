//! Zone Repository

use super::{RepoError, RepoResult, distributor};
use shared::models::{Zone, ZoneCreate, ZoneUpdate};
use sqlx::SqlitePool;

const ZONE_SELECT: &str = "SELECT id, name, description FROM zone";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Zone>> {
    let zones = sqlx::query_as::<_, Zone>(&format!("{ZONE_SELECT} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    attach_distributors(pool, zones).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Zone>> {
    let zone = sqlx::query_as::<_, Zone>(&format!("{ZONE_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match zone {
        Some(mut zone) => {
            zone.distributors = distributor::find_by_zone(pool, zone.id).await?;
            Ok(Some(zone))
        }
        None => Ok(None),
    }
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM zone WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Case-insensitive substring match on the zone name
pub async fn search_by_name(pool: &SqlitePool, term: &str) -> RepoResult<Vec<Zone>> {
    let zones = sqlx::query_as::<_, Zone>(&format!(
        "{ZONE_SELECT} WHERE instr(lower(name), lower(?)) > 0 ORDER BY id"
    ))
    .bind(term.trim())
    .fetch_all(pool)
    .await?;
    attach_distributors(pool, zones).await
}

pub async fn create(pool: &SqlitePool, data: ZoneCreate) -> RepoResult<Zone> {
    let id: i64 =
        sqlx::query_scalar("INSERT INTO zone (name, description) VALUES (?, ?) RETURNING id")
            .bind(&data.name)
            .bind(&data.description)
            .fetch_one(pool)
            .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create zone".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ZoneUpdate) -> RepoResult<Zone> {
    let rows = sqlx::query(
        "UPDATE zone SET name = COALESCE(?1, name), description = COALESCE(?2, description) WHERE id = ?3",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Zone {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Zone {id} not found")))
}

/// Delete a zone; refused while distributors still reference it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM distributor WHERE zone_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Err(RepoError::Conflict(format!(
            "Zone {id} still has {count} distributor(s)"
        )));
    }
    let rows = sqlx::query("DELETE FROM zone WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Zone {id} not found")));
    }
    Ok(true)
}

/// Load every distributor once and hand them out to their zones
async fn attach_distributors(pool: &SqlitePool, mut zones: Vec<Zone>) -> RepoResult<Vec<Zone>> {
    if zones.is_empty() {
        return Ok(zones);
    }
    let all = distributor::find_all(pool).await?;
    for zone in &mut zones {
        zone.distributors = all.iter().filter(|d| d.zone_id == zone.id).cloned().collect();
    }
    Ok(zones)
}
