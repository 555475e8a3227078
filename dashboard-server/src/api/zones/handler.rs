//! Zone API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{distributor, zone};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Distributor, Zone, ZoneCreate, ZoneSearchQuery, ZoneUpdate};

/// GET /api/zones - 获取所有区域 (含配送员)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Zone>>> {
    let zones = zone::find_all(state.pool()).await?;
    Ok(Json(zones))
}

/// GET /api/zones/search?name= - 按名称搜索区域
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<ZoneSearchQuery>,
) -> AppResult<Json<Vec<Zone>>> {
    validate_required_text(&query.name, "name", MAX_NAME_LEN)?;
    let zones = zone::search_by_name(state.pool(), &query.name).await?;
    tracing::debug!(term = %query.name, hits = zones.len(), "Zone search");
    Ok(Json(zones))
}

/// GET /api/zones/:id - 获取单个区域
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Zone>> {
    let zone = zone::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::zone_not_found(id))?;
    Ok(Json(zone))
}

/// POST /api/zones - 创建区域
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ZoneCreate>,
) -> AppResult<Json<Zone>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let zone = zone::create(state.pool(), payload).await?;
    tracing::info!(zone_id = zone.id, name = %zone.name, "Zone created");
    Ok(Json(zone))
}

/// PUT /api/zones/:id - 更新区域
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ZoneUpdate>,
) -> AppResult<Json<Zone>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    // 确认存在, 返回区域专用错误码
    if !zone::exists(state.pool(), id).await? {
        return Err(AppError::zone_not_found(id));
    }

    let zone = zone::update(state.pool(), id, payload).await?;
    tracing::info!(zone_id = id, "Zone updated");
    Ok(Json(zone))
}

/// DELETE /api/zones/:id - 删除区域 (仍有配送员时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !zone::exists(state.pool(), id).await? {
        return Err(AppError::zone_not_found(id));
    }

    let result = zone::delete(state.pool(), id).await?;
    tracing::info!(zone_id = id, "Zone deleted");
    Ok(Json(result))
}

/// GET /api/zones/:id/distributors - 获取区域内的所有配送员
pub async fn list_distributors(
    State(state): State<ServerState>,
    Path(zone_id): Path<i64>,
) -> AppResult<Json<Vec<Distributor>>> {
    if !zone::exists(state.pool(), zone_id).await? {
        return Err(AppError::zone_not_found(zone_id));
    }
    let distributors = distributor::find_by_zone(state.pool(), zone_id).await?;
    Ok(Json(distributors))
}
