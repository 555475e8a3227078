//! Distributor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{distributor, zone};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_delivery_value, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Distributor, DistributorCreate, DistributorUpdate};

/// GET /api/distributors - 获取所有配送员
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Distributor>>> {
    let distributors = distributor::find_all(state.pool()).await?;
    Ok(Json(distributors))
}

/// GET /api/distributors/:id - 获取单个配送员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Distributor>> {
    let distributor = distributor::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::distributor_not_found(id))?;
    Ok(Json(distributor))
}

/// POST /api/distributors - 创建配送员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DistributorCreate>,
) -> AppResult<Json<Distributor>> {
    validate_fields(
        &payload.name,
        &payload.last_name,
        &payload.national_id,
        payload.delivery_value,
    )?;
    ensure_zone(&state, payload.zone_id).await?;

    let distributor = distributor::create(state.pool(), payload).await?;
    tracing::info!(
        distributor_id = distributor.id,
        zone_id = distributor.zone_id,
        "Distributor created"
    );
    Ok(Json(distributor))
}

/// PUT /api/distributors/:id - 更新配送员 (整体替换, zone_id 必填)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DistributorUpdate>,
) -> AppResult<Json<Distributor>> {
    validate_fields(
        &payload.name,
        &payload.last_name,
        &payload.national_id,
        payload.delivery_value,
    )?;

    // 查询旧值
    let old = distributor::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::distributor_not_found(id))?;
    ensure_zone(&state, payload.zone_id).await?;

    let distributor = distributor::update(state.pool(), id, payload).await?;
    if old.zone_id != distributor.zone_id {
        tracing::info!(
            distributor_id = id,
            from_zone = old.zone_id,
            to_zone = distributor.zone_id,
            "Distributor moved to another zone"
        );
    }
    tracing::info!(distributor_id = id, "Distributor updated");
    Ok(Json(distributor))
}

/// DELETE /api/distributors/:id - 删除配送员
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if distributor::find_by_id(state.pool(), id).await?.is_none() {
        return Err(AppError::distributor_not_found(id));
    }
    let result = distributor::delete(state.pool(), id).await?;
    tracing::info!(distributor_id = id, "Distributor deleted");
    Ok(Json(result))
}

fn validate_fields(
    name: &str,
    last_name: &str,
    national_id: &str,
    delivery_value: f64,
) -> AppResult<()> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_required_text(last_name, "last_name", MAX_NAME_LEN)?;
    validate_required_text(national_id, "national_id", MAX_SHORT_TEXT_LEN)?;
    validate_delivery_value(delivery_value)
}

/// 配送员必须引用已存在的区域
async fn ensure_zone(state: &ServerState, zone_id: i64) -> AppResult<()> {
    if !zone::exists(state.pool(), zone_id).await? {
        return Err(AppError::with_message(
            ErrorCode::DistributorZoneMissing,
            format!("Zone {zone_id} does not exist"),
        )
        .with_detail("zone_id", zone_id));
    }
    Ok(())
}
