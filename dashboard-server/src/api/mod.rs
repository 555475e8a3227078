//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`zones`] - 区域管理接口
//! - [`distributors`] - 配送员管理接口

pub mod distributors;
pub mod health;
pub mod zones;

use axum::Router;

use crate::core::ServerState;

/// All API routes, without middleware or state
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(zones::router())
        .merge(distributors::router())
}
