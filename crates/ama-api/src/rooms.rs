use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use ama_types::api::{CreateRoomRequest, RoomResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::views::room_view;
use crate::{AppState, blocking};

pub async fn create_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ApiJson(req): ApiJson<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("room name is required".into()))?
        .to_string();

    let rid = room_id.clone();
    let room = blocking(&state, move |db| {
        if !db.create_room(&rid, Some(name.as_str()), Utc::now())? {
            return Err(ApiError::RoomExists);
        }
        db.get_room(&rid)?.ok_or(ApiError::Internal)
    })
    .await?;

    info!("Room {} created", room_id);
    Ok((StatusCode::CREATED, Json(RoomResponse { room: room_view(room) })))
}

pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let room = blocking(&state, move |db| db.get_room(&room_id)?.ok_or(ApiError::RoomNotFound)).await?;

    Ok(Json(RoomResponse { room: room_view(room) }))
}
