use axum::Json;
use serde::Serialize;

/// Success body shared by every endpoint: `{"ok": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { ok: true, data })
}
