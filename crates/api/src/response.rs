//! Shared response envelope types for API handlers.
//!
//! Read and admin endpoints use a `{ "data": ... }` envelope. Generation
//! endpoints answer with their own flat `{ "success": true, ... }` shape.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
