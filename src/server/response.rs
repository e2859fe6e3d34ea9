//! HTTP response types for the fleet server.

use serde::Serialize;

/// Response body for per-unit delete requests.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub deleted_points: usize,
}

impl DeleteResponse {
    pub fn unit_deleted(deleted_points: usize) -> Self {
        Self {
            message: "Cart deleted",
            deleted_points,
        }
    }

    pub fn all_deleted(deleted_points: usize) -> Self {
        Self {
            message: "All carts deleted",
            deleted_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_delete_response() {
        // given
        let response = DeleteResponse::unit_deleted(3);

        // when
        let json = serde_json::to_string(&response).unwrap();

        // then
        assert!(json.contains(r#""message":"Cart deleted""#));
        assert!(json.contains(r#""deleted_points":3"#));
    }
}
