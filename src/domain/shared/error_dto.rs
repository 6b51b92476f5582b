use serde::{Deserialize, Serialize};

/// Body of every non-2xx JSON response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
