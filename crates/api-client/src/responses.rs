use core_types::School;
use serde::Deserialize;

/// The response from a successful `POST /api/schools` request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSchool {
    pub message: String,
    pub id: i64,
    pub image_url: String,
}

/// The response from `GET /api/schools`.
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolList {
    #[serde(default)]
    pub schools: Vec<School>,
}

/// The body of every non-success response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
