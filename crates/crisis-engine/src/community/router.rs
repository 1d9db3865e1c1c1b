use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

use super::trust::{assess_trust, can_perform, TrustActivity, TrustAssessment, TrustedAction};

pub fn community_router() -> Router {
    Router::new().route("/api/v1/community/trust", post(trust_handler))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrustRequest {
    #[serde(flatten)]
    pub(crate) activity: TrustActivity,
    /// Action to check against the computed score.
    #[serde(default)]
    pub(crate) action: Option<TrustedAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrustResponse {
    #[serde(flatten)]
    assessment: TrustAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    permitted: Option<bool>,
}

pub(crate) async fn trust_handler(axum::Json(request): axum::Json<TrustRequest>) -> Response {
    let assessment = assess_trust(&request.activity);
    let permitted = request
        .action
        .map(|action| can_perform(assessment.score, action));
    let payload = TrustResponse {
        assessment,
        permitted,
    };
    (StatusCode::OK, axum::Json(payload)).into_response()
}
