use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::limiter::{actions, RateLimitPolicy};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActionQuota {
    pub action: &'static str,
    pub limit: u32,
    pub remaining: u32,
    pub reset_in_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct QuotaView {
    pub coach_id: Uuid,
    pub budgets: Vec<ActionQuota>,
}

/// GET /api/coaches/:coach_id/quota - remaining budget per action for the
/// coach, read without consuming any of it. The coach guard has already
/// established that the caller is this coach.
pub async fn coach_quota(
    State(state): State<AppState>,
    Path(coach_id): Path<Uuid>,
) -> ApiResult<QuotaView> {
    let identity = coach_id.to_string();
    let configured: [(&'static str, RateLimitPolicy); 3] = [
        (actions::API, state.limits.api),
        (actions::CHAT, state.limits.chat),
        (actions::ANALYZE, state.limits.analyze),
    ];

    let budgets = configured
        .into_iter()
        .map(|(action, policy)| {
            let quota = state.limiter.quota(&identity, action, policy);
            ActionQuota {
                action,
                limit: policy.max_requests,
                remaining: quota.remaining,
                reset_in_secs: quota.reset_in.as_millis().div_ceil(1000) as u64,
            }
        })
        .collect();

    Ok(ApiResponse::success(QuotaView { coach_id, budgets }))
}
