//! Identity and coach-roster DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Role, UserId};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CoachLinkRequest {
    #[validate(length(min = 1, max = 128))]
    pub coach_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user_id: UserId,
    pub roles: Vec<Role>,
    pub primary_role: Role,
}
