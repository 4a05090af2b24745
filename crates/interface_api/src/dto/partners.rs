//! Partner DTOs

use serde::Deserialize;
use validator::Validate;

use domain_journal::{Belt, PartnerDraft};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PartnerRequest {
    #[validate(length(min = 1, max = 60))]
    pub display_name: String,
    #[serde(default)]
    pub belt: Belt,
    #[validate(length(max = 40))]
    pub weight_class: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<PartnerRequest> for PartnerDraft {
    fn from(request: PartnerRequest) -> Self {
        PartnerDraft {
            display_name: request.display_name,
            belt: request.belt,
            weight_class: request.weight_class,
            notes: request.notes,
        }
    }
}
