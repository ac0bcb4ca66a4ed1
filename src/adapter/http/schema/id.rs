use serde::Serialize;
use utoipa::ToSchema;

use crate::application::dto::id::IdDTO;

#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    pub id: String,
}

impl From<IdDTO> for IdResponse {
    fn from(dto: IdDTO) -> Self {
        Self { id: dto.id }
    }
}
