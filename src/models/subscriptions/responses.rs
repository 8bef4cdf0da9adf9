use serde::Serialize;

use crate::models::recipes::responses::ShortRecipeResponse;
use crate::models::users::responses::UserResponse;

// 作者及其菜谱
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRecipesResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: u64,
}
