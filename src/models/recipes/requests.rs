use serde::Deserialize;

use crate::models::PaginationQuery;

// 请求中的食材 {id, amount}
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeIngredientInput {
    pub id: i64,
    pub amount: i64,
}

// 创建菜谱
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientInput>,
    /// base64 data URL
    #[serde(default)]
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
}

// 更新菜谱，字段均可省略
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<RecipeIngredientInput>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

// 菜谱列表查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub author: Option<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}
