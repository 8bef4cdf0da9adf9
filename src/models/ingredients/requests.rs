use serde::Deserialize;

// 食材列表查询 ?name=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientListQuery {
    pub name: Option<String>,
}

// 导入用的食材记录
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub measurement_unit: String,
}
