use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::IngredientService;
use crate::models::ingredients::entities::Ingredient;
use crate::models::ingredients::requests::IngredientListQuery;
use crate::models::ingredients::responses::IngredientResponse;

/// 名称包含关键字（不区分大小写）
pub(crate) fn filter_by_name(ingredients: Vec<Ingredient>, name: Option<&str>) -> Vec<Ingredient> {
    let needle = match name.map(str::trim) {
        Some(needle) if !needle.is_empty() => needle.to_lowercase(),
        _ => return ingredients,
    };

    ingredients
        .into_iter()
        .filter(|ingredient| ingredient.name.to_lowercase().contains(&needle))
        .collect()
}

pub async fn list_ingredients(
    service: &IngredientService,
    query: IngredientListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // SQLite 的 LIKE 只对 ASCII 忽略大小写，这里在内存中过滤
    let ingredients = filter_by_name(storage.list_ingredients().await?, query.name.as_deref());

    let response: Vec<IngredientResponse> = ingredients
        .into_iter()
        .map(IngredientResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(id: i64, name: &str) -> Ingredient {
        Ingredient {
            id,
            name: name.to_string(),
            measurement_unit: "г".to_string(),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let items = vec![
            ingredient(1, "Абрикосы"),
            ingredient(2, "абрикосовое варенье"),
            ingredient(3, "Банан"),
        ];

        let found = filter_by_name(items.clone(), Some("АБРИК"));
        let ids: Vec<_> = found.iter().map(|i| i.id).collect();
        assert_eq!(ids, [1, 2]);

        let found = filter_by_name(items.clone(), Some("нан"));
        assert_eq!(found.len(), 1);

        assert_eq!(filter_by_name(items.clone(), Some("  ")).len(), 3);
        assert_eq!(filter_by_name(items, None).len(), 3);
    }
}
