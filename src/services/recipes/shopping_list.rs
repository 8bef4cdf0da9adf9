use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RecipeService;
use crate::errors::FoodgramError;
use crate::middlewares::RequireJWT;
use crate::models::recipes::entities::ShoppingListItem;

const SHOPPING_LIST_HEADER: &str = "Список покупок:";
const EMPTY_SHOPPING_LIST: &str = "Пусто!";
const SHOPPING_LIST_FILENAME: &str = "shoplist.txt";

/// 每行 `名称 - 数量 (单位)`，购物车为空时只有一行提示
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    let mut text = String::from(SHOPPING_LIST_HEADER);
    if items.is_empty() {
        text.push('\n');
        text.push_str(EMPTY_SHOPPING_LIST);
        return text;
    }

    for item in items {
        text.push_str(&format!(
            "\n{} - {} ({})",
            item.name, item.amount, item.measurement_unit
        ));
    }
    text
}

pub async fn download_shopping_cart(
    service: &RecipeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).ok_or_else(|| {
        FoodgramError::authentication("Authentication credentials were not provided")
    })?;
    let storage = service.get_storage(request)?;

    let items = storage.get_shopping_list(user_id).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(
                SHOPPING_LIST_FILENAME.to_string(),
            )],
        })
        .body(render_shopping_list(&items)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, amount: i64, unit: &str) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn test_render_items() {
        let text = render_shopping_list(&[item("мука", 450, "г"), item("яйца", 3, "шт")]);
        assert_eq!(text, "Список покупок:\nмука - 450 (г)\nяйца - 3 (шт)");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_shopping_list(&[]), "Список покупок:\nПусто!");
    }
}
