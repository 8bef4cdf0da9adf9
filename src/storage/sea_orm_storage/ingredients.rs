use super::SeaOrmStorage;
use crate::entity::ingredients::{ActiveModel, Column, Entity as Ingredients};
use crate::errors::{FoodgramError, Result};
use crate::models::ingredients::{entities::Ingredient, requests::CreateIngredientRequest};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 全部食材，按 id 排序
    pub async fn list_ingredients_impl(&self) -> Result<Vec<Ingredient>> {
        let result = Ingredients::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询食材列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_ingredient()).collect())
    }

    pub async fn get_ingredient_by_id_impl(&self, id: i64) -> Result<Option<Ingredient>> {
        let result = Ingredients::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询食材失败: {e}")))?;

        Ok(result.map(|m| m.into_ingredient()))
    }

    pub async fn count_existing_ingredients_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        Ingredients::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .count(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("统计食材失败: {e}")))
    }

    pub async fn count_ingredients_impl(&self) -> Result<u64> {
        Ingredients::find()
            .count(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("统计食材失败: {e}")))
    }

    /// 批量导入食材，返回写入条数
    pub async fn create_ingredients_impl(&self, items: Vec<CreateIngredientRequest>) -> Result<u64> {
        if items.is_empty() {
            return Ok(0);
        }

        let count = items.len() as u64;
        let models = items.into_iter().map(|item| ActiveModel {
            name: Set(item.name),
            measurement_unit: Set(item.measurement_unit),
            ..Default::default()
        });

        Ingredients::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("导入食材失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::tests::{create_test_ingredients, test_storage};

    #[tokio::test]
    async fn test_import_and_lookup() {
        let storage = test_storage().await;
        assert_eq!(storage.count_ingredients_impl().await.unwrap(), 0);

        let items = create_test_ingredients(&storage, &[("мука", "г"), ("молоко", "мл")]).await;
        assert_eq!(items.len(), 2);
        assert_eq!(storage.count_ingredients_impl().await.unwrap(), 2);

        let flour = storage
            .get_ingredient_by_id_impl(items[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(flour.name, "мука");
        assert_eq!(flour.measurement_unit, "г");

        assert!(storage.get_ingredient_by_id_impl(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_existing_ignores_unknown_ids() {
        let storage = test_storage().await;
        let items = create_test_ingredients(&storage, &[("соль", "г")]).await;

        let found = storage
            .count_existing_ingredients_impl(&[items[0].id, 404])
            .await
            .unwrap();
        assert_eq!(found, 1);
        assert_eq!(storage.count_existing_ingredients_impl(&[]).await.unwrap(), 0);
    }
}
