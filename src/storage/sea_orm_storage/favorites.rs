use std::collections::HashSet;

use super::{SeaOrmStorage, insert_error};
use crate::entity::favorites::{ActiveModel, Column, Entity as Favorites};
use crate::errors::{FoodgramError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set};

impl SeaOrmStorage {
    /// 加入收藏，重复加入返回 Conflict
    pub async fn add_favorite_impl(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        let model = ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(insert_error("加入收藏失败"))?;

        Ok(())
    }

    pub async fn remove_favorite_impl(&self, user_id: i64, recipe_id: i64) -> Result<bool> {
        let result = Favorites::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("移出收藏失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn favorited_recipe_ids_impl(
        &self,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<HashSet<i64>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i64> = Favorites::find()
            .select_only()
            .column(Column::RecipeId)
            .filter(Column::UserId.eq(user_id))
            .filter(Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询收藏失败: {e}")))?;

        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::tests::{
        create_test_ingredients, create_test_recipe, create_test_user, test_storage,
    };

    #[tokio::test]
    async fn test_favorite_lifecycle() {
        let storage = test_storage().await;
        let user = create_test_user(&storage, "fan").await;
        let items = create_test_ingredients(&storage, &[("сахар", "г")]).await;
        let recipe = create_test_recipe(&storage, user.id, "Торт", &[(items[0].id, 100)]).await;

        storage.add_favorite_impl(user.id, recipe.id).await.unwrap();

        let err = storage
            .add_favorite_impl(user.id, recipe.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E010");

        let ids = storage
            .favorited_recipe_ids_impl(user.id, &[recipe.id, 42])
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);

        assert!(storage.remove_favorite_impl(user.id, recipe.id).await.unwrap());
        assert!(!storage.remove_favorite_impl(user.id, recipe.id).await.unwrap());
    }
}
