use std::collections::HashSet;

use super::{SeaOrmStorage, insert_error};
use crate::entity::ingredients::Column as IngredientColumn;
use crate::entity::recipe_ingredients::{
    Column as RecipeIngredientColumn, Entity as RecipeIngredients,
    Relation as RecipeIngredientRelation,
};
use crate::entity::shopping_carts::{ActiveModel, Column, Entity as ShoppingCarts};
use crate::errors::{FoodgramError, Result};
use crate::models::recipes::entities::ShoppingListItem;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, RelationTrait, Set,
};

#[derive(Debug, FromQueryResult)]
struct ShoppingListRow {
    name: String,
    measurement_unit: String,
    amount: i64,
}

impl SeaOrmStorage {
    /// 加入购物车，重复加入返回 Conflict
    pub async fn add_to_shopping_cart_impl(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        let model = ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(insert_error("加入购物车失败"))?;

        Ok(())
    }

    pub async fn remove_from_shopping_cart_impl(
        &self,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool> {
        let result = ShoppingCarts::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("移出购物车失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn shopping_cart_recipe_ids_impl(
        &self,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<HashSet<i64>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i64> = ShoppingCarts::find()
            .select_only()
            .column(Column::RecipeId)
            .filter(Column::UserId.eq(user_id))
            .filter(Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询购物车失败: {e}")))?;

        Ok(ids.into_iter().collect())
    }

    /// 购物车内所有菜谱的食材，按 (名称, 单位) 汇总
    pub async fn get_shopping_list_impl(&self, user_id: i64) -> Result<Vec<ShoppingListItem>> {
        let in_cart = ShoppingCarts::find()
            .select_only()
            .column(Column::RecipeId)
            .filter(Column::UserId.eq(user_id))
            .into_query();

        let rows = RecipeIngredients::find()
            .select_only()
            .column_as(IngredientColumn::Name, "name")
            .column_as(IngredientColumn::MeasurementUnit, "measurement_unit")
            .column_as(RecipeIngredientColumn::Amount.sum(), "amount")
            .join(
                JoinType::InnerJoin,
                RecipeIngredientRelation::Ingredient.def(),
            )
            .filter(RecipeIngredientColumn::RecipeId.in_subquery(in_cart))
            .group_by(IngredientColumn::Name)
            .group_by(IngredientColumn::MeasurementUnit)
            .order_by_asc(IngredientColumn::Name)
            .order_by_asc(IngredientColumn::MeasurementUnit)
            .into_model::<ShoppingListRow>()
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("汇总购物清单失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|row| ShoppingListItem {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::tests::{
        create_test_ingredients, create_test_recipe, create_test_user, test_storage,
    };

    #[tokio::test]
    async fn test_cart_lifecycle() {
        let storage = test_storage().await;
        let user = create_test_user(&storage, "buyer").await;
        let items = create_test_ingredients(&storage, &[("соль", "г")]).await;
        let recipe = create_test_recipe(&storage, user.id, "Суп", &[(items[0].id, 5)]).await;

        storage
            .add_to_shopping_cart_impl(user.id, recipe.id)
            .await
            .unwrap();
        let err = storage
            .add_to_shopping_cart_impl(user.id, recipe.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E010");

        let ids = storage
            .shopping_cart_recipe_ids_impl(user.id, &[recipe.id])
            .await
            .unwrap();
        assert!(ids.contains(&recipe.id));

        assert!(
            storage
                .remove_from_shopping_cart_impl(user.id, recipe.id)
                .await
                .unwrap()
        );
        let ids = storage
            .shopping_cart_recipe_ids_impl(user.id, &[recipe.id])
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_shopping_list_sums_amounts() {
        let storage = test_storage().await;
        let user = create_test_user(&storage, "buyer").await;
        let other = create_test_user(&storage, "other").await;
        let items = create_test_ingredients(
            &storage,
            &[("сахар", "г"), ("молоко", "мл"), ("яйца", "шт")],
        )
        .await;
        let (sugar, milk, eggs) = (items[0].id, items[1].id, items[2].id);

        let cake = create_test_recipe(&storage, user.id, "Торт", &[(sugar, 100), (eggs, 3)]).await;
        let cream = create_test_recipe(&storage, user.id, "Крем", &[(sugar, 50), (milk, 200)]).await;
        let omelette = create_test_recipe(&storage, user.id, "Омлет", &[(eggs, 2)]).await;

        storage.add_to_shopping_cart_impl(user.id, cake.id).await.unwrap();
        storage.add_to_shopping_cart_impl(user.id, cream.id).await.unwrap();
        storage
            .add_to_shopping_cart_impl(other.id, omelette.id)
            .await
            .unwrap();

        let list = storage.get_shopping_list_impl(user.id).await.unwrap();
        let lines: Vec<_> = list
            .iter()
            .map(|item| (item.name.as_str(), item.measurement_unit.as_str(), item.amount))
            .collect();
        assert_eq!(
            lines,
            [("молоко", "мл", 200), ("сахар", "г", 150), ("яйца", "шт", 3)]
        );

        let empty = create_test_user(&storage, "empty").await;
        assert!(storage.get_shopping_list_impl(empty.id).await.unwrap().is_empty());
    }
}
