use super::SeaOrmStorage;
use crate::entity::favorites::{Column as FavoriteColumn, Entity as Favorites};
use crate::entity::ingredients::Column as IngredientColumn;
use crate::entity::recipe_ingredients::{
    ActiveModel as RecipeIngredientActiveModel, Column as RecipeIngredientColumn,
    Entity as RecipeIngredients, Relation as RecipeIngredientRelation,
};
use crate::entity::recipes::{ActiveModel, Column, Entity as Recipes};
use crate::entity::shopping_carts::{Column as CartColumn, Entity as ShoppingCarts};
use crate::errors::{FoodgramError, Result};
use crate::models::{
    Paginated,
    common::pagination::page_index,
    recipes::entities::{
        IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeIngredient,
    },
};
use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult,
    IntoActiveModel, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    RelationTrait, Set, TransactionTrait,
};

#[derive(Debug, FromQueryResult)]
struct RecipeIngredientRow {
    recipe_id: i64,
    id: i64,
    name: String,
    measurement_unit: String,
    amount: i32,
}

/// 写入菜谱的食材行
async fn insert_recipe_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_id: i64,
    ingredients: &[IngredientAmount],
) -> Result<()> {
    if ingredients.is_empty() {
        return Ok(());
    }

    let rows = ingredients.iter().map(|item| RecipeIngredientActiveModel {
        recipe_id: Set(recipe_id),
        ingredient_id: Set(item.ingredient_id),
        amount: Set(item.amount),
        ..Default::default()
    });

    RecipeIngredients::insert_many(rows)
        .exec(db)
        .await
        .map_err(|e| FoodgramError::database_operation(format!("写入菜谱食材失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 创建菜谱及其食材，单个事务
    pub async fn create_recipe_impl(&self, recipe: NewRecipe) -> Result<Recipe> {
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            author_id: Set(recipe.author_id),
            name: Set(recipe.name),
            image: Set(recipe.image),
            text: Set(recipe.text),
            cooking_time: Set(recipe.cooking_time),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("创建菜谱失败: {e}")))?;

        insert_recipe_ingredients(&txn, created.id, &recipe.ingredients).await?;

        txn.commit().await?;

        Ok(created.into_recipe())
    }

    pub async fn get_recipe_by_id_impl(&self, id: i64) -> Result<Option<Recipe>> {
        let result = Recipes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询菜谱失败: {e}")))?;

        Ok(result.map(|m| m.into_recipe()))
    }

    /// 分页列出菜谱，新的在前
    pub async fn list_recipes_with_pagination_impl(
        &self,
        filter: RecipeFilter,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<Recipe>> {
        let mut select = Recipes::find();

        if let Some(author_id) = filter.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        if let Some(user_id) = filter.favorited_by {
            let favorited = Favorites::find()
                .select_only()
                .column(FavoriteColumn::RecipeId)
                .filter(FavoriteColumn::UserId.eq(user_id))
                .into_query();
            select = select.filter(Column::Id.in_subquery(favorited));
        }

        if let Some(user_id) = filter.in_cart_of {
            let in_cart = ShoppingCarts::find()
                .select_only()
                .column(CartColumn::RecipeId)
                .filter(CartColumn::UserId.eq(user_id))
                .into_query();
            select = select.filter(Column::Id.in_subquery(in_cart));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询菜谱总数失败: {e}")))?;

        let index = page_index(page, limit, total)?;
        let recipes = paginator
            .fetch_page(index)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询菜谱列表失败: {e}")))?;

        Ok(Paginated {
            items: recipes.into_iter().map(|m| m.into_recipe()).collect(),
            total,
            page,
            limit,
        })
    }

    /// 部分更新菜谱；给出食材时整体替换
    pub async fn update_recipe_impl(
        &self,
        id: i64,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>> {
        let txn = self.db.begin().await?;

        let Some(existing) = Recipes::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询菜谱失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.clone().into_active_model();
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(image) = changes.image {
            model.image = Set(image);
        }
        if let Some(text) = changes.text {
            model.text = Set(text);
        }
        if let Some(cooking_time) = changes.cooking_time {
            model.cooking_time = Set(cooking_time);
        }

        let updated = if model.is_changed() {
            model
                .update(&txn)
                .await
                .map_err(|e| FoodgramError::database_operation(format!("更新菜谱失败: {e}")))?
        } else {
            existing
        };

        if let Some(ingredients) = changes.ingredients {
            RecipeIngredients::delete_many()
                .filter(RecipeIngredientColumn::RecipeId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| FoodgramError::database_operation(format!("清除菜谱食材失败: {e}")))?;
            insert_recipe_ingredients(&txn, id, &ingredients).await?;
        }

        txn.commit().await?;

        Ok(Some(updated.into_recipe()))
    }

    /// 删除菜谱，关联的食材、收藏、购物车记录级联删除
    pub async fn delete_recipe_impl(&self, id: i64) -> Result<bool> {
        let result = Recipes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("删除菜谱失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 多个菜谱的食材，一次查询后按菜谱分组，组内按录入顺序
    pub async fn list_recipe_ingredients_impl(
        &self,
        recipe_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<RecipeIngredient>>> {
        let mut grouped: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
        if recipe_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = RecipeIngredients::find()
            .select_only()
            .column_as(RecipeIngredientColumn::RecipeId, "recipe_id")
            .column_as(IngredientColumn::Id, "id")
            .column_as(IngredientColumn::Name, "name")
            .column_as(IngredientColumn::MeasurementUnit, "measurement_unit")
            .column_as(RecipeIngredientColumn::Amount, "amount")
            .join(
                JoinType::InnerJoin,
                RecipeIngredientRelation::Ingredient.def(),
            )
            .filter(RecipeIngredientColumn::RecipeId.is_in(recipe_ids.iter().copied()))
            .order_by_asc(RecipeIngredientColumn::Id)
            .into_model::<RecipeIngredientRow>()
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询菜谱食材失败: {e}")))?;

        for row in rows {
            grouped.entry(row.recipe_id).or_default().push(RecipeIngredient {
                id: row.id,
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            });
        }

        Ok(grouped)
    }

    /// 作者最新的菜谱
    pub async fn list_recipes_by_author_impl(
        &self,
        author_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>> {
        let mut select = Recipes::find()
            .filter(Column::AuthorId.eq(author_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        if let Some(limit) = limit {
            select = select.limit(limit.min(i64::MAX as u64));
        }

        let result = select
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询作者菜谱失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_recipe()).collect())
    }

    pub async fn count_recipes_by_author_impl(&self, author_id: i64) -> Result<u64> {
        Recipes::find()
            .filter(Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("统计作者菜谱失败: {e}")))
    }
}
