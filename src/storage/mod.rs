use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{
    Paginated,
    ingredients::{entities::Ingredient, requests::CreateIngredientRequest},
    recipes::entities::{
        NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeIngredient, ShoppingListItem,
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段已经是哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, page: u64, limit: u64) -> Result<Paginated<User>>;
    // 更新密码哈希
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    // 更新头像路径
    async fn update_avatar(&self, id: i64, avatar: Option<String>) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 递增 token_version，使已签发的令牌失效
    async fn bump_token_version(&self, id: i64) -> Result<bool>;

    /// 订阅管理方法
    async fn create_subscription(&self, user_id: i64, author_id: i64) -> Result<()>;
    async fn delete_subscription(&self, user_id: i64, author_id: i64) -> Result<bool>;
    async fn is_subscribed(&self, user_id: i64, author_id: i64) -> Result<bool>;
    // 在给定作者中筛出已订阅的
    async fn subscribed_author_ids(&self, user_id: i64, author_ids: &[i64])
    -> Result<HashSet<i64>>;
    // 分页列出已订阅的作者
    async fn list_subscriptions_with_pagination(
        &self,
        user_id: i64,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<User>>;

    /// 食材管理方法
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>>;
    async fn get_ingredient_by_id(&self, id: i64) -> Result<Option<Ingredient>>;
    // 统计存在的食材数量
    async fn count_existing_ingredients(&self, ids: &[i64]) -> Result<u64>;
    async fn count_ingredients(&self) -> Result<u64>;
    async fn create_ingredients(&self, items: Vec<CreateIngredientRequest>) -> Result<u64>;

    /// 菜谱管理方法
    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe>;
    async fn get_recipe_by_id(&self, id: i64) -> Result<Option<Recipe>>;
    async fn list_recipes_with_pagination(
        &self,
        filter: RecipeFilter,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<Recipe>>;
    async fn update_recipe(&self, id: i64, changes: RecipeChanges) -> Result<Option<Recipe>>;
    async fn delete_recipe(&self, id: i64) -> Result<bool>;
    // 一次查出多个菜谱的食材，按菜谱 id 分组，组内保持录入顺序
    async fn list_recipe_ingredients(
        &self,
        recipe_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<RecipeIngredient>>>;
    // 作者最新的菜谱，limit 为 None 时返回全部
    async fn list_recipes_by_author(&self, author_id: i64, limit: Option<u64>)
    -> Result<Vec<Recipe>>;
    async fn count_recipes_by_author(&self, author_id: i64) -> Result<u64>;

    /// 收藏
    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()>;
    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> Result<bool>;
    async fn favorited_recipe_ids(&self, user_id: i64, recipe_ids: &[i64])
    -> Result<HashSet<i64>>;

    /// 购物车
    async fn add_to_shopping_cart(&self, user_id: i64, recipe_id: i64) -> Result<()>;
    async fn remove_from_shopping_cart(&self, user_id: i64, recipe_id: i64) -> Result<bool>;
    async fn shopping_cart_recipe_ids(
        &self,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<HashSet<i64>>;
    // 购物车食材汇总：按 (名称, 单位) 求和，按名称排序
    async fn get_shopping_list(&self, user_id: i64) -> Result<Vec<ShoppingListItem>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
