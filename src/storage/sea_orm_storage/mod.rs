//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod favorites;
mod ingredients;
mod recipes;
mod shopping_carts;
mod subscriptions;
mod users;

use crate::config::AppConfig;
use crate::errors::{FoodgramError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// 写入错误映射：唯一约束冲突转为 Conflict，其余附带上下文
pub(crate) fn insert_error(context: &'static str) -> impl FnOnce(DbErr) -> FoodgramError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => FoodgramError::conflict(msg),
        _ => FoodgramError::database_operation(format!("{context}: {e}")),
    }
}

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| FoodgramError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| FoodgramError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| FoodgramError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 测试用的内存 SQLite，单连接保证同一个库
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opt).await?;
        Migrator::up(&db, None).await?;
        Ok(Self { db })
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(FoodgramError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    Paginated,
    ingredients::{entities::Ingredient, requests::CreateIngredientRequest},
    recipes::entities::{
        NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeIngredient, ShoppingListItem,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn list_users_with_pagination(&self, page: u64, limit: u64) -> Result<Paginated<User>> {
        self.list_users_with_pagination_impl(page, limit).await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_password_impl(id, password_hash).await
    }

    async fn update_avatar(&self, id: i64, avatar: Option<String>) -> Result<bool> {
        self.update_avatar_impl(id, avatar).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn bump_token_version(&self, id: i64) -> Result<bool> {
        self.bump_token_version_impl(id).await
    }

    // 订阅模块
    async fn create_subscription(&self, user_id: i64, author_id: i64) -> Result<()> {
        self.create_subscription_impl(user_id, author_id).await
    }

    async fn delete_subscription(&self, user_id: i64, author_id: i64) -> Result<bool> {
        self.delete_subscription_impl(user_id, author_id).await
    }

    async fn is_subscribed(&self, user_id: i64, author_id: i64) -> Result<bool> {
        self.is_subscribed_impl(user_id, author_id).await
    }

    async fn subscribed_author_ids(
        &self,
        user_id: i64,
        author_ids: &[i64],
    ) -> Result<HashSet<i64>> {
        self.subscribed_author_ids_impl(user_id, author_ids).await
    }

    async fn list_subscriptions_with_pagination(
        &self,
        user_id: i64,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<User>> {
        self.list_subscriptions_with_pagination_impl(user_id, page, limit)
            .await
    }

    // 食材模块
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        self.list_ingredients_impl().await
    }

    async fn get_ingredient_by_id(&self, id: i64) -> Result<Option<Ingredient>> {
        self.get_ingredient_by_id_impl(id).await
    }

    async fn count_existing_ingredients(&self, ids: &[i64]) -> Result<u64> {
        self.count_existing_ingredients_impl(ids).await
    }

    async fn count_ingredients(&self) -> Result<u64> {
        self.count_ingredients_impl().await
    }

    async fn create_ingredients(&self, items: Vec<CreateIngredientRequest>) -> Result<u64> {
        self.create_ingredients_impl(items).await
    }

    // 菜谱模块
    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe> {
        self.create_recipe_impl(recipe).await
    }

    async fn get_recipe_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        self.get_recipe_by_id_impl(id).await
    }

    async fn list_recipes_with_pagination(
        &self,
        filter: RecipeFilter,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<Recipe>> {
        self.list_recipes_with_pagination_impl(filter, page, limit)
            .await
    }

    async fn update_recipe(&self, id: i64, changes: RecipeChanges) -> Result<Option<Recipe>> {
        self.update_recipe_impl(id, changes).await
    }

    async fn delete_recipe(&self, id: i64) -> Result<bool> {
        self.delete_recipe_impl(id).await
    }

    async fn list_recipe_ingredients(
        &self,
        recipe_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<RecipeIngredient>>> {
        self.list_recipe_ingredients_impl(recipe_ids).await
    }

    async fn list_recipes_by_author(
        &self,
        author_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>> {
        self.list_recipes_by_author_impl(author_id, limit).await
    }

    async fn count_recipes_by_author(&self, author_id: i64) -> Result<u64> {
        self.count_recipes_by_author_impl(author_id).await
    }

    // 收藏模块
    async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        self.add_favorite_impl(user_id, recipe_id).await
    }

    async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> Result<bool> {
        self.remove_favorite_impl(user_id, recipe_id).await
    }

    async fn favorited_recipe_ids(
        &self,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<HashSet<i64>> {
        self.favorited_recipe_ids_impl(user_id, recipe_ids).await
    }

    // 购物车模块
    async fn add_to_shopping_cart(&self, user_id: i64, recipe_id: i64) -> Result<()> {
        self.add_to_shopping_cart_impl(user_id, recipe_id).await
    }

    async fn remove_from_shopping_cart(&self, user_id: i64, recipe_id: i64) -> Result<bool> {
        self.remove_from_shopping_cart_impl(user_id, recipe_id)
            .await
    }

    async fn shopping_cart_recipe_ids(
        &self,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<HashSet<i64>> {
        self.shopping_cart_recipe_ids_impl(user_id, recipe_ids)
            .await
    }

    async fn get_shopping_list(&self, user_id: i64) -> Result<Vec<ShoppingListItem>> {
        self.get_shopping_list_impl(user_id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn test_storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory()
            .await
            .expect("in-memory sqlite storage")
    }

    pub(crate) async fn create_test_user(storage: &SeaOrmStorage, username: &str) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                email: format!("{username}@example.com"),
                username: username.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                password: "not-a-real-hash".to_string(),
            })
            .await
            .expect("create user")
    }

    pub(crate) async fn create_test_ingredients(
        storage: &SeaOrmStorage,
        items: &[(&str, &str)],
    ) -> Vec<Ingredient> {
        storage
            .create_ingredients_impl(
                items
                    .iter()
                    .map(|(name, unit)| CreateIngredientRequest {
                        name: name.to_string(),
                        measurement_unit: unit.to_string(),
                    })
                    .collect(),
            )
            .await
            .expect("create ingredients");
        storage.list_ingredients_impl().await.expect("list ingredients")
    }

    pub(crate) async fn create_test_recipe(
        storage: &SeaOrmStorage,
        author_id: i64,
        name: &str,
        ingredients: &[(i64, i32)],
    ) -> Recipe {
        storage
            .create_recipe_impl(NewRecipe {
                author_id,
                name: name.to_string(),
                image: "recipes/test.png".to_string(),
                text: "Mix and serve".to_string(),
                cooking_time: 10,
                ingredients: ingredients
                    .iter()
                    .map(|(ingredient_id, amount)| {
                        crate::models::recipes::entities::IngredientAmount {
                            ingredient_id: *ingredient_id,
                            amount: *amount,
                        }
                    })
                    .collect(),
            })
            .await
            .expect("create recipe")
    }
}
