use super::{SeaOrmStorage, insert_error};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{FoodgramError, Result};
use crate::models::{
    Paginated,
    common::pagination::page_index,
    users::{entities::User, requests::CreateUserRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, ExprTrait},
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(req.email),
            username: Set(req.username),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            password_hash: Set(req.password),
            avatar: Set(None),
            is_active: Set(true),
            token_version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(insert_error("创建用户失败"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取用户
    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Users::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    /// 分页列出用户，按 id 排序
    pub async fn list_users_with_pagination_impl(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<User>> {
        let paginator = Users::find()
            .order_by_asc(Column::Id)
            .paginate(&self.db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询用户总数失败: {e}")))?;

        let index = page_index(page, limit, total)?;
        let users = paginator
            .fetch_page(index)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(Paginated {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            total,
            page,
            limit,
        })
    }

    /// 更新密码
    pub async fn update_password_impl(&self, id: i64, password_hash: &str) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::PasswordHash, Expr::value(password_hash))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("更新密码失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新头像
    pub async fn update_avatar_impl(&self, id: i64, avatar: Option<String>) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::Avatar, Expr::value(avatar))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("更新头像失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 令牌版本 +1
    pub async fn bump_token_version_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::TokenVersion,
                Expr::col(Column::TokenVersion).add(1),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("更新令牌版本失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::tests::{create_test_user, test_storage};

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let storage = test_storage().await;
        create_test_user(&storage, "anna").await;

        let err = storage
            .create_user_impl(CreateUserRequest {
                email: "anna@example.com".to_string(),
                username: "anna2".to_string(),
                first_name: "Anna".to_string(),
                last_name: "Smith".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E010");
    }

    #[tokio::test]
    async fn test_list_users_paginates_by_id() {
        let storage = test_storage().await;
        for name in ["u1", "u2", "u3"] {
            create_test_user(&storage, name).await;
        }

        let page = storage.list_users_with_pagination_impl(2, 2).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "u3");

        let beyond = storage
            .list_users_with_pagination_impl(5, 2)
            .await
            .unwrap_err();
        assert_eq!(beyond.code(), FoodgramError::not_found("").code());

        let huge = storage
            .list_users_with_pagination_impl(i64::MAX as u64, 100)
            .await;
        assert!(huge.is_err());
    }

    #[tokio::test]
    async fn test_token_version_and_avatar() {
        let storage = test_storage().await;
        let user = create_test_user(&storage, "anna").await;
        assert_eq!(user.token_version, 0);

        assert!(storage.bump_token_version_impl(user.id).await.unwrap());
        assert!(
            storage
                .update_avatar_impl(user.id, Some("users/a.png".to_string()))
                .await
                .unwrap()
        );

        let reloaded = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.token_version, 1);
        assert_eq!(reloaded.avatar.as_deref(), Some("users/a.png"));

        storage.update_avatar_impl(user.id, None).await.unwrap();
        let reloaded = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert!(reloaded.avatar.is_none());
    }
}
