use std::collections::HashSet;

use super::{SeaOrmStorage, insert_error};
use crate::entity::subscriptions::{ActiveModel, Column, Entity as Subscriptions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{FoodgramError, Result};
use crate::models::{Paginated, common::pagination::page_index, users::entities::User};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set,
};

impl SeaOrmStorage {
    /// 订阅作者，重复订阅返回 Conflict
    pub async fn create_subscription_impl(&self, user_id: i64, author_id: i64) -> Result<()> {
        let model = ActiveModel {
            user_id: Set(user_id),
            subscribed_to_id: Set(author_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(insert_error("创建订阅失败"))?;

        Ok(())
    }

    pub async fn delete_subscription_impl(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let result = Subscriptions::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SubscribedToId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("取消订阅失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn is_subscribed_impl(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let count = Subscriptions::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SubscribedToId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询订阅失败: {e}")))?;

        Ok(count > 0)
    }

    /// 在给定作者中筛出 user 已订阅的
    pub async fn subscribed_author_ids_impl(
        &self,
        user_id: i64,
        author_ids: &[i64],
    ) -> Result<HashSet<i64>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i64> = Subscriptions::find()
            .select_only()
            .column(Column::SubscribedToId)
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SubscribedToId.is_in(author_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询订阅失败: {e}")))?;

        Ok(ids.into_iter().collect())
    }

    /// 分页列出 user 订阅的作者，按作者 id 排序
    pub async fn list_subscriptions_with_pagination_impl(
        &self,
        user_id: i64,
        page: u64,
        limit: u64,
    ) -> Result<Paginated<User>> {
        let author_ids = Subscriptions::find()
            .select_only()
            .column(Column::SubscribedToId)
            .filter(Column::UserId.eq(user_id))
            .into_query();

        let paginator = Users::find()
            .filter(UserColumn::Id.in_subquery(author_ids))
            .order_by_asc(UserColumn::Id)
            .paginate(&self.db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询订阅总数失败: {e}")))?;

        let index = page_index(page, limit, total)?;
        let authors = paginator
            .fetch_page(index)
            .await
            .map_err(|e| FoodgramError::database_operation(format!("查询订阅列表失败: {e}")))?;

        Ok(Paginated {
            items: authors.into_iter().map(|m| m.into_user()).collect(),
            total,
            page,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::tests::{create_test_user, test_storage};

    #[tokio::test]
    async fn test_subscribe_twice_is_conflict() {
        let storage = test_storage().await;
        let reader = create_test_user(&storage, "reader").await;
        let author = create_test_user(&storage, "author").await;

        storage
            .create_subscription_impl(reader.id, author.id)
            .await
            .unwrap();
        let err = storage
            .create_subscription_impl(reader.id, author.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E010");

        assert!(storage.is_subscribed_impl(reader.id, author.id).await.unwrap());
        assert!(!storage.is_subscribed_impl(author.id, reader.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let storage = test_storage().await;
        let reader = create_test_user(&storage, "reader").await;
        let author = create_test_user(&storage, "author").await;

        assert!(
            !storage
                .delete_subscription_impl(reader.id, author.id)
                .await
                .unwrap()
        );
        storage
            .create_subscription_impl(reader.id, author.id)
            .await
            .unwrap();
        assert!(
            storage
                .delete_subscription_impl(reader.id, author.id)
                .await
                .unwrap()
        );
        assert!(!storage.is_subscribed_impl(reader.id, author.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_subscriptions() {
        let storage = test_storage().await;
        let reader = create_test_user(&storage, "reader").await;
        let first = create_test_user(&storage, "first").await;
        let second = create_test_user(&storage, "second").await;
        let other = create_test_user(&storage, "other").await;

        storage
            .create_subscription_impl(reader.id, second.id)
            .await
            .unwrap();
        storage
            .create_subscription_impl(reader.id, first.id)
            .await
            .unwrap();
        storage
            .create_subscription_impl(other.id, reader.id)
            .await
            .unwrap();

        let page = storage
            .list_subscriptions_with_pagination_impl(reader.id, 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        let names: Vec<_> = page.items.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["first", "second"]);

        let ids = storage
            .subscribed_author_ids_impl(reader.id, &[first.id, other.id])
            .await
            .unwrap();
        assert!(ids.contains(&first.id));
        assert!(!ids.contains(&other.id));
    }
}
