pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::ingredients::requests::IngredientListQuery;
use crate::storage::Storage;

pub struct IngredientService {
    storage: Option<Arc<dyn Storage>>,
}

impl IngredientService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 食材列表，可按名称过滤
    pub async fn list_ingredients(
        &self,
        query: IngredientListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_ingredients(self, query, request).await
    }

    pub async fn get_ingredient(
        &self,
        ingredient_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_ingredient(self, ingredient_id, request).await
    }
}
