//! 短链接跳转，任何失败都跳到 /404，不返回 JSON 错误

use actix_web::{HttpRequest, HttpResponse, http::header};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::storage::Storage;
use crate::utils::short_link;

const NOT_FOUND_LOCATION: &str = "/404";

pub struct ShortLinkService {
    storage: Option<Arc<dyn Storage>>,
}

impl ShortLinkService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 解析短码并跳转到菜谱页面
    pub async fn redirect(&self, code: &str, request: &HttpRequest) -> HttpResponse {
        let location = match self.resolve(code, request).await {
            Ok(Some(recipe_id)) => format!("/recipes/{recipe_id}"),
            Ok(None) => {
                debug!("Short link {} does not resolve to a recipe", code);
                NOT_FOUND_LOCATION.to_string()
            }
            Err(e) => {
                warn!("Short link {} lookup failed: {}", code, e);
                NOT_FOUND_LOCATION.to_string()
            }
        };

        HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish()
    }

    async fn resolve(&self, code: &str, request: &HttpRequest) -> Result<Option<i64>> {
        let Some(recipe_id) = short_link::decode(code) else {
            return Ok(None);
        };
        let storage = self.get_storage(request)?;
        Ok(storage
            .get_recipe_by_id(recipe_id)
            .await?
            .map(|recipe| recipe.id))
    }
}
