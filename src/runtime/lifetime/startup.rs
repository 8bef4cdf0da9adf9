use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::ingredients::requests::CreateIngredientRequest;
use crate::storage::Storage;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称构造缓存后端
async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>, String> {
    let constructor = get_object_cache_plugin(name)
        .ok_or_else(|| format!("cache backend '{name}' is not registered"))?;
    constructor()
        .await
        .map(Arc::from)
        .map_err(|e| format!("failed to create {name} cache: {e}"))
}

/// 创建缓存实例，配置的后端不可用时回退到进程内 moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>, String> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Using {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != "moka" => {
            warn!("{}, falling back to moka", e);
            build_cache("moka").await
        }
        Err(e) => Err(e),
    }
}

/// 解析食材 JSON 文件
fn load_ingredient_file(path: &Path) -> Result<Vec<CreateIngredientRequest>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("parse {}: {e}", path.display()))
}

/// 食材表为空时从数据文件导入
async fn seed_ingredients(storage: &Arc<dyn Storage>) {
    match storage.count_ingredients().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} ingredient(s), skipping seed", count);
            return;
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Failed to count ingredients: {}, skipping seed", e);
            return;
        }
    }

    let path = Path::new(&AppConfig::get().data.ingredients_file);
    if !path.exists() {
        info!(
            "Ingredient file {} not found, starting with an empty catalog",
            path.display()
        );
        return;
    }

    let items = match load_ingredient_file(path) {
        Ok(items) => items,
        Err(e) => {
            warn!("Failed to load ingredient file: {}", e);
            return;
        }
    };

    match storage.create_ingredients(items).await {
        Ok(imported) => info!("Imported {} ingredient(s) from {}", imported, path.display()),
        Err(e) => warn!("Failed to import ingredients: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和初始数据
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        debug!(
            "Registered cache backends: {:?}",
            crate::cache::register::registered_backends()
        );
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 首次启动导入食材
    seed_ingredients(&storage).await;

    // 创建缓存实例
    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_ingredient_file() {
        let path = std::env::temp_dir().join(format!("ingredients-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"name": "абрикосовое варенье", "measurement_unit": "г"}, {"name": "соль", "measurement_unit": "по вкусу"}]"#,
        )
        .unwrap();

        let items = load_ingredient_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "соль");
        assert_eq!(items[1].measurement_unit, "по вкусу");
    }

    #[test]
    fn test_load_ingredient_file_rejects_bad_json() {
        let path = std::env::temp_dir().join(format!("ingredients-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();

        let result = load_ingredient_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());

        assert!(load_ingredient_file(Path::new("/nonexistent/ingredients.json")).is_err());
    }
}
