//! 缓存层
//!
//! `ObjectCache` 以字符串形式存取对象，具体后端（moka / redis）通过插件注册表按名称创建。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};
