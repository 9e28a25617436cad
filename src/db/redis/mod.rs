pub mod cache;

mod macros;

#[cfg(test)]
pub(crate) mod test_server;

pub use cache::create_redis_client;
pub use cache::Cache;
pub use cache::CacheKey;
pub use cache::CacheWriterHandle;
