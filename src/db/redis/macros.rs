/// Read-through caching for an `AppResult`-returning future.
///
/// Returns the value stored under `$key` when present. Otherwise awaits
/// `$fetch`, queues the fetched value for caching with `$ttl` seconds to live,
/// and returns it. A failed cache read is logged and treated as a miss, so the
/// source stays reachable while Redis is down. Errors from `$fetch` are
/// propagated with `?`, so the macro must be used inside a function returning
/// `AppResult`.
///
/// ```rust,ignore
/// let dictionaries: Vec<Dictionary> =
///     cached!(cache, CacheKey::Dictionaries, ttl, store.list_dictionaries())?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        let cached = match $cache.get(&key).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        };
        match cached {
            Some(hit) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(hit)
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                let value = $fetch.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
