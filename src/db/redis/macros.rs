/// Read-through caching over an optional [`Cache`](crate::db::Cache).
///
/// Looks `$key` up first; on a hit the cached value is returned. On a miss (or when no
/// cache is configured, or the read itself fails) the `$fetch` future is awaited, its
/// value queued for a background write with `$ttl` seconds to live, and returned.
/// Errors from `$fetch` are returned as is.
///
/// An optional fifth argument is a predicate over `&value`; fetched values for which it
/// returns `false` are returned but not written.
///
/// # Example
/// ```rust,ignore
/// let tracks = cached!(self.cache, CacheKey::TrackSearch(q.into()), 3600, self.request(&query))?;
/// let track = cached!(self.cache, CacheKey::Track(id), 3600, self.lookup(&id), Option::is_some)?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {
        $crate::cached!($cache, $key, $ttl, $fetch, |_| true)
    };
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr, $store_if:expr) => {{
        let key = $key;
        let cache = $cache.as_ref();
        let hit = match cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                    None
                }
            },
            None => None,
        };
        match hit {
            Some(value) => Ok(value),
            None => match $fetch.await {
                Ok(value) => {
                    if let Some(cache) = cache {
                        if ($store_if)(&value) {
                            cache.set_in_background(&key, &value, $ttl);
                        }
                    }
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
