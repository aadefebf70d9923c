/// series-listing cache, written next to wherever the tool runs.
pub const CACHE_FILE: &str = "results-cache.json";
