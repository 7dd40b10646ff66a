//! Arithmetic between UI pages and upstream API pages.
//!
//! TMDB serves fixed pages of 20 while the UI shows 10 rows, so every
//! UI page maps to an upstream page plus an offset inside it. The math
//! generalizes to any integer upstream:local ratio. When the upstream
//! page size is not an exact multiple of the local size, the ratio is
//! taken as the integer quotient (minimum 1) and each upstream page is
//! split evenly; the deployed ratio is 2:1 and only that case is
//! exercised against the live API.

use crate::types::MediaItem;

/// How many local pages fit in one upstream page. Never less than 1.
fn ratio(local_size: usize, upstream_size: usize) -> usize {
    (upstream_size / local_size).max(1)
}

/// The 1-based upstream page that contains `local_page` (1-based).
pub fn upstream_page(local_page: u32, local_size: usize, upstream_size: usize) -> u32 {
    let r = ratio(local_size, upstream_size) as u32;
    local_page.max(1).div_ceil(r)
}

/// Offset of `local_page`'s first item inside its upstream page.
pub fn offset_in_upstream(local_page: u32, local_size: usize, upstream_size: usize) -> usize {
    let r = ratio(local_size, upstream_size);
    ((local_page.max(1) as usize - 1) % r) * local_size
}

/// Slice `local_size` items starting at `offset`, clamped to the data
/// actually present. Out-of-range offsets yield an empty slice.
pub fn window(items: &[MediaItem], offset: usize, local_size: usize) -> Vec<MediaItem> {
    let start = offset.min(items.len());
    let end = (offset + local_size).min(items.len());
    items[start..end].to_vec()
}

/// Local page count derived from a result total. At least 1 so the UI
/// always has a current page to stand on.
pub fn total_local_pages(total_results: u64, local_size: usize) -> u32 {
    total_results.div_ceil(local_size as u64).max(1) as u32
}
