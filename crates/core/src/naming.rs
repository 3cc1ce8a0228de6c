//! Object-storage key naming for generated images.

/// Reduce a category name to a lowercase, dash-separated key segment.
///
/// Falls back to `"uncategorized"` when nothing usable remains.
pub fn category_slug(category: &str) -> String {
    let mut slug = String::with_capacity(category.len());
    let mut pending_dash = false;
    for c in category.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "uncategorized".to_string()
    } else {
        slug
    }
}

/// Key for one scene image of a series: `{category}/series-{timestamp_ms}-{index}.{ext}`.
pub fn series_image_key(category: &str, timestamp_ms: i64, index: usize, extension: &str) -> String {
    format!(
        "{}/series-{timestamp_ms}-{index}.{extension}",
        category_slug(category)
    )
}

/// Key for a standalone page image: `{category}/page-{timestamp_ms}.{ext}`.
pub fn page_image_key(category: &str, timestamp_ms: i64, extension: &str) -> String {
    format!("{}/page-{timestamp_ms}.{extension}", category_slug(category))
}
