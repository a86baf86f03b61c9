//! Comma-separated tag cells.

/// Separator used when writing tags back to a cell.
const TAG_JOINER: &str = ", ";

/// Splits a tag cell on `,`, trimming each token and dropping empty ones.
#[must_use]
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins tags into a single cell value.
#[must_use]
pub fn join_tags(tags: &[String]) -> String {
    tags.join(TAG_JOINER)
}
