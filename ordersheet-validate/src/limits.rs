//! Field limits shared by validation and transformation.

pub const MAX_ORDER_ID_LEN: usize = 50;
pub const MAX_USERNAME_LEN: usize = 100;
pub const MAX_BROWSER_INFO_LEN: usize = 200;
pub const MAX_HIDDEN_TYPE_LEN: usize = 20;
pub const MAX_ACTION_TYPE_LEN: usize = 10;

/// Maximum number of tags kept per record.
pub const MAX_TAGS: usize = 20;
/// Maximum length of a single tag.
pub const MAX_TAG_LEN: usize = 50;

/// Order dates further than this from now are flagged.
pub const DATE_PLAUSIBILITY_YEARS: u32 = 50;
/// Timestamps further than this from now are flagged.
pub const TIMESTAMP_PLAUSIBILITY_YEARS: u32 = 10;
