/// Number of entries shown in the upcoming-occurrence list.
pub const UPCOMING_LIMIT: usize = 5;

/// Number of entries shown in the dashboard activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Days in the calendar week window.
pub const WEEK_LENGTH: i64 = 7;

/// Storage bucket holding formation and event images.
pub const IMAGE_BUCKET: &str = "odc-images";

/// Largest image accepted for upload (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_LOCATION_LEN: usize = 255;
pub const MAX_LINK_LEN: usize = 500;
pub const MAX_IMAGE_REF_LEN: usize = 500;
