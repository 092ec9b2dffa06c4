//! Application constants

/// Database used when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite://stashbox.db?mode=rwc";

/// Port used when `PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;

/// Pool size used when `DATABASE_MAX_CONNECTIONS` is unset
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
