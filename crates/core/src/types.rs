/// Logo ids are sequential per session, starting at 1.
pub type LogoId = u64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
