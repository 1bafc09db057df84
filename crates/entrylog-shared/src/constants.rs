/// Application name, used for data directories and logging.
pub const APP_NAME: &str = "entrylog";

/// Entrances assumed for a building that does not declare `entrancesMax`.
pub const DEFAULT_ENTRANCES_MAX: u32 = 5;

/// User id written to records when no device id has been provisioned.
pub const ANON_USER_ID: &str = "anon";

/// Accuracy (meters) below which an enhanced position fix is accepted early.
pub const ACCURACY_TARGET_METERS: f64 = 10.0;

/// Timeout for a single device location request, in seconds.
pub const LOCATE_TIMEOUT_SECS: u64 = 30;

/// Maximum attempts in enhanced acquisition mode.
pub const LOCATE_MAX_ATTEMPTS: u32 = 3;

/// Delay between enhanced-mode attempts, in seconds.
pub const LOCATE_RETRY_DELAY_SECS: u64 = 2;

/// Timeout for a single HTTP call to the remote log store, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Latitude bounds (degrees).
pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;

/// Longitude bounds (degrees).
pub const LNG_MIN: f64 = -180.0;
pub const LNG_MAX: f64 = 180.0;
