//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application. Cache windows and timeouts are defaults; the owning config
//! structs allow environment overrides.

/// Seconds before real token expiry at which a cached token is refreshed
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 300;
/// Token lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

// Price cache refresh policy (OPPS)
pub const PRICE_CACHE_FULL_TTL_SECS: u64 = 1800;
pub const PRICE_SESSION_WINDOW_SECS: u64 = 300;
pub const PRICE_SESSION_REFRESH_EVERY: u64 = 10;

// Sourcing / availability cache windows (OMSA)
pub const SOURCING_CACHE_TTL_SECS: u64 = 600;
pub const AVAILABILITY_CACHE_TTL_SECS: u64 = 300;
pub const AVAILABILITY_CACHE_MAX_CAPACITY: u64 = 1000;

// Outbound call timeouts
pub const PRICING_TIMEOUT_SECS: u64 = 10;
pub const AVAILABILITY_TIMEOUT_SECS: u64 = 10;
pub const SOURCING_TIMEOUT_SECS: u64 = 15;
pub const ORDER_TIMEOUT_SECS: u64 = 15;
pub const PRODUCT_MASTER_TIMEOUT_SECS: u64 = 10;
pub const TOKEN_ENDPOINT_TIMEOUT_SECS: u64 = 10;

/// Backend item ids are zero-padded to this width
pub const ITEM_ID_WIDTH: usize = 18;

// Static fallback pricing used when a product has no cache entry
pub const FALLBACK_LIST_PRICE: f64 = 9.99;
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_UNIT: &str = "PCE";

// Order payload defaults
pub const DEFAULT_COUNTRY_CODE: &str = "DE";
pub const DEFAULT_HOUSE_NUMBER: &str = "1";
pub const DEFAULT_PAYMENT_METHOD: &str = "Bank";
pub const EXTERNAL_NUMBER_PREFIX: &str = "ST";
pub const EXTERNAL_NUMBER_SUFFIX_LEN: usize = 8;

// Sourcing request parameters
pub const SOURCING_STRATEGY_ID: &str = "STANDARD";
pub const SOURCING_RESERVATION_STATUS: &str = "PENDING";

/// Fixed fulfillment-site topology queried for availability. Store sites are
/// aggregated into the in-store total, the online site into the online total.
pub const STORE_SITE_IDS: &[&str] = &["1010", "1020"];
pub const ONLINE_SITE_ID: &str = "9001";
