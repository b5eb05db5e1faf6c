// Central constants for validation rules, session lifetime and transport limits.
pub const CONTACT_HANDLE_SIGIL: char = '@';
pub const PHONE_PREFIX: &str = "89";
pub const PHONE_LEN: usize = 11;

// Filter codes typed by the caller during /search_ads.
pub const FILTER_KEYWORD: char = '1';
pub const FILTER_LOCATION: char = '2';
pub const FILTER_PRICE: char = '3';

pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

// Discord rejects message bodies above this many characters.
pub const MAX_MESSAGE_LEN: usize = 2000;
