//! `Sforce-Limit-Info` response header

use eforce_domain::LimitInfo;

pub const LIMIT_INFO_HEADER: &str = "Sforce-Limit-Info";

/// Parse a header value such as `api-usage=25/15000`.
///
/// The header may list several comma-separated counters; only `api-usage`
/// is kept. Returns `None` when it is missing or malformed.
pub fn parse_limit_info(value: &str) -> Option<LimitInfo> {
    value
        .split(',')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim() == "api-usage")
        .and_then(|(_, usage)| {
            let (used, limit) = usage.trim().split_once('/')?;
            Some(LimitInfo::with_api_usage(
                used.trim().parse().ok()?,
                limit.trim().parse().ok()?,
            ))
        })
}
