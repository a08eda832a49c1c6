//! Parsing of the `X-Shopify-Shop-Api-Call-Limit` header.

/// Name of the response header carrying the shop's call-limit accounting.
pub const CALL_LIMIT_HEADER: &str = "x-shopify-shop-api-call-limit";

/// Call-limit usage reported by Shopify on a single response.
///
/// The header format is `"<used>/<total>"`, e.g. `"32/40"` meaning 32 of the
/// shop's 40 credits are in use.
///
/// Parsing never fails: a missing header reads as `"0/0"`, and each side that
/// does not start with an integer reads as `0`. Values are passed through
/// without validation, so `used` may exceed `total`.
///
/// # Example
///
/// ```rust
/// use shopify_gateway::UsageReport;
///
/// let report = UsageReport::parse(Some("32/40"));
/// assert_eq!(report, UsageReport { used: 32, total: 40 });
/// assert_eq!(report.remaining(), 8);
///
/// assert_eq!(UsageReport::parse(None), UsageReport { used: 0, total: 0 });
/// assert_eq!(UsageReport::parse(Some("bad/40")), UsageReport { used: 0, total: 40 });
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsageReport {
    /// Credits in use.
    pub used: i64,
    /// Size of the bucket.
    pub total: i64,
}

impl UsageReport {
    /// Parses a call-limit header value.
    #[must_use]
    pub fn parse(header_value: Option<&str>) -> Self {
        let mut parts = header_value.unwrap_or("0/0").split('/');
        let used = parts.next().map_or(0, leading_integer);
        let total = parts.next().map_or(0, leading_integer);
        Self { used, total }
    }

    /// Credits still available according to this report (`total - used`).
    #[must_use]
    pub const fn remaining(&self) -> i64 {
        self.total.saturating_sub(self.used)
    }
}

/// Reads the longest integer prefix of `s`, or `0` if there is none.
///
/// Leading whitespace and one sign character are accepted. Values beyond the
/// range of `i64` saturate.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}
