use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Member QR payloads carry a `memberId:` marker (any case) followed by
/// optional whitespace and the id itself: a run of decimal digits for legacy
/// members, or exactly 24 lowercase hex characters for current ones. The id
/// must end at a word boundary, so ids glued to trailing text do not match.
/// The 24-hex alternative comes first or a hex id with a leading digit would
/// be cut short.
static MEMBER_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:memberid):\s*([0-9a-f]{24}|[0-9]+)\b").expect("member id pattern")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing decoded; callers skip these silently and keep scanning.
    #[error("no payload detected")]
    Empty,

    #[error("Invalid QR code format")]
    MalformedPayload,
}

/// Extract the member id from a raw scanned payload.
pub fn parse_member_id(raw: &str) -> Result<String, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    MEMBER_ID_RE
        .captures(raw)
        .map(|caps| caps[1].to_string())
        .ok_or(ParseError::MalformedPayload)
}
