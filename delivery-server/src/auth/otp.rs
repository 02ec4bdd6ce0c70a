//! One-time verification codes

/// Codes expire after 10 minutes
pub const OTP_TTL_MINUTES: i64 = 10;

/// Expiry instant for a code issued at `now_ms`
pub fn otp_expiry(now_ms: i64) -> i64 {
    now_ms + OTP_TTL_MINUTES * 60_000
}

/// Check a submitted code against the stored one
pub fn otp_is_valid(
    stored_code: Option<&str>,
    stored_expiry: Option<i64>,
    submitted: &str,
    now_ms: i64,
) -> bool {
    match (stored_code, stored_expiry) {
        (Some(code), Some(expiry)) => code == submitted && now_ms <= expiry,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_code_within_ttl() {
        let issued = 1_000_000;
        let expiry = otp_expiry(issued);
        assert!(otp_is_valid(Some("123456"), Some(expiry), "123456", issued + 60_000));
    }

    #[test]
    fn expired_code_is_rejected() {
        let issued = 1_000_000;
        let expiry = otp_expiry(issued);
        assert!(!otp_is_valid(Some("123456"), Some(expiry), "123456", expiry + 1));
    }

    #[test]
    fn wrong_or_absent_code_is_rejected() {
        let expiry = otp_expiry(0);
        assert!(!otp_is_valid(Some("123456"), Some(expiry), "654321", 1));
        assert!(!otp_is_valid(None, None, "123456", 1));
    }
}
