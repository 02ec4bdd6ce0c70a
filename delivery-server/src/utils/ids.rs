//! 记录 ID、订单号与验证码生成

use rand::Rng;
use uuid::Uuid;

/// Generate a new record key: 32 hex chars, no separators.
///
/// The plain-identifier alphabet keeps the same key usable verbatim in
/// both backends (SurrealDB record ids reject unescaped dashes).
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Generate a human-facing order number, unique in practice:
/// millisecond timestamp plus a random 4-digit suffix.
pub fn generate_order_number(now_ms: i64) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("ORD-{}-{:04}", now_ms, suffix)
}

/// Generate a 6-digit one-time verification code
pub fn generate_otp_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_embeds_timestamp() {
        let n = generate_order_number(1_722_000_000_000);
        assert!(n.starts_with("ORD-1722000000000-"));
        assert_eq!(n.len(), "ORD-1722000000000-0000".len());
    }

    #[test]
    fn record_keys_are_plain_identifiers() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..32 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
