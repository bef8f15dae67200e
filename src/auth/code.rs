use std::ops::RangeInclusive;

use rand::{rngs::OsRng, Rng};

/// Valid one-time login codes.
pub const LOGIN_CODE_RANGE: RangeInclusive<i32> = 111_111..=999_999;

pub fn generate_login_code() -> i32 {
    OsRng.gen_range(LOGIN_CODE_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits_in_range() {
        for _ in 0..1_000 {
            let code = generate_login_code();
            assert!(LOGIN_CODE_RANGE.contains(&code), "{} out of range", code);
            assert_eq!(code.to_string().len(), 6);
        }
    }

    #[test]
    fn generated_codes_vary() {
        let first = generate_login_code();
        assert!((0..50).any(|_| generate_login_code() != first));
    }
}
