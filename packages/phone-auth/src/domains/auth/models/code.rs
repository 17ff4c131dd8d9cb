use std::time::Duration;

/// Shape of the code and pacing of the resend countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpPolicy {
    pub code_length: usize,
    /// Countdown length in ticks.
    pub resend_interval: u32,
    /// Time between ticks (one second outside tests).
    pub tick: Duration,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            code_length: 6,
            resend_interval: 60,
            tick: Duration::from_secs(1),
        }
    }
}

/// Keep only ASCII digits, at most `max_len` of them.
pub fn sanitize_code(code: &str, max_len: usize) -> String {
    code.chars().filter(char::is_ascii_digit).take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_code() {
        assert_eq!(sanitize_code("123456", 6), "123456");
        assert_eq!(sanitize_code("12 34-5", 6), "12345");
        assert_eq!(sanitize_code("1234567", 6), "123456");
        assert_eq!(sanitize_code("", 6), "");
    }
}
