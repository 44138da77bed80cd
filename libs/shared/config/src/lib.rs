use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::warn;

pub const SESSION_TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=24 * 365;
pub const MAX_ADVANCE_BOOKING_DAYS_RANGE: RangeInclusive<i64> = 1..=3650;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub max_advance_booking_days: i64,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using default");
                    "0.0.0.0:3000".to_string()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            session_ttl_hours: parse_in_range("SESSION_TTL_HOURS", 24, SESSION_TTL_HOURS_RANGE),
            max_advance_booking_days: parse_in_range(
                "MAX_ADVANCE_BOOKING_DAYS",
                90,
                MAX_ADVANCE_BOOKING_DAYS_RANGE,
            ),
            seed_demo_data: parse_or_default("SEED_DEMO_DATA", true),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - sessions cannot be issued without JWT_SECRET");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_in_range(key: &str, default: i64, range: RangeInclusive<i64>) -> i64 {
    let value = parse_or_default(key, default);
    if range.contains(&value) {
        value
    } else {
        warn!(
            "{} value {} is outside {}..={}, using default {}",
            key,
            value,
            range.start(),
            range.end(),
            default
        );
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default_falls_back_on_garbage() {
        env::set_var("SHARED_CONFIG_TEST_GARBAGE", "not-a-number");
        let value: i64 = parse_or_default("SHARED_CONFIG_TEST_GARBAGE", 42);
        assert_eq!(value, 42);
        env::remove_var("SHARED_CONFIG_TEST_GARBAGE");
    }

    #[test]
    fn test_parse_or_default_reads_value() {
        env::set_var("SHARED_CONFIG_TEST_BOOL", "false");
        let value: bool = parse_or_default("SHARED_CONFIG_TEST_BOOL", true);
        assert!(!value);
        env::remove_var("SHARED_CONFIG_TEST_BOOL");
    }

    #[test]
    fn test_session_ttl_out_of_range_falls_back() {
        for raw in ["9223372036854775807", "0", "-5"] {
            env::set_var("SHARED_CONFIG_TEST_TTL", raw);
            let value = parse_in_range("SHARED_CONFIG_TEST_TTL", 24, SESSION_TTL_HOURS_RANGE);
            assert_eq!(value, 24, "raw value {}", raw);
        }
        env::set_var("SHARED_CONFIG_TEST_TTL", "48");
        assert_eq!(parse_in_range("SHARED_CONFIG_TEST_TTL", 24, SESSION_TTL_HOURS_RANGE), 48);
        env::remove_var("SHARED_CONFIG_TEST_TTL");
    }

    #[test]
    fn test_booking_window_out_of_range_falls_back() {
        for raw in ["100000000", "0", "-30"] {
            env::set_var("SHARED_CONFIG_TEST_WINDOW", raw);
            let value =
                parse_in_range("SHARED_CONFIG_TEST_WINDOW", 90, MAX_ADVANCE_BOOKING_DAYS_RANGE);
            assert_eq!(value, 90, "raw value {}", raw);
        }
        env::set_var("SHARED_CONFIG_TEST_WINDOW", "3650");
        assert_eq!(
            parse_in_range("SHARED_CONFIG_TEST_WINDOW", 90, MAX_ADVANCE_BOOKING_DAYS_RANGE),
            3650
        );
        env::remove_var("SHARED_CONFIG_TEST_WINDOW");
    }

    #[test]
    fn test_missing_secret_is_not_configured() {
        let config = AppConfig {
            bind_address: "127.0.0.1:0".to_string(),
            jwt_secret: String::new(),
            session_ttl_hours: 24,
            max_advance_booking_days: 90,
            seed_demo_data: false,
        };
        assert!(!config.is_configured());
    }
}
