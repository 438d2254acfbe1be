use std::{str::FromStr, time::Duration};

use crate::{
    protocol_objects::{LineFormat, SegmentArity},
    types::{DEFAULT_ACCEPT_TOKEN, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_LINE_LENGTH, FormatPolicy},
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4711;

/// Everything needed to open one coordination connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Sent as the first line after connecting.
    pub client_id: String,
    /// Bounds the TCP connect and the handshake exchange together.
    pub connect_timeout: Duration,
    /// Exact line the server answers the client id with when it accepts.
    pub accept_token: String,
    pub max_line_length: usize,
    pub line_format: LineFormat,
}

impl ClientConfig {
    pub fn new(host: &str, port: u16, client_id: &str) -> Self {
        Self {
            host: String::from(host),
            port,
            client_id: String::from(client_id),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            accept_token: String::from(DEFAULT_ACCEPT_TOKEN),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            line_format: LineFormat::default(),
        }
    }

    /// Reads `GROUPSENSE_*` variables, loading `.env` first when present.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::new(
            &env_string("GROUPSENSE_HOST", DEFAULT_HOST),
            env_parse("GROUPSENSE_PORT", DEFAULT_PORT),
            &env_string("GROUPSENSE_CLIENT_ID", ""),
        );
        config.connect_timeout = Duration::from_millis(env_parse(
            "GROUPSENSE_CONNECT_TIMEOUT_MS",
            u64::try_from(DEFAULT_CONNECT_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
        ));
        config.accept_token = env_string("GROUPSENSE_ACCEPT_TOKEN", DEFAULT_ACCEPT_TOKEN);
        config
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn with_accept_token(mut self, accept_token: &str) -> Self {
        self.accept_token = String::from(accept_token);
        self
    }

    #[must_use]
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    #[must_use]
    pub fn with_line_format(mut self, line_format: LineFormat) -> Self {
        self.line_format = line_format;
        self
    }

    #[must_use]
    pub fn with_segment_arity(mut self, arity: SegmentArity) -> Self {
        self.line_format.arity = arity;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FormatPolicy) -> Self {
        self.line_format.policy = policy;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| String::from(default))
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let config = ClientConfig::new("example.org", 9000, "phone-1");
        assert_eq!(config.addr(), "example.org:9000");
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.accept_token, "OK");
        assert_eq!(config.line_format, LineFormat::default());
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::new("h", 1, "c")
            .with_connect_timeout(Duration::from_millis(250))
            .with_accept_token("WELCOME")
            .with_segment_arity(SegmentArity::WithRole)
            .with_policy(FormatPolicy::Lenient);

        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.accept_token, "WELCOME");
        assert_eq!(config.line_format.arity, SegmentArity::WithRole);
        assert_eq!(config.line_format.policy, FormatPolicy::Lenient);
        assert!(config.line_format.room_prefixed);
    }

    #[test]
    fn env_parse_falls_back_on_missing_or_bad_values() {
        assert_eq!(env_parse("GROUPSENSE_TEST_DEFINITELY_UNSET", 7u16), 7);
    }
}
