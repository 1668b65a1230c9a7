/// An environment variable understood by the daemon, with its fallback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvKey {
    pub name: &'static str,
    pub default: Option<&'static str>,
}

macro_rules! env_key {
    ($name:ident = $env_key:literal, $default:expr) => {
        pub const $name: EnvKey = EnvKey {
            name: $env_key,
            default: $default,
        };
    };
    ($name:ident, $default:expr) => {
        paste::paste! {
            pub const [<PURGE_ $name>]: EnvKey = EnvKey {
                name: stringify!([<PURGE_ $name>]),
                default: $default,
            };
        }
    };
}

env_key!(TARGET_DIR, None);
env_key!(MAX_AGE_DAYS, Some("30"));
env_key!(CHECK_INTERVAL, Some("3600"));
env_key!(DRY_RUN, Some("false"));
env_key!(NOTIFY_IDLE, Some("false"));
env_key!(NOTIFY_TIMEOUT, Some("5"));
env_key!(DISCORD_WEBHOOK_URL = "DISCORD_WEBHOOK_URL", None);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(PURGE_TARGET_DIR.name, "PURGE_TARGET_DIR");
        assert_eq!(PURGE_TARGET_DIR.default, None);
        assert_eq!(PURGE_CHECK_INTERVAL.name, "PURGE_CHECK_INTERVAL");
        assert_eq!(PURGE_MAX_AGE_DAYS.default, Some("30"));
        assert_eq!(DISCORD_WEBHOOK_URL.name, "DISCORD_WEBHOOK_URL");
    }
}
