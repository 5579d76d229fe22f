//! Environment variable handling for the UPI payment proxy.
//!
//! Regular settings are read by the `config` crate using the
//! `UPIPAY__SECTION__KEY` pattern. Secrets use a separate
//! `UPIPAY_SECRET_SECTION_KEY` pattern, with a fallback to the variable names
//! used by older deployments (`RAZORPAY_KEY`, `RAZORPAY_SECRET`, ...).

/// The prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "UPIPAY";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "UPIPAY_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Secret paths and the variable names older deployments used for them.
const LEGACY_SECRET_NAMES: &[(&str, &str)] = &[
    ("razorpay.key_id", "RAZORPAY_KEY"),
    ("razorpay.key_secret", "RAZORPAY_SECRET"),
    ("razorpay.account_number", "RAZORPAY_ACCOUNT_NUMBER"),
];

/// Convert a configuration path to an environment variable name
///
/// `server.host` becomes `UPIPAY__SERVER__HOST`.
pub fn config_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", DEFAULT_PREFIX, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `razorpay.key_secret` becomes `UPIPAY_SECRET_RAZORPAY_KEY_SECRET`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy environment variable name.
///
/// Paths without an explicit legacy name fall back to `SERVICE_KEY`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    if let Some((_, legacy)) = LEGACY_SECRET_NAMES.iter().find(|(p, _)| *p == path) {
        return legacy.to_string();
    }

    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Look up a secret using the supplied lookup function.
///
/// The new naming pattern wins over the legacy one. Empty values count as
/// unset.
pub fn lookup_secret<F>(path: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&secret_path_to_env_var(path))
        .filter(|v| !v.is_empty())
        .or_else(|| lookup(&legacy_secret_path_to_env_var(path)).filter(|v| !v.is_empty()))
}
