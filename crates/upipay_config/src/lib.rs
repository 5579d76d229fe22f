use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

pub mod env_vars;
pub mod models;

pub use models::*;

/// Upper bound for `razorpay.request_timeout_secs` and `razorpay.request_deadline_secs`.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `$CONFIG_DIR/default.*` (optional)
/// 2. `$CONFIG_DIR/$RUN_ENV.*` (optional, `RUN_ENV` defaults to `debug`)
/// 3. `UPIPAY__SECTION__KEY` environment variables
/// 4. secrets from `UPIPAY_SECRET_*` or the legacy `RAZORPAY_*` variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(env_vars::DEFAULT_PREFIX)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_secrets(raw_config, |name| env::var(name).ok());
    validate(&config)?;

    info!(
        run_env = %run_env,
        use_razorpay = config.use_razorpay,
        "Configuration loaded"
    );
    Ok(config)
}

/// Fills the Razorpay secrets from the given lookup.
///
/// A Razorpay section is created when credentials are found but the files did
/// not declare one.
pub fn apply_secrets<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let key_id = env_vars::lookup_secret("razorpay.key_id", &lookup);
    let key_secret = env_vars::lookup_secret("razorpay.key_secret", &lookup);
    let account_number = env_vars::lookup_secret("razorpay.account_number", &lookup);

    if config.razorpay.is_none() && (key_id.is_some() || key_secret.is_some()) {
        config.razorpay = Some(RazorpayConfig::default());
    }

    if let Some(razorpay) = config.razorpay.as_mut() {
        if let Some(key_id) = key_id {
            razorpay.key_id = key_id;
        }
        if let Some(key_secret) = key_secret {
            razorpay.key_secret = key_secret;
        }
        if account_number.is_some() {
            razorpay.account_number = account_number;
        }
    }
    config
}

/// Rejects configurations the service cannot run with.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if !config.use_razorpay {
        return Ok(());
    }
    let razorpay = config.razorpay.as_ref().ok_or_else(|| {
        ConfigError::Message("use_razorpay is set but no razorpay section or credentials were found".to_string())
    })?;
    if !razorpay.has_credentials() {
        return Err(ConfigError::Message(format!(
            "Razorpay key id and key secret must both be configured (set {} and {})",
            env_vars::secret_path_to_env_var("razorpay.key_id"),
            env_vars::secret_path_to_env_var("razorpay.key_secret"),
        )));
    }
    if razorpay.request_timeout_secs == 0 || razorpay.request_deadline_secs == 0 {
        return Err(ConfigError::Message(
            format!(
                "Razorpay timeouts must be greater than zero (see {})",
                env_vars::config_path_to_env_var("razorpay.request_timeout_secs")
            ),
        ));
    }
    for (path, secs) in [
        ("razorpay.request_timeout_secs", razorpay.request_timeout_secs),
        ("razorpay.request_deadline_secs", razorpay.request_deadline_secs),
    ] {
        if secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Message(format!(
                "{} is {}s, at most {}s is allowed (see {})",
                path,
                secs,
                MAX_TIMEOUT_SECS,
                env_vars::config_path_to_env_var(path)
            )));
        }
    }
    if razorpay.payout_account().is_none() && !razorpay.sandbox_mode {
        warn!(
            variable = %env_vars::secret_path_to_env_var("razorpay.account_number"),
            "No payout source account configured; /upi/payout will be rejected"
        );
    }
    Ok(())
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// `DOTENV_OVERRIDE` selects the file, otherwise a first command line argument
/// starting with `.env`, otherwise `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
