//! Process configuration, read from command line flags and environment.
//!
//! Every option can be given as a flag or an environment variable; a flag
//! takes precedence over the environment, which takes precedence over the
//! default.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:6444";
pub const DEFAULT_AUTH_STR: &str = "supersecret";
pub const DEFAULT_HIPCHAT_API_URL: &str = "https://api.hipchat.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Parser)]
#[command(name = "hub_relay")]
#[command(about = "Relay Docker Hub build webhooks into a HipChat room", long_about = None)]
pub struct RelayConfig {
    /// HipChat API key
    #[arg(short = 'k', long = "hc-key", env = "HC_KEY")]
    pub hipchat_key: String,

    /// HipChat room to send notices to
    #[arg(short = 'r', long = "hc-room", env = "HC_ROOM")]
    pub hipchat_room: String,

    /// Whether or not a message should trigger a notification for people in the room
    /// Environment values accept 1/0, t/f, true/false, yes/no and on/off.
    #[arg(
        short = 'n',
        long = "hc-notify",
        env = "HC_NOTIFY",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub hipchat_notify: bool,

    /// Bind address to listen on
    #[arg(short = 'b', long = "bind", env = "HHH_BIND", default_value = DEFAULT_BIND_ADDRESS)]
    pub listen_addr: String,

    /// Auth string POST requests must include as the `token` query parameter
    #[arg(short = 'a', long = "auth", env = "HHH_AUTH", default_value = DEFAULT_AUTH_STR)]
    pub auth_str: String,

    /// Base URL of the HipChat v1 API
    #[arg(long = "hc-api-url", env = "HC_API_URL", default_value = DEFAULT_HIPCHAT_API_URL)]
    pub hipchat_api_url: String,

    /// Seconds to wait for HipChat before giving up on a notification
    #[arg(long = "hc-timeout", env = "HC_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub hipchat_timeout_secs: u64,

    /// Directory for daily rolling log files; console only when unset
    #[arg(long = "log-dir", env = "HHH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl RelayConfig {
    pub fn hipchat_timeout(&self) -> Duration {
        Duration::from_secs(self.hipchat_timeout_secs)
    }
}
