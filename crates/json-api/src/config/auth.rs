//! Auth Config

use clap::Args;

/// Identity token settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Shared HS256 signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "JWT_TTL_SECONDS", default_value_t = 3_600)]
    pub jwt_ttl_seconds: i64,

    /// Password reset token lifetime in seconds
    #[arg(long, env = "RESET_TOKEN_TTL_SECONDS", default_value_t = 900)]
    pub reset_token_ttl_seconds: i64,
}
