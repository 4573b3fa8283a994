//! Server configuration
//!
//! Every option can come from the command line or the environment
//! (a `.env` file is loaded first by the binary).

use clap::Parser;

#[derive(Parser, Clone)]
#[command(name = "pomodoro-auth")]
#[command(about = "Pomodoro backend - cookie session authentication")]
pub struct Config {
    /// Secret used to sign and verify session tokens
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// SQLite database holding user accounts
    #[arg(long, env = "AUTH_DB_PATH", default_value = "pomodoro_auth.db")]
    pub db_path: String,

    /// Listen address
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Browser origin allowed to call with credentials (permissive CORS when unset)
    #[arg(long, env = "CLIENT_ORIGIN")]
    pub client_origin: Option<String>,

    /// Mark the session cookie `Secure`
    #[arg(long, env = "COOKIE_SECURE", default_value_t = false, action = clap::ArgAction::Set)]
    pub cookie_secure: bool,

    /// Reject whoami requests that reach the handler without a user
    #[arg(
        long,
        env = "REQUIRE_USER_ON_VALIDATE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub require_user_on_validate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["pomodoro-auth", "--secret", "s3cr3t"]).unwrap();

        assert_eq!(config.secret.as_deref(), Some("s3cr3t"));
        assert_eq!(config.db_path, "pomodoro_auth.db");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(!config.cookie_secure);
        assert!(config.require_user_on_validate);
    }

    #[test]
    fn test_flags_override() {
        let config = Config::try_parse_from([
            "pomodoro-auth",
            "--db-path",
            "/tmp/users.db",
            "--cookie-secure",
            "true",
            "--require-user-on-validate",
            "false",
            "--client-origin",
            "http://localhost:3000",
        ])
        .unwrap();

        assert_eq!(config.db_path, "/tmp/users.db");
        assert!(config.cookie_secure);
        assert!(!config.require_user_on_validate);
        assert_eq!(config.client_origin.as_deref(), Some("http://localhost:3000"));
    }
}
