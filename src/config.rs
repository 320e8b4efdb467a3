//! Configuration management for the notebook server.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks prefixed `NOTEBOOK_WWW_`:
//!
//! - `NOTEBOOK_WWW_HOST` - Server bind address (default: 0.0.0.0)
//! - `NOTEBOOK_WWW_PORT` - Server port (default: 8080)
//! - `NOTEBOOK_WWW_NOTEBOOK` - Notebook root directory (required)
//! - `NOTEBOOK_WWW_TEMPLATE` - `Default` or path to an HTML template file
//! - `NOTEBOOK_WWW_AUTH_USER` - Basic auth user name
//! - `NOTEBOOK_WWW_AUTH_PASSWORD` - Basic auth password
//! - `NOTEBOOK_WWW_REALM` - Realm announced in 401 challenges
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use notebook_www::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! println!("Serving {} on {}", config.notebook.display(), config.bind_address());
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::server::{Credentials, DEFAULT_REALM};
use crate::template::DEFAULT_TEMPLATE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// CLI Arguments
// =============================================================================

/// notebook-www - Serve a notebook of wiki pages over HTTP.
///
/// Pages are rendered to HTML through a template; attachments and template
/// resources are served as-is. Optionally protected with HTTP Basic auth.
#[derive(Parser, Debug, Clone)]
#[command(name = "notebook-www")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "NOTEBOOK_WWW_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "NOTEBOOK_WWW_PORT")]
    pub port: u16,

    // =========================================================================
    // Notebook Configuration
    // =========================================================================
    /// Root directory of the notebook.
    #[arg(short, long, env = "NOTEBOOK_WWW_NOTEBOOK")]
    pub notebook: PathBuf,

    /// Template: `Default` or the path of an HTML template file.
    ///
    /// A file template's resources live in the sibling folder named after
    /// the file without its extension.
    #[arg(short, long, default_value = DEFAULT_TEMPLATE, env = "NOTEBOOK_WWW_TEMPLATE")]
    pub template: String,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// User name for HTTP Basic authentication.
    ///
    /// Authentication is enabled when both user and password are set.
    #[arg(long, env = "NOTEBOOK_WWW_AUTH_USER")]
    pub auth_user: Option<String>,

    /// Password for HTTP Basic authentication.
    #[arg(long, env = "NOTEBOOK_WWW_AUTH_PASSWORD", hide_env_values = true)]
    pub auth_password: Option<String>,

    /// Realm announced in authentication challenges.
    #[arg(long, default_value = DEFAULT_REALM, env = "NOTEBOOK_WWW_REALM")]
    pub realm: String,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        match (&self.auth_user, &self.auth_password) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(
                    "Authentication needs both --auth-user and --auth-password \
                     (or NOTEBOOK_WWW_AUTH_USER and NOTEBOOK_WWW_AUTH_PASSWORD)"
                        .to_string(),
                );
            }
            (Some(user), Some(_)) if user.is_empty() => {
                return Err("auth user name must not be empty".to_string());
            }
            (Some(user), Some(_)) if user.contains(':') => {
                return Err("auth user name must not contain ':'".to_string());
            }
            _ => {}
        }

        if self.realm.chars().any(|c| c == '"' || c.is_control()) {
            return Err("realm must not contain quotes or control characters".to_string());
        }

        if self.template.is_empty() {
            return Err("template must not be empty".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured credential pair, if authentication is enabled.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.auth_user, &self.auth_password) {
            (Some(user), Some(password)) => Some(Credentials::new(user, password)),
            _ => None,
        }
    }

    /// Display name of the notebook: the last component of its directory.
    pub fn notebook_name(&self) -> String {
        self.notebook
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
