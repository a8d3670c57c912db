use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the Supabase project, e.g. https://xxxxx.supabase.co
    pub supabase_url: String,
    /// Public anon key for the project
    pub supabase_anon_key: String,
    /// Where the admin session is persisted between runs
    pub session_file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get the base URL without a trailing slash
    pub fn supabase_url(&self) -> &str {
        self.supabase_url.trim_end_matches('/')
    }

    pub fn session_file(&self) -> &str {
        self.session_file
            .as_deref()
            .unwrap_or(".portfolio-session.json")
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}
