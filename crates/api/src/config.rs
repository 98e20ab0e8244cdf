/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// Override via environment variables (or a `.env` file) in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Job record time-to-live in seconds (default: `600`).
    pub job_ttl_secs: u64,
    /// Path to the project snapshot JSON loaded at startup.
    pub snapshot_path: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `127.0.0.1`             |
    /// | `PORT`                 | `8080`                  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `JOB_TTL_SECS`         | `600`                   |
    /// | `PROJECT_SNAPSHOT`     | `project_snapshot.json` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let job_ttl_secs: u64 = std::env::var("JOB_TTL_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("JOB_TTL_SECS must be a valid u64");

        let snapshot_path =
            std::env::var("PROJECT_SNAPSHOT").unwrap_or_else(|_| "project_snapshot.json".into());

        Self {
            host,
            port,
            request_timeout_secs,
            job_ttl_secs,
            snapshot_path,
        }
    }
}
