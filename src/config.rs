use std::sync::LazyLock;

pub struct AppConfig {
    db_url: String,
    media_bind: String,
    api_bind: String,
    ffmpeg_path: String,
    ffprobe_path: String,
    max_sessions: usize,
    max_part_size: usize,
}

impl AppConfig {
    fn from_env() -> Self {
        Self {
            db_url: env_or("TUNECAST_DB", "tunecast.db"),
            media_bind: env_or("TUNECAST_MEDIA_BIND", "0.0.0.0:5090"),
            api_bind: env_or("TUNECAST_API_BIND", "0.0.0.0:8080"),
            ffmpeg_path: env_or("TUNECAST_FFMPEG", "ffmpeg"),
            ffprobe_path: env_or("TUNECAST_FFPROBE", "ffprobe"),
            max_sessions: env_or_parse("TUNECAST_MAX_SESSIONS", 4),
            max_part_size: env_or_parse("TUNECAST_MAX_PART_SIZE", 65536),
        }
    }

    pub fn db_url(&self) -> &str {
        &self.db_url
    }

    pub fn media_bind(&self) -> &str {
        &self.media_bind
    }

    pub fn api_bind(&self) -> &str {
        &self.api_bind
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }

    /// Ceiling on concurrent transcode jobs, scoped to one connection.
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Upper bound on the chunk size of a single part response, in bytes.
    pub fn max_part_size(&self) -> usize {
        self.max_part_size
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub fn config() -> &'static AppConfig {
    static CONFIG: LazyLock<AppConfig> = LazyLock::new(AppConfig::from_env);
    &CONFIG
}
