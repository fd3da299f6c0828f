use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Import settings
    pub csv_file_path: String,
    pub batch_size: usize,

    // Storage
    pub db_path: String,

    // Lookup API settings
    pub api_listen_addr: String,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_file_path: "data_dump.csv".to_string(),
            batch_size: 1000,
            db_path: "geolocation.db".to_string(),
            api_listen_addr: "0.0.0.0:8080".to_string(),
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let csv_file_path = std::env::var("GEOLOCATION_CSV_FILE_PATH")
        .unwrap_or_else(|_| "data_dump.csv".to_string());

    let batch_size = std::env::var("GEOLOCATION_BATCH_SIZE")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .unwrap_or(1000);

    if batch_size == 0 {
        anyhow::bail!("GEOLOCATION_BATCH_SIZE must be positive");
    }

    let db_path = std::env::var("GEOLOCATION_DB_PATH")
        .unwrap_or_else(|_| "geolocation.db".to_string());

    let api_listen_addr = std::env::var("GEOLOCATION_API_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        csv_file_path,
        batch_size,
        db_path,
        api_listen_addr,
        debug,
    })
}
