use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub list_config: ListConfig,
    pub default_route: String,
    pub app_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: "http://localhost:8000/api".to_string(),
            backend_url_production: "https://epc.example.org/api".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            list_config: ListConfig::default(),
            default_route: "/".to_string(),
            app_title: "Epicrisis Admin".to_string(),
        }
    }
}

/// Valores por defecto de las vistas de lista
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_page_size: usize,
    pub search_debounce_ms: u32,
    pub page_size_options: Vec<usize>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            search_debounce_ms: 350,
            page_size_options: vec![10, 20, 50, 100],
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_development),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_production),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            list_config: ListConfig {
                default_page_size: option_env!("DEFAULT_PAGE_SIZE")
                    .unwrap_or("20").parse().unwrap_or(20),
                search_debounce_ms: option_env!("SEARCH_DEBOUNCE_MS")
                    .unwrap_or("350").parse().unwrap_or(350),
                ..ListConfig::default()
            },
            default_route: option_env!("DEFAULT_ROUTE")
                .unwrap_or("/").to_string(),
            app_title: option_env!("APP_TITLE")
                .unwrap_or("Epicrisis Admin").to_string(),
        }
    }

    /// URL del backend según el entorno actual (sin barra final)
    pub fn backend_url(&self) -> &str {
        let url = match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        };
        url.trim_end_matches('/')
    }

    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Debug
        } else {
            log::Level::Warn
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_url_follows_environment() {
        let mut config = AppConfig::default();
        config.backend_url_development = "http://localhost:8000/api/".to_string();
        assert_eq!(config.backend_url(), "http://localhost:8000/api");

        config.environment = "production".to_string();
        assert_eq!(config.backend_url(), "https://epc.example.org/api");
    }

    #[test]
    fn log_level_depends_on_flag() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level(), log::Level::Debug);
        config.enable_logging = false;
        assert_eq!(config.log_level(), log::Level::Warn);
    }
}
