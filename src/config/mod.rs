use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::PriceTable;
use crate::services::catalog::{SeatLayout, SeatsPerRow};

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub tmdb: TmdbConfig,
    pub seating: SeatingConfig,
    pub pricing: PricingConfig,
    pub payment: PaymentConfig,
    pub sessions: SessionConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Настройки клиента каталога фильмов (TMDB)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub timeout_seconds: u64,
}

// Схема зала и источник доступности мест
#[derive(Debug, Clone, Deserialize)]
pub struct SeatingConfig {
    pub rows: u16,
    pub wide_rows: u16,
    pub seats_wide: u16,
    pub seats_narrow: u16,
    pub vip_rows: u16,
    pub availability_ratio: f64,
    pub availability_seed: Option<u64>,
}

// Цены по категориям мест
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    pub regular: u32,
    pub vip: u32,
}

// Настройки имитации оплаты
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub processing_delay_ms: u64,
    pub simulate_failure: bool,
}

// Время жизни брошенных сессий выбора мест
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid value, got '{value}'")]
    Invalid { name: &'static str, value: String },
}

impl SeatingConfig {
    pub fn layout(&self) -> SeatLayout {
        SeatLayout {
            rows: self.rows,
            seats_per_row: SeatsPerRow::Tiered {
                wide_rows: self.wide_rows,
                wide: self.seats_wide,
                narrow: self.seats_narrow,
            },
            vip_rows: self.vip_rows,
        }
    }
}

impl PricingConfig {
    pub fn price_table(&self) -> PriceTable {
        PriceTable::new(self.regular, self.vip)
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Сборка конфигурации из произвольного источника переменных.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &'static str, default: &str| -> String {
            lookup(name).unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parse_var(&lookup, "PORT", "8000")?,
                environment: var_or("ENVIRONMENT", "development"),
                rust_log: var_or("RUST_LOG", "cinema_booking=debug,tower_http=debug"),
            },
            tmdb: TmdbConfig {
                api_key: lookup("TMDB_API_KEY").ok_or(ConfigError::Missing("TMDB_API_KEY"))?,
                base_url: var_or("TMDB_BASE_URL", "https://api.themoviedb.org/3"),
                image_base_url: var_or("TMDB_IMAGE_BASE_URL", "https://image.tmdb.org/t/p"),
                timeout_seconds: parse_var(&lookup, "TMDB_TIMEOUT_SECONDS", "10")?,
            },
            seating: SeatingConfig {
                rows: parse_var(&lookup, "SEAT_ROWS", "14")?,
                wide_rows: parse_var(&lookup, "SEAT_WIDE_ROWS", "10")?,
                seats_wide: parse_var(&lookup, "SEATS_PER_WIDE_ROW", "8")?,
                seats_narrow: parse_var(&lookup, "SEATS_PER_NARROW_ROW", "6")?,
                vip_rows: parse_var(&lookup, "VIP_ROWS", "3")?,
                availability_ratio: parse_var(&lookup, "SEAT_AVAILABILITY_RATIO", "0.7")?,
                availability_seed: match lookup("SEAT_AVAILABILITY_SEED") {
                    Some(raw) => Some(parse_value("SEAT_AVAILABILITY_SEED", raw)?),
                    None => None,
                },
            },
            pricing: PricingConfig {
                regular: parse_var(&lookup, "PRICE_REGULAR", "50")?,
                vip: parse_var(&lookup, "PRICE_VIP", "150")?,
            },
            payment: PaymentConfig {
                processing_delay_ms: parse_var(&lookup, "PAYMENT_DELAY_MS", "2000")?,
                simulate_failure: parse_var(&lookup, "PAYMENT_SIMULATE_FAILURE", "false")?,
            },
            sessions: SessionConfig {
                ttl_seconds: parse_var(&lookup, "SESSION_TTL_SECONDS", "900")?,
                cleanup_interval_seconds: parse_positive(
                    &lookup,
                    "SESSION_CLEANUP_INTERVAL_SECONDS",
                    "60",
                )?,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(name).unwrap_or_else(|| default.to_string());
    parse_value(name, raw)
}

// tokio::time::interval паникует на нулевом периоде.
fn parse_positive<F>(lookup: &F, name: &'static str, default: &str) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var(lookup, name, default)? {
        0 => Err(ConfigError::Invalid { name, value: "0".to_string() }),
        value => Ok(value),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_reference_hall() {
        let config = config_from(&[("TMDB_API_KEY", "secret")]).unwrap();
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.seating.layout(), SeatLayout::reference());
        assert_eq!(config.pricing.price_table(), PriceTable::new(50, 150));
        assert_eq!(config.payment.processing_delay_ms, 2000);
        assert_eq!(config.seating.availability_seed, None);
        assert_eq!(config.sessions.ttl(), Duration::from_secs(900));
        assert_eq!(config.sessions.cleanup_interval(), Duration::from_secs(60));
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        let err = config_from(&[("TMDB_API_KEY", "k"), ("SESSION_CLEANUP_INTERVAL_SECONDS", "0")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SESSION_CLEANUP_INTERVAL_SECONDS",
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn api_key_is_required() {
        assert_eq!(config_from(&[]).unwrap_err(), ConfigError::Missing("TMDB_API_KEY"));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = config_from(&[("TMDB_API_KEY", "k"), ("SEAT_ROWS", "-3")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SEAT_ROWS",
                value: "-3".to_string()
            }
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("TMDB_API_KEY", "k"),
            ("VIP_ROWS", "5"),
            ("PRICE_VIP", "200"),
            ("SEAT_AVAILABILITY_SEED", "7"),
            ("PAYMENT_SIMULATE_FAILURE", "true"),
        ])
        .unwrap();
        assert_eq!(config.seating.vip_rows, 5);
        assert_eq!(config.pricing.vip, 200);
        assert_eq!(config.seating.availability_seed, Some(7));
        assert!(config.payment.simulate_failure);
    }
}
