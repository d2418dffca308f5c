use crate::aggregates::pagination::PaginationStrategy;
use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, NEARBY_RADIUS_KM};
use crate::error::{AppError, AppResult};
use crate::localization::Language;
use crate::logger::Logger;
use colored::Color;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Runtime settings, read from `RESTO_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Language content falls back to when the requested one is missing.
    pub default_language: Language,
    pub nearby_radius_km: f64,
    pub page_limit: usize,
    pub pagination_strategy: PaginationStrategy,
    /// JSON file with rows to load into storage at startup.
    pub seed_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            nearby_radius_km: NEARBY_RADIUS_KM,
            page_limit: DEFAULT_PAGE_LIMIT,
            pagination_strategy: PaginationStrategy::default(),
            seed_file: None,
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let logger = Logger::new("Config", Color::Cyan);
        let defaults = Config::default();

        let nearby_radius_km: f64 = try_load(
            &lookup,
            &logger,
            "RESTO_NEARBY_RADIUS_KM",
            defaults.nearby_radius_km,
        )?;
        if !nearby_radius_km.is_finite() || nearby_radius_km <= 0.0 {
            return Err(invalid("RESTO_NEARBY_RADIUS_KM", "must be a positive number"));
        }

        let page_limit: usize =
            try_load(&lookup, &logger, "RESTO_PAGE_LIMIT", defaults.page_limit)?;
        if page_limit == 0 || page_limit > MAX_PAGE_LIMIT {
            return Err(invalid(
                "RESTO_PAGE_LIMIT",
                format!("must be between 1 and {}", MAX_PAGE_LIMIT),
            ));
        }

        Ok(Self {
            default_language: try_load(
                &lookup,
                &logger,
                "RESTO_DEFAULT_LANGUAGE",
                defaults.default_language,
            )?,
            nearby_radius_km,
            page_limit,
            pagination_strategy: try_load(
                &lookup,
                &logger,
                "RESTO_PAGINATION_STRATEGY",
                defaults.pagination_strategy,
            )?,
            seed_file: lookup("RESTO_SEED_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> AppError {
    AppError::InvalidConfig {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    logger: &Logger,
    key: &str,
    default: T,
) -> AppResult<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            logger.warn(format!("Invalid {} value '{}': {}", key, raw, e));
            invalid(key, e.to_string())
        }),
        None => {
            logger.debug(format!("{} not set, using default: {}", key, default));
            Ok(default)
        }
    }
}
