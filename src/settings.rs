use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use storepilot_geo::{GeoBounds, GeoError, GridSize};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct BoundsSettings {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridSettings {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationSettings {
    /// Marker movement magnitude per display frame, in grid units.
    pub movement_per_frame: f64,
    /// Maximum spacing between interpolated path samples, in grid units.
    pub step_unit: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub tax_rate: f64,
    pub saved_list_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bounds: BoundsSettings,
    pub grid: GridSettings,
    pub animation: AnimationSettings,
    pub store: StoreSettings,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
            .build()
            .and_then(|config| config.try_deserialize::<Settings>());

        match settings {
            Ok(settings) => {
                info!("Successfully loaded configuration: {:?}", settings);
                Ok(settings)
            }
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                Err(e)
            }
        }
    }

    pub fn geo_bounds(&self) -> Result<GeoBounds, GeoError> {
        GeoBounds::new(
            self.bounds.lat_min,
            self.bounds.lat_max,
            self.bounds.lon_min,
            self.bounds.lon_max,
        )
    }

    pub fn grid_size(&self) -> Result<GridSize, GeoError> {
        GridSize::new(self.grid.width, self.grid.height)
    }
}

impl Default for Settings {
    /// The observed store configuration, used when no config file is
    /// present (tests, first run).
    fn default() -> Self {
        Settings {
            bounds: BoundsSettings {
                lat_min: 37.4215,
                lat_max: 37.4225,
                lon_min: -122.0850,
                lon_max: -122.0830,
            },
            grid: GridSettings {
                width: 20.0,
                height: 20.0,
            },
            animation: AnimationSettings {
                movement_per_frame: 0.08,
                step_unit: 0.2,
            },
            store: StoreSettings {
                tax_rate: 0.08,
                saved_list_path: "saved_list.json".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.geo_bounds().is_ok());
        assert!(settings.grid_size().is_ok());
        assert!(settings.animation.movement_per_frame > 0.0);
        assert!(settings.animation.step_unit > 0.0);
    }
}
