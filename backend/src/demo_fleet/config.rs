//! Demo fleet configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Controls demonstration fleet seeding at startup.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEMO_FLEET")]
pub struct DemoFleetSettings {
    /// Insert the demonstration bikes on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> DemoFleetSettings {
        DemoFleetSettings::load_from_iter([OsString::from("bike-rental")])
            .expect("config should load")
    }

    #[rstest]
    fn seeding_is_off_by_default() {
        let _guard = lock_env([("DEMO_FLEET_ENABLED", None::<String>)]);

        assert!(!load_from_empty_args().enabled);
    }

    #[rstest]
    fn environment_enables_seeding() {
        let _guard = lock_env([("DEMO_FLEET_ENABLED", Some("true".to_owned()))]);

        assert!(load_from_empty_args().enabled);
    }
}
