//! Scene scalars edited from the settings panel.
pub use sceneconfig::PolygonMode;

pub const MAX_CLOUD_PROPORTION: f32 = sceneconfig::MAX_CLOUD_PROPORTION;

/// Scalar knobs read by the sky and water shaders. Setters clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    cloud_proportion: f32,
    bump_roughness: f32,
    bump_steepness: f32,
    bounce_amplitude: f32,
    polygon_mode: PolygonMode,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from(&sceneconfig::SettingsConfig::default())
    }
}

impl From<&sceneconfig::SettingsConfig> for SceneSettings {
    fn from(config: &sceneconfig::SettingsConfig) -> Self {
        let mut settings = Self {
            cloud_proportion: 0.0,
            bump_roughness: 0.0,
            bump_steepness: 0.0,
            bounce_amplitude: 0.0,
            polygon_mode: config.polygon_mode,
        };
        settings.set_cloud_proportion(config.cloud_proportion);
        settings.set_bump_roughness(config.bump_roughness);
        settings.set_bump_steepness(config.bump_steepness);
        settings.set_bounce_amplitude(config.bounce_amplitude);
        settings
    }
}

impl SceneSettings {
    pub fn cloud_proportion(&self) -> f32 {
        self.cloud_proportion
    }

    pub fn bump_roughness(&self) -> f32 {
        self.bump_roughness
    }

    pub fn bump_steepness(&self) -> f32 {
        self.bump_steepness
    }

    pub fn bounce_amplitude(&self) -> f32 {
        self.bounce_amplitude
    }

    pub fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    pub fn set_cloud_proportion(&mut self, value: f32) {
        self.cloud_proportion = if value.is_finite() {
            value.clamp(0.0, MAX_CLOUD_PROPORTION)
        } else {
            0.0
        };
    }

    pub fn set_bump_roughness(&mut self, value: f32) {
        self.bump_roughness = non_negative(value);
    }

    pub fn set_bump_steepness(&mut self, value: f32) {
        self.bump_steepness = non_negative(value);
    }

    pub fn set_bounce_amplitude(&mut self, value: f32) {
        self.bounce_amplitude = non_negative(value);
    }

    pub fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.polygon_mode = mode;
    }

    pub fn toggle_wireframe(&mut self) -> PolygonMode {
        self.polygon_mode = match self.polygon_mode {
            PolygonMode::Fill => PolygonMode::Wireframe,
            PolygonMode::Wireframe => PolygonMode::Fill,
        };
        self.polygon_mode
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_clamp() {
        let mut settings = SceneSettings::default();
        settings.set_cloud_proportion(0.9);
        assert_eq!(settings.cloud_proportion(), MAX_CLOUD_PROPORTION);
        settings.set_cloud_proportion(-1.0);
        assert_eq!(settings.cloud_proportion(), 0.0);
        settings.set_bump_roughness(-0.5);
        assert_eq!(settings.bump_roughness(), 0.0);
        settings.set_bump_steepness(f32::NAN);
        assert_eq!(settings.bump_steepness(), 0.0);
        settings.set_bounce_amplitude(2.5);
        assert_eq!(settings.bounce_amplitude(), 2.5);
    }

    #[test]
    fn wireframe_toggle_flips_mode() {
        let mut settings = SceneSettings::default();
        assert_eq!(settings.polygon_mode(), PolygonMode::Fill);
        assert_eq!(settings.toggle_wireframe(), PolygonMode::Wireframe);
        assert_eq!(settings.toggle_wireframe(), PolygonMode::Fill);
    }

    #[test]
    fn defaults_follow_config() {
        let settings = SceneSettings::default();
        let config = sceneconfig::SettingsConfig::default();
        assert_eq!(settings.cloud_proportion(), config.cloud_proportion);
        assert_eq!(settings.bump_roughness(), config.bump_roughness);
    }
}
