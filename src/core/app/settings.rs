use std::time::Duration;

use crate::core::config::data::{Config, MissionConfig};

/// How fast the console types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub char_delay: Duration,
    pub garble: Duration,
    pub banner_char_delay: Duration,
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            char_delay: Duration::ZERO,
            garble: Duration::ZERO,
            banner_char_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Standard,
    Banner,
}

/// What `model_info` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub model_type: String,
    pub model: String,
    pub engine: String,
    pub endpoint: String,
    pub max_tokens: Option<u32>,
}

/// Read-only settings resolved from [`Config`] at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub pacing: Pacing,
    pub code_agent: String,
    pub mission: MissionConfig,
    pub model: ModelInfo,
    pub exit_grace: Duration,
}

impl AppSettings {
    pub fn from_config(config: &Config, animate: bool) -> Self {
        let pacing = if animate && config.animation.enabled {
            Pacing {
                char_delay: Duration::from_millis(config.animation.char_delay_ms),
                garble: Duration::from_millis(config.animation.garble_ms),
                banner_char_delay: Duration::from_millis(config.animation.banner_char_delay_ms),
            }
        } else {
            Pacing::instant()
        };
        Self {
            pacing,
            code_agent: config.execution.code_agent.clone(),
            mission: config.mission.clone(),
            model: ModelInfo {
                model_type: config.backend.model_type.clone(),
                model: config.backend.model.clone(),
                engine: config.backend.engine.clone(),
                endpoint: config.backend.base_url.clone(),
                max_tokens: config.backend.max_tokens,
            },
            exit_grace: config.exit_grace(),
        }
    }

    pub fn delays(&self, pace: Pace) -> (Duration, Duration) {
        match pace {
            Pace::Standard => (self.pacing.char_delay, self.pacing.garble),
            Pace::Banner => (self.pacing.banner_char_delay, self.pacing.garble),
        }
    }
}
