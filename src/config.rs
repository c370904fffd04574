use crate::constants::*;
use crate::hours::WeeklySchedule;
use crate::utils::error::{SiteError, SiteResult};
use crate::visibility::{ObserverOptions, RootMargin};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything about the storefront behaviors that can be tuned from YAML.
///
/// Every section has defaults, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub hours: WeeklySchedule,
    pub open_sign: OpenSignSettings,
    pub ticket: TicketSettings,
    pub counters: CounterSettings,
    pub reveal: RevealSettings,
    pub nav: NavSettings,
    pub anchors: AnchorSettings,
    pub pickles: PickleSettings,
    pub parallax: ParallaxSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSignSettings {
    pub refresh_ms: u64,
    pub open_color: String,
    pub closed_color: String,
}

impl Default for OpenSignSettings {
    fn default() -> Self {
        Self {
            refresh_ms: OPEN_STATUS_REFRESH_MS,
            open_color: OPEN_SIGN_OPEN_COLOR.to_string(),
            closed_color: OPEN_SIGN_CLOSED_COLOR.to_string(),
        }
    }
}

impl OpenSignSettings {
    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    fn validate(&self) -> SiteResult<()> {
        if self.refresh_ms == 0 {
            return Err(SiteError::config("open sign refresh_ms must be at least 1"));
        }
        Ok(())
    }
}

/// "Now serving" ticket flip timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketSettings {
    pub start_delay_ms: u64,
    pub flip_duration_ms: u64,
    pub flip_steps_min: usize,
    pub flip_steps_max: usize,
    pub jump_min: u8,
    pub jump_max: u8,
    pub next_delay_min_ms: u64,
    pub next_delay_max_ms: u64,
    pub overshoot_ms: u64,
    pub overshoot_scale: f64,
}

impl Default for TicketSettings {
    fn default() -> Self {
        Self {
            start_delay_ms: TICKET_START_DELAY_MS,
            flip_duration_ms: TICKET_FLIP_DURATION_MS,
            flip_steps_min: TICKET_FLIP_STEPS_MIN,
            flip_steps_max: TICKET_FLIP_STEPS_MAX,
            jump_min: TICKET_JUMP_MIN,
            jump_max: TICKET_JUMP_MAX,
            next_delay_min_ms: TICKET_NEXT_DELAY_MIN_MS,
            next_delay_max_ms: TICKET_NEXT_DELAY_MAX_MS,
            overshoot_ms: TICKET_OVERSHOOT_MS,
            overshoot_scale: TICKET_OVERSHOOT_SCALE,
        }
    }
}

impl TicketSettings {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    pub fn overshoot(&self) -> Duration {
        Duration::from_millis(self.overshoot_ms)
    }

    fn validate(&self) -> SiteResult<()> {
        if self.flip_steps_min == 0 || self.flip_steps_min > self.flip_steps_max {
            return Err(SiteError::config(format!(
                "ticket flip steps must satisfy 1 <= min <= max, got {}..={}",
                self.flip_steps_min, self.flip_steps_max
            )));
        }
        if self.jump_min == 0 || self.jump_min > self.jump_max || self.jump_max >= TICKET_MODULUS {
            return Err(SiteError::config(format!(
                "ticket jump must satisfy 1 <= min <= max < {}, got {}..={}",
                TICKET_MODULUS, self.jump_min, self.jump_max
            )));
        }
        if self.next_delay_min_ms > self.next_delay_max_ms {
            return Err(SiteError::config(format!(
                "ticket next delay range is inverted: {}..={}ms",
                self.next_delay_min_ms, self.next_delay_max_ms
            )));
        }
        if !self.overshoot_scale.is_finite() || self.overshoot_scale <= 0.0 {
            return Err(SiteError::config("ticket overshoot scale must be positive"));
        }
        Ok(())
    }
}

/// Stat counter tween timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterSettings {
    pub duration_ms: u64,
    pub steps: u32,
    pub threshold: f64,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            duration_ms: COUNTER_DURATION_MS,
            steps: COUNTER_STEPS,
            threshold: COUNTER_THRESHOLD,
        }
    }
}

impl CounterSettings {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.duration_ms) / self.steps.max(1)
    }

    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions::new(self.threshold)
    }

    fn validate(&self) -> SiteResult<()> {
        if self.steps == 0 {
            return Err(SiteError::config("counter steps must be at least 1"));
        }
        if self.duration_ms == 0 {
            return Err(SiteError::config("counter duration_ms must be at least 1"));
        }
        validate_threshold("counters", self.threshold)
    }
}

/// Scroll-triggered fade in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub selector: String,
    pub threshold: f64,
    pub root_margin: RootMargin,
    pub stagger_groups: usize,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            selector: REVEAL_SELECTOR.to_string(),
            threshold: REVEAL_THRESHOLD,
            root_margin: RootMargin {
                bottom: REVEAL_BOTTOM_MARGIN,
                ..RootMargin::default()
            },
            stagger_groups: REVEAL_STAGGER_GROUPS,
        }
    }
}

impl RevealSettings {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions::new(self.threshold).with_root_margin(self.root_margin)
    }

    fn validate(&self) -> SiteResult<()> {
        crate::dom::Selector::parse(&self.selector)?;
        if self.stagger_groups == 0 {
            return Err(SiteError::config("reveal stagger groups must be at least 1"));
        }
        validate_threshold("reveal", self.threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavSettings {
    pub default_banner_height: f64,
    pub shadow_scrolled: String,
    pub shadow_top: String,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            default_banner_height: NAV_DEFAULT_BANNER_HEIGHT,
            shadow_scrolled: NAV_SHADOW_SCROLLED.to_string(),
            shadow_top: NAV_SHADOW_TOP.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorSettings {
    pub extra_offset: f64,
}

impl Default for AnchorSettings {
    fn default() -> Self {
        Self {
            extra_offset: ANCHOR_EXTRA_OFFSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickleSettings {
    pub stagger_ms: u64,
}

impl Default for PickleSettings {
    fn default() -> Self {
        Self {
            stagger_ms: PICKLE_STAGGER_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    pub factor: f64,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            factor: PARALLAX_FACTOR,
        }
    }
}

fn validate_threshold(section: &str, threshold: f64) -> SiteResult<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(SiteError::config(format!(
            "{} threshold must be within 0.0-1.0, got {}",
            section, threshold
        )));
    }
    Ok(())
}

impl SiteConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SiteResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SiteResult<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// `~/.benjis/config.yaml`, or `./.benjis/config.yaml` without a home directory
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".benjis")
            .join("config.yaml")
    }

    /// Loads `path` if it exists, otherwise the defaults.
    ///
    /// A file that exists but is invalid is an error rather than a silent fallback.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> SiteResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading site config");
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no site config, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> SiteResult<()> {
        self.hours.validate()?;
        self.ticket.validate()?;
        self.counters.validate()?;
        self.open_sign.validate()?;
        self.reveal.validate()?;
        Ok(())
    }
}
