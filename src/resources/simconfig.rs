//! Simulation configuration resource.
//!
//! [`SimConfig`] is a plain struct with safe defaults. It can be built in
//! code or loaded from an INI file; either way it must pass
//! [`SimConfig::validate`] before a [`Simulation`](crate::simulation::Simulation)
//! accepts it.
//!
//! # Configuration File Format
//!
//! ```ini
//! [playfield]
//! boundary = bounce          ; clamp | wrap | bounce | destroy_on_exit
//! min_x = 0
//! min_y = 0
//! max_x = 800
//! max_y = 600
//! clamp_velocity = zero      ; zero | keep
//! max_entities = 256         ; omit for no limit
//!
//! [collision]
//! mode = edge                ; edge | level
//! broad_phase = grid         ; brute_force | grid
//! cell_size = 64
//! response = elastic         ; none | elastic
//! target_speed = 200         ; omit to keep speeds as they are
//!
//! [camera]
//! alpha = 0.1
//! viewport_width = 800
//! viewport_height = 600
//! bounds_min_x = 0           ; the four bounds keys are optional
//! bounds_min_y = 0
//! bounds_max_x = 1600
//! bounds_max_y = 1200
//!
//! [drag]
//! return_to_origin = true
//! return_duration = 0.4
//! return_easing = quad_out
//!
//! [sim]
//! seed = 12345
//! time_scale = 1.0
//! ```

use std::path::Path;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::DVec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::tween::Easing;
use crate::error::SimError;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;
const DEFAULT_CAMERA_ALPHA: f64 = 0.1;
const DEFAULT_SEED: u64 = 0x5EED;

/// Axis-aligned rectangle given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: DVec2::new(min_x, min_y),
            max: DVec2::new(max_x, max_y),
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// True if the rectangle has a positive, finite area.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }
}

/// What happens when an entity reaches the edge of the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Keep the entity's full extent inside the bounds.
    Clamp,
    /// Toroidal wrap to the opposite edge.
    Wrap,
    /// Reflect the velocity off the violated edge.
    #[default]
    Bounce,
    /// Destroy the entity once it is fully outside.
    DestroyOnExit,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::Clamp => "clamp",
            BoundaryPolicy::Wrap => "wrap",
            BoundaryPolicy::Bounce => "bounce",
            BoundaryPolicy::DestroyOnExit => "destroy_on_exit",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Some(BoundaryPolicy::Clamp),
            "wrap" => Some(BoundaryPolicy::Wrap),
            "bounce" => Some(BoundaryPolicy::Bounce),
            "destroy_on_exit" | "destroy" => Some(BoundaryPolicy::DestroyOnExit),
            _ => None,
        }
    }
}

/// Velocity handling on an axis where the Clamp policy moved the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampVelocity {
    /// The velocity component on the clamped axis becomes zero.
    #[default]
    Zero,
    /// The velocity is left untouched; the entity keeps pushing the wall.
    Keep,
}

/// Collision counting semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// One event when a pair starts overlapping.
    #[default]
    Edge,
    /// One event per step while a pair overlaps.
    Level,
}

/// Candidate pair generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhase {
    /// Every pair of active entities.
    #[default]
    BruteForce,
    /// Uniform spatial hash with square cells.
    Grid { cell_size: f64 },
}

/// Built-in velocity response applied to colliding pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    /// Velocities are left to collision handlers.
    #[default]
    None,
    /// Equal-mass elastic exchange along the contact normal. Obstacles and
    /// frozen bodies are immovable walls.
    Elastic,
}

/// Return-to-origin animation played when a dragged entity is released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragReturn {
    pub duration: f64,
    pub easing: Easing,
}

impl Default for DragReturn {
    fn default() -> Self {
        Self {
            duration: 0.4,
            easing: Easing::QuadOut,
        }
    }
}

/// Simulation configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Boundary policy applied after integration.
    pub boundary_policy: BoundaryPolicy,
    /// Playfield rectangle the boundary policy operates over.
    pub bounds: Rect,
    /// Maximum number of live entities; `None` means unbounded.
    pub max_entities: Option<usize>,
    /// Edge- or level-triggered collision events.
    pub collision_mode: CollisionMode,
    /// Speed every bounced or colliding body is renormalized to.
    pub target_speed: Option<f64>,
    /// Camera smoothing factor in (0, 1], applied once per step.
    pub camera_alpha: f64,
    /// Rectangle the camera view must stay inside.
    pub camera_bounds: Option<Rect>,
    /// Full size of the camera view in world units.
    pub viewport: DVec2,
    /// Velocity handling for the Clamp policy.
    pub clamp_velocity: ClampVelocity,
    /// Broad-phase strategy.
    pub broad_phase: BroadPhase,
    /// Built-in collision response.
    pub collision_response: CollisionResponse,
    /// Return-to-origin tween after a drag; `None` leaves entities where dropped.
    pub drag_return: Option<DragReturn>,
    /// Seed for the spawn scheduler's random generators.
    pub seed: u64,
    /// Initial time scale.
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a configuration with safe default values.
    pub fn new() -> Self {
        Self {
            boundary_policy: BoundaryPolicy::default(),
            bounds: Rect::from_size(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            max_entities: None,
            collision_mode: CollisionMode::default(),
            target_speed: None,
            camera_alpha: DEFAULT_CAMERA_ALPHA,
            camera_bounds: None,
            viewport: DVec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            clamp_velocity: ClampVelocity::default(),
            broad_phase: BroadPhase::default(),
            collision_response: CollisionResponse::default(),
            drag_return: None,
            seed: DEFAULT_SEED,
            time_scale: 1.0,
        }
    }

    pub fn with_boundary(mut self, policy: BoundaryPolicy, bounds: Rect) -> Self {
        self.boundary_policy = policy;
        self.bounds = bounds;
        self
    }

    pub fn with_collision_mode(mut self, mode: CollisionMode) -> Self {
        self.collision_mode = mode;
        self
    }

    pub fn with_target_speed(mut self, speed: f64) -> Self {
        self.target_speed = Some(speed);
        self
    }

    pub fn with_max_entities(mut self, max: usize) -> Self {
        self.max_entities = Some(max);
        self
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.bounds.is_valid() {
            return Err(SimError::Config(format!(
                "{} policy needs bounds with a positive area, got {}x{}",
                self.boundary_policy.as_str(),
                self.bounds.width(),
                self.bounds.height()
            )));
        }
        if !(self.camera_alpha > 0.0 && self.camera_alpha <= 1.0) {
            return Err(SimError::Config(format!(
                "camera alpha must be in (0, 1], got {}",
                self.camera_alpha
            )));
        }
        if let Some(speed) = self.target_speed
            && !(speed.is_finite() && speed > 0.0)
        {
            return Err(SimError::Config(format!(
                "target speed must be positive, got {speed}"
            )));
        }
        if self.max_entities == Some(0) {
            return Err(SimError::Config("max_entities must be at least 1".into()));
        }
        if let Some(bounds) = self.camera_bounds
            && !bounds.is_valid()
        {
            return Err(SimError::Config(
                "camera bounds need a positive area".into(),
            ));
        }
        if !(self.viewport.is_finite() && self.viewport.x >= 0.0 && self.viewport.y >= 0.0) {
            return Err(SimError::Config(format!(
                "viewport must be non-negative, got {}x{}",
                self.viewport.x, self.viewport.y
            )));
        }
        if let BroadPhase::Grid { cell_size } = self.broad_phase
            && !(cell_size.is_finite() && cell_size > 0.0)
        {
            return Err(SimError::Config(format!(
                "grid cell size must be positive, got {cell_size}"
            )));
        }
        if let Some(ret) = self.drag_return
            && !(ret.duration.is_finite() && ret.duration > 0.0)
        {
            return Err(SimError::Config(format!(
                "drag return duration must be positive, got {}",
                ret.duration
            )));
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(SimError::Config(format!(
                "time scale must be non-negative, got {}",
                self.time_scale
            )));
        }
        Ok(())
    }

    /// Load configuration from an INI file on top of the defaults.
    ///
    /// Missing keys keep their default values; malformed values are errors.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|e| SimError::Parse(format!("Failed to load config file: {e}")))?;
        let mut config = Self::new();
        config.apply_ini(&ini)?;
        info!(
            "Loaded config from {:?}: {} over {}x{}, {:?} collisions",
            path,
            config.boundary_policy.as_str(),
            config.bounds.width(),
            config.bounds.height(),
            config.collision_mode
        );
        Ok(config)
    }

    /// Parse configuration from INI text on top of the defaults.
    pub fn from_ini_str(text: &str) -> Result<Self, SimError> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| SimError::Parse(format!("Failed to parse config: {e}")))?;
        let mut config = Self::new();
        config.apply_ini(&ini)?;
        Ok(config)
    }

    fn apply_ini(&mut self, ini: &Ini) -> Result<(), SimError> {
        // [playfield] section
        if let Some(name) = ini.get("playfield", "boundary") {
            self.boundary_policy = BoundaryPolicy::from_name(&name)
                .ok_or_else(|| SimError::Parse(format!("unknown boundary policy '{name}'")))?;
        }
        if let Some(v) = get_f64(ini, "playfield", "min_x")? {
            self.bounds.min.x = v;
        }
        if let Some(v) = get_f64(ini, "playfield", "min_y")? {
            self.bounds.min.y = v;
        }
        if let Some(v) = get_f64(ini, "playfield", "max_x")? {
            self.bounds.max.x = v;
        }
        if let Some(v) = get_f64(ini, "playfield", "max_y")? {
            self.bounds.max.y = v;
        }
        if let Some(name) = ini.get("playfield", "clamp_velocity") {
            self.clamp_velocity = match name.trim().to_lowercase().as_str() {
                "zero" => ClampVelocity::Zero,
                "keep" => ClampVelocity::Keep,
                _ => return Err(SimError::Parse(format!("unknown clamp_velocity '{name}'"))),
            };
        }
        if let Some(v) = get_u64(ini, "playfield", "max_entities")? {
            self.max_entities = Some(v as usize);
        }

        // [collision] section
        if let Some(name) = ini.get("collision", "mode") {
            self.collision_mode = match name.trim().to_lowercase().as_str() {
                "edge" => CollisionMode::Edge,
                "level" => CollisionMode::Level,
                _ => return Err(SimError::Parse(format!("unknown collision mode '{name}'"))),
            };
        }
        if let Some(name) = ini.get("collision", "broad_phase") {
            self.broad_phase = match name.trim().to_lowercase().as_str() {
                "brute_force" => BroadPhase::BruteForce,
                "grid" => BroadPhase::Grid {
                    cell_size: get_f64(ini, "collision", "cell_size")?.unwrap_or(64.0),
                },
                _ => return Err(SimError::Parse(format!("unknown broad phase '{name}'"))),
            };
        }
        if let Some(name) = ini.get("collision", "response") {
            self.collision_response = match name.trim().to_lowercase().as_str() {
                "none" => CollisionResponse::None,
                "elastic" => CollisionResponse::Elastic,
                _ => return Err(SimError::Parse(format!("unknown collision response '{name}'"))),
            };
        }
        if let Some(v) = get_f64(ini, "collision", "target_speed")? {
            self.target_speed = Some(v);
        }

        // [camera] section
        if let Some(v) = get_f64(ini, "camera", "alpha")? {
            self.camera_alpha = v;
        }
        if let Some(v) = get_f64(ini, "camera", "viewport_width")? {
            self.viewport.x = v;
        }
        if let Some(v) = get_f64(ini, "camera", "viewport_height")? {
            self.viewport.y = v;
        }
        let camera_bounds = (
            get_f64(ini, "camera", "bounds_min_x")?,
            get_f64(ini, "camera", "bounds_min_y")?,
            get_f64(ini, "camera", "bounds_max_x")?,
            get_f64(ini, "camera", "bounds_max_y")?,
        );
        if let (Some(x0), Some(y0), Some(x1), Some(y1)) = camera_bounds {
            self.camera_bounds = Some(Rect::new(x0, y0, x1, y1));
        }

        // [drag] section
        if let Some(enabled) = get_bool(ini, "drag", "return_to_origin")? {
            self.drag_return = enabled.then(DragReturn::default);
        }
        if let Some(ret) = self.drag_return.as_mut() {
            if let Some(v) = get_f64(ini, "drag", "return_duration")? {
                ret.duration = v;
            }
            if let Some(name) = ini.get("drag", "return_easing") {
                ret.easing = Easing::from_name(&name)
                    .ok_or_else(|| SimError::Parse(format!("unknown easing '{name}'")))?;
            }
        }

        // [sim] section
        if let Some(v) = get_u64(ini, "sim", "seed")? {
            self.seed = v;
        }
        if let Some(v) = get_f64(ini, "sim", "time_scale")? {
            self.time_scale = v;
        }
        Ok(())
    }

    /// Save configuration to an INI file, creating it if needed.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let mut ini = Ini::new();
        let mut put = |section: &str, key: &str, value: String| {
            ini.set(section, key, Some(value));
        };

        put("playfield", "boundary", self.boundary_policy.as_str().into());
        put("playfield", "min_x", self.bounds.min.x.to_string());
        put("playfield", "min_y", self.bounds.min.y.to_string());
        put("playfield", "max_x", self.bounds.max.x.to_string());
        put("playfield", "max_y", self.bounds.max.y.to_string());
        put(
            "playfield",
            "clamp_velocity",
            match self.clamp_velocity {
                ClampVelocity::Zero => "zero".into(),
                ClampVelocity::Keep => "keep".into(),
            },
        );
        if let Some(max) = self.max_entities {
            put("playfield", "max_entities", max.to_string());
        }

        put(
            "collision",
            "mode",
            match self.collision_mode {
                CollisionMode::Edge => "edge".into(),
                CollisionMode::Level => "level".into(),
            },
        );
        match self.broad_phase {
            BroadPhase::BruteForce => put("collision", "broad_phase", "brute_force".into()),
            BroadPhase::Grid { cell_size } => {
                put("collision", "broad_phase", "grid".into());
                put("collision", "cell_size", cell_size.to_string());
            }
        }
        put(
            "collision",
            "response",
            match self.collision_response {
                CollisionResponse::None => "none".into(),
                CollisionResponse::Elastic => "elastic".into(),
            },
        );
        if let Some(speed) = self.target_speed {
            put("collision", "target_speed", speed.to_string());
        }

        put("camera", "alpha", self.camera_alpha.to_string());
        put("camera", "viewport_width", self.viewport.x.to_string());
        put("camera", "viewport_height", self.viewport.y.to_string());
        if let Some(b) = self.camera_bounds {
            put("camera", "bounds_min_x", b.min.x.to_string());
            put("camera", "bounds_min_y", b.min.y.to_string());
            put("camera", "bounds_max_x", b.max.x.to_string());
            put("camera", "bounds_max_y", b.max.y.to_string());
        }

        put("drag", "return_to_origin", self.drag_return.is_some().to_string());
        if let Some(ret) = self.drag_return {
            put("drag", "return_duration", ret.duration.to_string());
            put("drag", "return_easing", ret.easing.as_str().into());
        }

        put("sim", "seed", self.seed.to_string());
        put("sim", "time_scale", self.time_scale.to_string());

        ini.write(path.as_ref())?;
        info!("Saved config to {:?}", path.as_ref());
        Ok(())
    }

    /// Half extents of the camera view.
    pub fn half_view(&self) -> DVec2 {
        self.viewport * 0.5
    }
}

fn get_f64(ini: &Ini, section: &str, key: &str) -> Result<Option<f64>, SimError> {
    ini.getfloat(section, key)
        .map_err(|e| SimError::Parse(format!("[{section}] {key}: {e}")))
}

fn get_u64(ini: &Ini, section: &str, key: &str) -> Result<Option<u64>, SimError> {
    ini.getuint(section, key)
        .map_err(|e| SimError::Parse(format!("[{section}] {key}: {e}")))
}

fn get_bool(ini: &Ini, section: &str, key: &str) -> Result<Option<bool>, SimError> {
    ini.getbool(section, key)
        .map_err(|e| SimError::Parse(format!("[{section}] {key}: {e}")))
}
