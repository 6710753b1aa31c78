//! Simulation configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with PHOTQ_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! The defaults reproduce the reference demonstration: a 6-site chain with
//! 30% bond disorder, 5% damping and dephasing, an 8-level qudit and a
//! 30×30 Brillouin-zone grid.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::lindblad::linspace;
use crate::noise::NoiseModel;
use crate::operator::MAX_DENSE_SITES;

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Master seed; every stochastic stage derives its own stream from it.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Lattice and eigenspace settings
    #[serde(default)]
    pub lattice: LatticeConfig,

    /// Logical measurement settings
    #[serde(default)]
    pub measurement: MeasurementConfig,

    /// Noise and time-evolution settings
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Holographic qudit settings
    #[serde(default)]
    pub qudit: QuditConfig,

    /// Chern-insulator settings
    #[serde(default)]
    pub topology: TopologyConfig,
}

/// SSH chain parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Number of two-level sites N
    #[serde(default = "default_sites")]
    pub sites: usize,

    /// Intra-cell hopping t1
    #[serde(default = "default_t1")]
    pub t1: f64,

    /// Inter-cell hopping t2
    #[serde(default = "default_t2")]
    pub t2: f64,

    /// Relative bond disorder
    #[serde(default = "default_disorder")]
    pub disorder: f64,

    /// Excitation number of the manifold to keep
    #[serde(default = "default_target_excitation")]
    pub target_excitation: u32,

    /// Tolerance on the excitation-number expectation
    #[serde(default = "default_excitation_tolerance")]
    pub excitation_tolerance: f64,
}

/// Repeated measurement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementConfig {
    /// Shots per basis
    #[serde(default = "default_trials")]
    pub trials: usize,
}

/// Lindblad noise parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Amplitude-damping rate γ_damp
    #[serde(default = "default_rate")]
    pub damping_rate: f64,

    /// Dephasing rate γ_dephase
    #[serde(default = "default_rate")]
    pub dephasing_rate: f64,

    /// End of the time grid
    #[serde(default = "default_t_final")]
    pub t_final: f64,

    /// Number of time points in [0, t_final]
    #[serde(default = "default_time_points")]
    pub time_points: usize,

    /// Largest integrator step
    #[serde(default = "default_max_step")]
    pub max_step: f64,
}

/// Holographic qudit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuditConfig {
    /// Qudit dimension d
    #[serde(default = "default_qudit_dim")]
    pub dim: usize,

    /// Kerr-like nonlinearity χ
    #[serde(default = "default_chi")]
    pub chi: f64,
}

/// Chern-insulator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Points per Brillouin-zone axis
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,

    /// Mass for the single curvature map
    #[serde(default = "default_example_mass")]
    pub example_mass: f64,

    /// First mass of the sweep
    #[serde(default = "default_sweep_start")]
    pub sweep_start: f64,

    /// Last mass of the sweep
    #[serde(default = "default_sweep_stop")]
    pub sweep_stop: f64,

    /// Number of sweep points
    #[serde(default = "default_sweep_points")]
    pub sweep_points: usize,
}

/// Independent random streams drawn from the master seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedStream {
    /// Bond disorder realization.
    Disorder,
    /// Measurement sampling.
    Measurement,
    /// Random qudit input state.
    QuditState,
}

impl SeedStream {
    fn salt(self) -> u64 {
        match self {
            SeedStream::Disorder => 0,
            SeedStream::Measurement => 0x9E37_79B9_7F4A_7C15,
            SeedStream::QuditState => 0xD1B5_4A32_D192_ED03,
        }
    }
}

// Default value functions
fn default_seed() -> u64 {
    42
}

fn default_sites() -> usize {
    6
}

fn default_t1() -> f64 {
    0.5
}

fn default_t2() -> f64 {
    1.0
}

fn default_disorder() -> f64 {
    0.3
}

fn default_target_excitation() -> u32 {
    1
}

fn default_excitation_tolerance() -> f64 {
    1e-5
}

fn default_trials() -> usize {
    1000
}

fn default_rate() -> f64 {
    0.05
}

fn default_t_final() -> f64 {
    10.0
}

fn default_time_points() -> usize {
    100
}

fn default_max_step() -> f64 {
    0.01
}

fn default_qudit_dim() -> usize {
    8
}

fn default_chi() -> f64 {
    0.1
}

fn default_grid_size() -> usize {
    30
}

fn default_example_mass() -> f64 {
    -1.0
}

fn default_sweep_start() -> f64 {
    -2.5
}

fn default_sweep_stop() -> f64 {
    0.5
}

fn default_sweep_points() -> usize {
    15
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            lattice: LatticeConfig::default(),
            measurement: MeasurementConfig::default(),
            noise: NoiseConfig::default(),
            qudit: QuditConfig::default(),
            topology: TopologyConfig::default(),
        }
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            sites: default_sites(),
            t1: default_t1(),
            t2: default_t2(),
            disorder: default_disorder(),
            target_excitation: default_target_excitation(),
            excitation_tolerance: default_excitation_tolerance(),
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            damping_rate: default_rate(),
            dephasing_rate: default_rate(),
            t_final: default_t_final(),
            time_points: default_time_points(),
            max_step: default_max_step(),
        }
    }
}

impl Default for QuditConfig {
    fn default() -> Self {
        Self {
            dim: default_qudit_dim(),
            chi: default_chi(),
        }
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            example_mass: default_example_mass(),
            sweep_start: default_sweep_start(),
            sweep_stop: default_sweep_stop(),
            sweep_points: default_sweep_points(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            SimulationConfig::default()
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge `PHOTQ_*` environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary key lookup.
    ///
    /// Only keys that are present and parse override the current values.
    pub fn merge_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn set<T: std::str::FromStr>(slot: &mut T, value: Option<String>) {
            if let Some(v) = value.and_then(|v| v.parse().ok()) {
                *slot = v;
            }
        }

        set(&mut self.seed, lookup("PHOTQ_SEED"));

        // Lattice
        set(&mut self.lattice.sites, lookup("PHOTQ_SITES"));
        set(&mut self.lattice.t1, lookup("PHOTQ_T1"));
        set(&mut self.lattice.t2, lookup("PHOTQ_T2"));
        set(&mut self.lattice.disorder, lookup("PHOTQ_DISORDER"));

        // Measurement
        set(&mut self.measurement.trials, lookup("PHOTQ_TRIALS"));

        // Noise
        set(&mut self.noise.damping_rate, lookup("PHOTQ_GAMMA_DAMP"));
        set(&mut self.noise.dephasing_rate, lookup("PHOTQ_GAMMA_DEPHASE"));
        set(&mut self.noise.t_final, lookup("PHOTQ_T_FINAL"));

        // Qudit
        set(&mut self.qudit.dim, lookup("PHOTQ_QUDIT_DIM"));
        set(&mut self.qudit.chi, lookup("PHOTQ_CHI"));

        // Topology
        set(&mut self.topology.grid_size, lookup("PHOTQ_GRID_SIZE"));

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.lattice;
        if l.sites == 0 || l.sites > MAX_DENSE_SITES {
            return Err(ConfigError::ValidationError(format!(
                "lattice.sites must be in 1..={MAX_DENSE_SITES}, got {}",
                l.sites
            )));
        }
        check_finite("lattice.t1", l.t1)?;
        check_finite("lattice.t2", l.t2)?;
        check_non_negative("lattice.disorder", l.disorder)?;
        check_positive("lattice.excitation_tolerance", l.excitation_tolerance)?;

        if self.measurement.trials == 0 {
            return Err(ConfigError::ValidationError(
                "measurement.trials must be at least 1".into(),
            ));
        }

        let n = &self.noise;
        check_non_negative("noise.damping_rate", n.damping_rate)?;
        check_non_negative("noise.dephasing_rate", n.dephasing_rate)?;
        check_positive("noise.t_final", n.t_final)?;
        check_positive("noise.max_step", n.max_step)?;
        if n.time_points < 2 {
            return Err(ConfigError::ValidationError(
                "noise.time_points must be at least 2".into(),
            ));
        }

        if self.qudit.dim == 0 {
            return Err(ConfigError::ValidationError(
                "qudit.dim must be at least 1".into(),
            ));
        }
        check_finite("qudit.chi", self.qudit.chi)?;

        let t = &self.topology;
        if t.grid_size < 2 {
            return Err(ConfigError::ValidationError(
                "topology.grid_size must be at least 2".into(),
            ));
        }
        check_finite("topology.example_mass", t.example_mass)?;
        check_finite("topology.sweep_start", t.sweep_start)?;
        check_finite("topology.sweep_stop", t.sweep_stop)?;
        if t.sweep_points == 0 {
            return Err(ConfigError::ValidationError(
                "topology.sweep_points must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generator for one stochastic stage.
    pub fn rng(&self, stream: SeedStream) -> StdRng {
        StdRng::seed_from_u64(self.substream_seed(stream))
    }

    /// Seed of one stochastic stage; the disorder stream uses the master seed.
    pub fn substream_seed(&self, stream: SeedStream) -> u64 {
        self.seed ^ stream.salt()
    }

    /// Noise model from the configured rates.
    pub fn noise_model(&self) -> NoiseModel {
        NoiseModel::new(self.noise.damping_rate, self.noise.dephasing_rate)
    }

    /// Evenly spaced time grid on `[0, t_final]`.
    pub fn time_grid(&self) -> Vec<f64> {
        linspace(0.0, self.noise.t_final, self.noise.time_points)
    }

    /// Masses of the Chern sweep.
    pub fn sweep_masses(&self) -> Vec<f64> {
        let t = &self.topology;
        linspace(t.sweep_start, t.sweep_stop, t.sweep_points)
    }
}

fn check_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
