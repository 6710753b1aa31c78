//! `photq-sim`: dense simulation of topologically protected photonic qubits.
//!
//! A qubit is stored in the two zero-energy edge modes of a disordered
//! Su–Schrieffer–Heeger chain of two-level photonic sites.  The crate covers
//! the whole pipeline:
//!
//! - **Operators** on the `2^N` Fock space ([`operator`])
//! - **SSH Hamiltonian** with seeded bond disorder ([`hamiltonian`])
//! - **Eigenspace filtering** by excitation number, IPR and edge-pair
//!   selection ([`spectrum`])
//! - **Subspace embedding** of logical operators and measurements
//!   ([`embedding`], [`measurement`])
//! - **Lindblad noise** with damping and dephasing ([`noise`], [`lindblad`])
//! - **Holographic OAM qudit** transforms ([`qudit`])
//! - **Chern numbers** of a two-band Chern insulator ([`topology`])
//!
//! # Quick start
//!
//! ```rust
//! use photq_sim::hamiltonian::SshHamiltonian;
//! use photq_sim::spectrum::{DenseEigensolver, ExcitationFilter};
//!
//! let h = SshHamiltonian::new(4, 0.5, 1.0).with_disorder(0.3).build(42).unwrap();
//! let solver = DenseEigensolver::default();
//!
//! let manifold = ExcitationFilter::new(4).unwrap().manifold(h.operator(), &solver).unwrap();
//! assert_eq!(manifold.len(), 4);
//!
//! let (left, right) = manifold.edge_pair().unwrap();
//! assert!(left.energy.abs() <= right.energy.abs());
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod hamiltonian;
pub mod lindblad;
pub mod measurement;
pub mod noise;
pub mod operator;
pub mod qudit;
pub mod spectrum;
pub mod state;
pub mod topology;

pub use config::{ConfigError, SeedStream, SimulationConfig};
pub use embedding::{MeasurementBasis, MeasurementOperators, SubspaceEmbedding};
pub use error::{SimError, SimResult};
pub use hamiltonian::{LatticeHamiltonian, SshHamiltonian};
pub use lindblad::{MasterEquationSolver, Rk4Integrator};
pub use measurement::{Outcome, TrialCounts};
pub use noise::{Channel, CollapseOperator, NoiseModel};
pub use operator::{Operator, OperatorFactory, StateVector};
pub use spectrum::{
    DenseEigensolver, EigenPair, ExcitationFilter, ExcitationManifold, HermitianEigensolver,
    Spectrum,
};
pub use state::DensityMatrix;
pub use topology::{BerryCurvature, BrillouinZoneGrid, ChernPoint, QwzModel};
