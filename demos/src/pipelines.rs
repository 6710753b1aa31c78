//! End-to-end pipelines driven by a [`SimulationConfig`].
//!
//! Each runner returns plain numeric reports; rendering is left to the
//! binaries.  Stochastic stages draw from their own seed stream so that
//! skipping one stage never changes another stage's output.

use photq_sim::embedding::{MeasurementBasis, SubspaceEmbedding};
use photq_sim::hamiltonian::{LatticeHamiltonian, SshHamiltonian};
use photq_sim::lindblad::{MasterEquationSolver, expectation_series};
use photq_sim::measurement::{TrialCounts, repeated_trials};
use photq_sim::operator::{OperatorFactory, pauli_x};
use photq_sim::qudit::{
    DistributionStats, apply, combined_transform, dft, probabilities, random_state,
};
use photq_sim::spectrum::{
    ExcitationFilter, ExcitationManifold, HermitianEigensolver, site_occupations,
};
use photq_sim::state::DensityMatrix;
use photq_sim::topology::{BerryCurvature, BrillouinZoneGrid, ChernPoint, berry_curvature, sweep};
use photq_sim::{SeedStream, SimResult, SimulationConfig};
use tracing::info;

/// Disordered chain, its single-excitation manifold and the edge-pair qubit.
#[derive(Debug, Clone)]
pub struct LatticeReport {
    /// The sampled Hamiltonian.
    pub hamiltonian: LatticeHamiltonian,
    /// Filtered manifold, ascending by energy.
    pub manifold: ExcitationManifold,
    /// IPR per manifold state.
    pub ipr: Vec<f64>,
    /// Energies of the edge pair.
    pub edge_energies: [f64; 2],
    /// Per-site occupation of each edge state.
    pub edge_occupations: [Vec<f64>; 2],
    /// Logical qubit spanned by the edge pair.
    pub embedding: SubspaceEmbedding,
}

/// Build the chain, filter the manifold and embed the edge pair.
pub fn run_lattice(
    config: &SimulationConfig,
    solver: &dyn HermitianEigensolver,
) -> SimResult<LatticeReport> {
    let l = &config.lattice;
    let hamiltonian = SshHamiltonian::new(l.sites, l.t1, l.t2)
        .with_disorder(l.disorder)
        .build(config.substream_seed(SeedStream::Disorder))?;

    let manifold = ExcitationFilter::new(l.sites)?
        .with_target(l.target_excitation)
        .with_tolerance(l.excitation_tolerance)
        .manifold(hamiltonian.operator(), solver)?;
    let ipr = manifold.ipr_values()?;

    let (first, second) = manifold.edge_pair()?;
    let edge_energies = [first.energy, second.energy];
    let edge_occupations = [
        site_occupations(&first.state, l.sites)?,
        site_occupations(&second.state, l.sites)?,
    ];
    let embedding = SubspaceEmbedding::new(&first.state, &second.state)?;

    info!(
        sites = l.sites,
        manifold = manifold.len(),
        edge_energy = edge_energies[0],
        "lattice pipeline complete"
    );

    Ok(LatticeReport {
        hamiltonian,
        manifold,
        ipr,
        edge_energies,
        edge_occupations,
        embedding,
    })
}

/// Repeated logical measurements of the prepared qubit.
#[derive(Debug, Clone)]
pub struct MeasurementReport {
    /// Edge state 1 after a logical X gate.
    pub prepared: DensityMatrix,
    /// Z-basis tally.
    pub z: TrialCounts,
    /// X-basis tally.
    pub x: TrialCounts,
}

/// Prepare `X|e₁⟩` and measure it in the Z and X bases.
pub fn run_measurement(
    config: &SimulationConfig,
    lattice: &LatticeReport,
) -> SimResult<MeasurementReport> {
    let edge = lattice.embedding.isometry().column(0).into_owned();
    let mut prepared = DensityMatrix::from_pure(&edge);
    prepared.apply_unitary(&lattice.embedding.embed(&pauli_x())?)?;

    let mut rng = config.rng(SeedStream::Measurement);
    let trials = config.measurement.trials;
    let z_ops = lattice.embedding.measurement_operators(MeasurementBasis::Z)?;
    let x_ops = lattice.embedding.measurement_operators(MeasurementBasis::X)?;
    let z = repeated_trials(&prepared, &z_ops, trials, &mut rng)?;
    let x = repeated_trials(&prepared, &x_ops, trials, &mut rng)?;

    Ok(MeasurementReport { prepared, z, x })
}

/// Mode distributions of a random qudit before and after encoding.
#[derive(Debug, Clone)]
pub struct QuditReport {
    /// Input distribution.
    pub original: Vec<f64>,
    /// After the DFT.
    pub dft: Vec<f64>,
    /// After the combined nonlinear transform.
    pub nonlinear: Vec<f64>,
}

impl QuditReport {
    /// Statistics of (original, dft, nonlinear).
    pub fn stats(&self) -> [DistributionStats; 3] {
        [
            DistributionStats::from_probabilities(&self.original),
            DistributionStats::from_probabilities(&self.dft),
            DistributionStats::from_probabilities(&self.nonlinear),
        ]
    }
}

/// Encode a random qudit with the DFT and with the nonlinear transform.
pub fn run_qudit(config: &SimulationConfig) -> SimResult<QuditReport> {
    let q = &config.qudit;
    let psi = random_state(q.dim, &mut config.rng(SeedStream::QuditState))?;
    let encoded = apply(&dft(q.dim)?, &psi)?;
    let reshaped = apply(&combined_transform(q.dim, q.chi)?, &psi)?;

    Ok(QuditReport {
        original: probabilities(&psi),
        dft: probabilities(&encoded),
        nonlinear: probabilities(&reshaped),
    })
}

/// Observables along a noisy trajectory.
#[derive(Debug, Clone)]
pub struct NoiseReport {
    /// Time grid.
    pub times: Vec<f64>,
    /// ⟨X_logical⟩(t).
    pub logical_x: Vec<f64>,
    /// ⟨N̂⟩(t).
    pub excitation: Vec<f64>,
    /// Tr ρ(t)².
    pub purity: Vec<f64>,
}

/// Evolve the prepared state under damping and dephasing.
pub fn run_noise(
    config: &SimulationConfig,
    lattice: &LatticeReport,
    prepared: &DensityMatrix,
    integrator: &dyn MasterEquationSolver,
) -> SimResult<NoiseReport> {
    let n_sites = config.lattice.sites;
    let collapse = config.noise_model().collapse_operators(n_sites)?;
    let times = config.time_grid();

    let states = integrator.evolve(lattice.hamiltonian.operator(), prepared, &collapse, &times)?;

    let x_logical = lattice.embedding.embed(&pauli_x())?;
    let n_total = OperatorFactory::new(n_sites)?.total_number();

    Ok(NoiseReport {
        logical_x: expectation_series(&states, &x_logical),
        excitation: expectation_series(&states, &n_total),
        purity: states.iter().map(DensityMatrix::purity).collect(),
        times,
    })
}

/// Curvature map at the example mass and the Chern sweep.
#[derive(Debug, Clone)]
pub struct TopologyReport {
    /// Flux map at the example mass.
    pub curvature: BerryCurvature,
    /// Chern number per swept mass.
    pub sweep: Vec<ChernPoint>,
}

/// Compute the curvature map and the mass sweep.
pub fn run_topology(
    config: &SimulationConfig,
    solver: &dyn HermitianEigensolver,
) -> SimResult<TopologyReport> {
    let t = &config.topology;
    let grid = BrillouinZoneGrid::uniform(t.grid_size)?;
    let curvature = berry_curvature(&grid, t.example_mass, solver)?;
    let points = sweep(&config.sweep_masses(), t.grid_size, solver)?;

    info!(
        grid = t.grid_size,
        chern = curvature.chern,
        points = points.len(),
        "topology pipeline complete"
    );
    Ok(TopologyReport {
        curvature,
        sweep: points,
    })
}
