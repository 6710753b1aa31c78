//! Tests for the logical-qubit embedding.

use num_complex::Complex64;
use photq_sim::SimError;
use photq_sim::embedding::{MeasurementBasis, SubspaceEmbedding};
use photq_sim::hamiltonian::SshHamiltonian;
use photq_sim::operator::{Operator, StateVector, identity, pauli_x, pauli_z};
use photq_sim::spectrum::{DenseEigensolver, ExcitationFilter};

fn edge_embedding() -> SubspaceEmbedding {
    let h = SshHamiltonian::new(4, 0.5, 1.0)
        .with_disorder(0.3)
        .build(42)
        .unwrap();
    let manifold = ExcitationFilter::new(4)
        .unwrap()
        .manifold(h.operator(), &DenseEigensolver::default())
        .unwrap();
    let (a, b) = manifold.edge_pair().unwrap();
    SubspaceEmbedding::new(&a.state, &b.state).unwrap()
}

fn basis_state(index: usize, dim: usize) -> StateVector {
    let mut psi = StateVector::zeros(dim);
    psi[index] = Complex64::new(1.0, 0.0);
    psi
}

fn max_abs_diff(a: &Operator, b: &Operator) -> f64 {
    (a - b).iter().map(|z| z.norm()).fold(0.0, f64::max)
}

/// A fixed non-trivial 2×2 unitary: exp(−iθσx) with a global phase.
fn sample_unitary() -> Operator {
    let theta: f64 = 0.37;
    let c = Complex64::new(theta.cos(), 0.0);
    let s = Complex64::new(0.0, -theta.sin());
    let phase = Complex64::from_polar(1.0, 0.81);
    (identity(2) * c + pauli_x() * s) * phase
}

#[test]
fn edge_columns_are_orthonormal() {
    let emb = edge_embedding();
    assert_eq!(emb.full_dim(), 16);
    assert_eq!(emb.isometry().ncols(), 2);
    assert!(emb.orthonormality_error() < 1e-9);
}

#[test]
fn embedded_unitary_is_identity_on_span() {
    let emb = edge_embedding();
    let u = emb.embed(&sample_unitary()).unwrap();
    let restricted = emb.isometry().adjoint() * u.adjoint() * &u * emb.isometry();
    assert!(max_abs_diff(&restricted, &identity(2)) < 1e-9);
}

#[test]
fn embedding_preserves_products() {
    let emb = edge_embedding();
    let a = sample_unitary();
    let b = pauli_z();
    let lhs = emb.embed(&a).unwrap() * emb.embed(&b).unwrap();
    let rhs = emb.embed(&(&a * &b)).unwrap();
    assert!(max_abs_diff(&lhs, &rhs) < 1e-9);
}

#[test]
fn embedded_identity_is_subspace_projector() {
    let emb = edge_embedding();
    let p = emb.embed(&identity(2)).unwrap();
    assert!(max_abs_diff(&(&p * &p), &p) < 1e-9);
    assert!((p.trace().re - 2.0).abs() < 1e-9);
}

#[test]
fn measurement_projectors_are_complementary() {
    let emb = edge_embedding();
    for basis in [MeasurementBasis::Z, MeasurementBasis::X] {
        let ops = emb.measurement_operators(basis).unwrap();
        let sum = &ops.plus + &ops.minus;
        assert!(max_abs_diff(&sum, &emb.embed(&identity(2)).unwrap()) < 1e-9);
        assert!(max_abs_diff(&(&ops.plus * &ops.minus), &Operator::zeros(16, 16)) < 1e-9);
    }
}

#[test]
fn project_recovers_logical_amplitudes() {
    let emb = edge_embedding();
    let logical = emb
        .project(&emb.isometry().column(1).into_owned())
        .unwrap();
    assert!(logical[0].norm() < 1e-9);
    assert!((logical[1].norm() - 1.0).abs() < 1e-9);
}

#[test]
fn mismatched_columns_are_rejected() {
    let err = SubspaceEmbedding::new(&basis_state(0, 4), &basis_state(0, 8)).unwrap_err();
    assert!(matches!(err, SimError::DimensionMismatch { expected: 4, got: 8 }));
}

#[test]
fn non_orthonormal_columns_are_kept() {
    let a = basis_state(1, 4);
    let emb = SubspaceEmbedding::new(&a, &a).unwrap();
    assert!(emb.orthonormality_error() > 0.5);
}

#[test]
fn non_logical_operator_is_rejected() {
    let emb = edge_embedding();
    assert!(emb.embed(&identity(3)).is_err());
}

#[test]
fn basis_names_round_trip() {
    for basis in [MeasurementBasis::Z, MeasurementBasis::X] {
        assert_eq!(basis.to_string().parse::<MeasurementBasis>().unwrap(), basis);
    }
    assert!(matches!(
        "hadamard".parse::<MeasurementBasis>(),
        Err(SimError::UnsupportedBasis(_))
    ));
}
