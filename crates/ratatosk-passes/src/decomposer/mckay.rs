//! McKay decomposition of single-qubit rotations.

use std::f64::consts::PI;

use ratatosk_core::{
    library, normalize_angle, Axis, CompileResult, Decomposer, Gate, ATOL,
};

use super::aba::AbaDecomposer;

/// Decomposes any single-qubit rotation into
/// `Rz(φ)·X90·Rz(θ)·X90·Rz(λ)` via the identity
/// `Rx(θ) = Rz(-π/2)·X90·Rz(π-θ)·X90·Rz(-π/2)`.
///
/// `Rz` gates whose angle canonicalizes to zero are omitted, and
/// rotations that are already `Rz` or `X90` are left alone. The output
/// matches the input up to a global phase.
///
/// Relevant literature: <https://arxiv.org/abs/1612.00858>.
#[derive(Debug, Clone, Copy, Default)]
pub struct McKayDecomposer;

impl Decomposer for McKayDecomposer {
    fn name(&self) -> &str {
        "mckay_decomposer"
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        let Some(rotation) = gate.as_rotation() else {
            return Ok(vec![gate.clone()]);
        };
        let x90_reference = library::x90(rotation.qubit);
        if Some(rotation) == x90_reference.as_rotation() {
            return Ok(vec![gate.clone()]);
        }

        if rotation.angle.abs() < ATOL {
            return Ok(vec![library::i(rotation.qubit)]);
        }

        let [nx, ny, nz] = rotation.axis.components();
        if nx.abs() < ATOL && ny.abs() < ATOL {
            // Already a Z rotation (up to axis sign).
            return Ok(vec![library::rz(rotation.qubit, rotation.angle * nz)]);
        }

        // Fast path: a Z-X-Z decomposition whose middle angle is
        // exactly +π/2 only needs the X90 spelled out.
        let zxz = AbaDecomposer::zxz().decompose(gate)?;
        let x_axis = Axis::x();
        let middle_angle = zxz
            .iter()
            .filter_map(Gate::as_rotation)
            .find(|r| r.axis == x_axis)
            .map_or(0.0, |r| r.angle);
        if (middle_angle - PI / 2.0).abs() < ATOL {
            return Ok(zxz
                .into_iter()
                .map(|g| {
                    if g.as_rotation().is_some_and(|r| r.axis == x_axis) {
                        library::x90(rotation.qubit)
                    } else {
                        g
                    }
                })
                .collect());
        }

        let half = rotation.angle / 2.0;
        let za_mod = (half.cos().powi(2) + (nz * half.sin()).powi(2)).sqrt();
        let zb_mod = half.sin().abs() * (nx * nx + ny * ny).sqrt();

        let theta = normalize_angle(PI - 2.0 * zb_mod.atan2(za_mod));
        let alpha = (-half.sin() * nz).atan2(half.cos());
        let beta = (-half.sin() * nx).atan2(-half.sin() * ny);
        let lambda = normalize_angle(beta - alpha);
        let phi = normalize_angle(-beta - alpha - PI);

        if theta.abs() < ATOL && (lambda - phi).abs() < ATOL {
            return Ok(vec![
                library::x90(rotation.qubit),
                library::x90(rotation.qubit),
            ]);
        }

        let mut out = Vec::with_capacity(5);
        if lambda.abs() > ATOL {
            out.push(library::rz(rotation.qubit, lambda));
        }
        out.push(library::x90(rotation.qubit));
        if theta.abs() > ATOL {
            out.push(library::rz(rotation.qubit, theta));
        }
        out.push(library::x90(rotation.qubit));
        if phi.abs() > ATOL {
            out.push(library::rz(rotation.qubit, phi));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatosk_core::expander::reindexed_circuit_matrix;
    use ratatosk_core::QubitId;

    fn assert_mckay_form(gate: &Gate) {
        let replacement = McKayDecomposer.decompose(gate).unwrap();
        for g in &replacement {
            assert!(
                matches!(g.name(), Some("Rz") | Some("X90") | Some("I")),
                "unexpected gate {:?} in McKay output",
                g.name(),
            );
        }
        let operands = gate.qubit_operands();
        let original = reindexed_circuit_matrix(std::slice::from_ref(gate), &operands).unwrap();
        let recomposed = reindexed_circuit_matrix(&replacement, &operands).unwrap();
        assert!(
            original.equal_up_to_global_phase(&recomposed, 1e-6),
            "McKay output of {:?} does not recompose",
            gate.name(),
        );
    }

    #[test]
    fn test_catalog_gates() {
        for gate in [
            library::h(QubitId(0)),
            library::x(QubitId(0)),
            library::y(QubitId(0)),
            library::y90(QubitId(0)),
            library::my90(QubitId(0)),
            library::s(QubitId(0)),
            library::rx(QubitId(0), 1.2),
            library::ry(QubitId(0), -0.4),
        ] {
            assert_mckay_form(&gate);
        }
    }

    #[test]
    fn test_rz_left_alone() {
        let rz = library::rz(QubitId(0), 0.7);
        let replacement = McKayDecomposer.decompose(&rz).unwrap();
        assert_eq!(replacement.len(), 1);
        assert_eq!(replacement[0].name(), Some("Rz"));
    }

    #[test]
    fn test_x90_left_alone() {
        let x90 = library::x90(QubitId(1));
        let replacement = McKayDecomposer.decompose(&x90).unwrap();
        assert_eq!(replacement, vec![library::x90(QubitId(1))]);
    }

    #[test]
    fn test_z_becomes_single_rz() {
        let replacement = McKayDecomposer.decompose(&library::z(QubitId(0))).unwrap();
        assert_eq!(replacement.len(), 1);
        assert_eq!(replacement[0].name(), Some("Rz"));
        assert!((replacement[0].as_rotation().unwrap().angle - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_identity_angle() {
        let replacement = McKayDecomposer.decompose(&library::i(QubitId(0))).unwrap();
        assert_eq!(replacement.len(), 1);
        assert_eq!(replacement[0].name(), Some("I"));
    }

    #[test]
    fn test_controlled_gate_passes_through() {
        let cz = library::cz(QubitId(0), QubitId(1));
        assert_eq!(McKayDecomposer.decompose(&cz).unwrap(), vec![cz]);
    }
}
