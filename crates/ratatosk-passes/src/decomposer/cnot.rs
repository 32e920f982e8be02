//! ABC decompositions of controlled rotations into CNOT or CZ
//! entanglers plus single-qubit rotations.
//!
//! Source of the math: <https://threeplusone.com/pubs/on_gates.pdf>,
//! chapter 7.5 "ABC decomposition"; the single-entangler shortcut is
//! lemma 5.5 of <https://arxiv.org/pdf/quant-ph/9503016.pdf>.

use std::f64::consts::PI;

use ratatosk_core::{library, Axis, BlochSphereRotation, CompileResult, Decomposer, Gate, ATOL};

use super::aba::AbaDecomposer;
use super::filter_out_identities;

/// Decomposes controlled single-qubit rotations to CNOT + Rz/Ry.
/// Running single-qubit fusion afterwards is usually worthwhile.
#[derive(Debug, Clone, Copy, Default)]
pub struct CnotDecomposer;

impl Decomposer for CnotDecomposer {
    fn name(&self) -> &str {
        "cnot_decomposer"
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        let Some(controlled) = gate.as_controlled() else {
            return Ok(vec![gate.clone()]);
        };
        let Some(target) = controlled.target.as_rotation() else {
            return Ok(vec![gate.clone()]);
        };
        let control = controlled.control;
        let target_qubit = target.qubit;
        let zyz = AbaDecomposer::zyz();

        // Lemma 5.5: when U·X decomposes with θ₀ = θ₂, one CNOT is
        // enough.
        let x_semantics = BlochSphereRotation::new(target_qubit, Axis::x(), PI, PI / 2.0);
        let target_times_x = BlochSphereRotation::compose(&x_semantics, target);
        let (theta_0x, theta_1x, theta_2x) =
            zyz.decomposition_angles(&target_times_x.axis, target_times_x.angle)?;
        if (theta_0x - theta_2x).rem_euclid(2.0 * PI).abs() < ATOL {
            let a = [
                library::ry(target_qubit, -theta_1x / 2.0),
                library::rz(target_qubit, -theta_2x),
            ];
            let b = [
                library::rz(target_qubit, theta_2x),
                library::ry(target_qubit, theta_1x / 2.0),
            ];
            let mut out = Vec::with_capacity(6);
            out.extend(b);
            out.push(library::cnot(control, target_qubit));
            out.extend(a);
            out.push(library::rz(control, target.phase - PI / 2.0));
            return Ok(filter_out_identities(out));
        }

        let (theta_0, theta_1, theta_2) =
            zyz.decomposition_angles(&target.axis, target.angle)?;
        let a = [
            library::ry(target_qubit, theta_1 / 2.0),
            library::rz(target_qubit, theta_2),
        ];
        let b = [
            library::rz(target_qubit, -(theta_0 + theta_2) / 2.0),
            library::ry(target_qubit, -theta_1 / 2.0),
        ];
        let c = [library::rz(target_qubit, (theta_0 - theta_2) / 2.0)];

        let mut out = Vec::with_capacity(8);
        out.extend(c);
        out.push(library::cnot(control, target_qubit));
        out.extend(b);
        out.push(library::cnot(control, target_qubit));
        out.extend(a);
        out.push(library::rz(control, target.phase));
        Ok(filter_out_identities(out))
    }
}

/// Decomposes controlled single-qubit rotations to CZ + Rx/Ry, using
/// the X-Y-X flavor of the ABC construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct CzDecomposer;

impl Decomposer for CzDecomposer {
    fn name(&self) -> &str {
        "cz_decomposer"
    }

    fn decompose(&self, gate: &Gate) -> CompileResult<Vec<Gate>> {
        let Some(controlled) = gate.as_controlled() else {
            return Ok(vec![gate.clone()]);
        };
        let Some(target) = controlled.target.as_rotation() else {
            return Ok(vec![gate.clone()]);
        };
        let control = controlled.control;
        let target_qubit = target.qubit;
        let xyx = AbaDecomposer::xyx();

        // Lemma 5.5 with V = U·Z: one CZ is enough when θ₀ = θ₂.
        let z_semantics = BlochSphereRotation::new(target_qubit, Axis::z(), PI, PI / 2.0);
        let target_times_z = BlochSphereRotation::compose(&z_semantics, target);
        let (theta_0z, theta_1z, theta_2z) =
            xyx.decomposition_angles(&target_times_z.axis, target_times_z.angle)?;
        if (theta_0z - theta_2z).rem_euclid(2.0 * PI).abs() < ATOL {
            let a = [
                library::ry(target_qubit, theta_1z / 2.0),
                library::rx(target_qubit, theta_2z),
            ];
            let b = [
                library::rx(target_qubit, -theta_2z),
                library::ry(target_qubit, -theta_1z / 2.0),
            ];
            let mut out = Vec::with_capacity(6);
            out.extend(b);
            out.push(library::cz(control, target_qubit));
            out.extend(a);
            out.push(library::rz(control, target.phase - PI / 2.0));
            return Ok(filter_out_identities(out));
        }

        let (theta_0, theta_1, theta_2) =
            xyx.decomposition_angles(&target.axis, target.angle)?;
        let a = [
            library::ry(target_qubit, theta_1 / 2.0),
            library::rx(target_qubit, theta_2),
        ];
        let b = [
            library::rx(target_qubit, -(theta_0 + theta_2) / 2.0),
            library::ry(target_qubit, -theta_1 / 2.0),
        ];
        let c = [library::rx(target_qubit, (theta_0 - theta_2) / 2.0)];

        let mut out = Vec::with_capacity(8);
        out.extend(c);
        out.push(library::cz(control, target_qubit));
        out.extend(b);
        out.push(library::cz(control, target_qubit));
        out.extend(a);
        out.push(library::rz(control, target.phase));
        Ok(filter_out_identities(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatosk_core::expander::reindexed_circuit_matrix;
    use ratatosk_core::QubitId;

    fn assert_equivalent(decomposer: &impl Decomposer, gate: &Gate) -> Vec<Gate> {
        let replacement = decomposer.decompose(gate).unwrap();
        let operands = gate.qubit_operands();
        let original = reindexed_circuit_matrix(std::slice::from_ref(gate), &operands).unwrap();
        let recomposed = reindexed_circuit_matrix(&replacement, &operands).unwrap();
        assert!(
            original.equal_up_to_global_phase(&recomposed, 1e-6),
            "{} does not recompose {:?}",
            decomposer.name(),
            gate.name(),
        );
        replacement
    }

    #[test]
    fn test_cnot_decomposes_to_itself() {
        let cnot = library::cnot(QubitId(0), QubitId(1));
        let replacement = assert_equivalent(&CnotDecomposer, &cnot);
        // The lemma collapses controlled-X to a bare CNOT.
        assert_eq!(replacement, vec![library::cnot(QubitId(0), QubitId(1))]);
    }

    #[test]
    fn test_cr_uses_two_cnots() {
        let cr = library::cr(QubitId(0), QubitId(1), 1.1);
        let replacement = assert_equivalent(&CnotDecomposer, &cr);
        let cnots = replacement
            .iter()
            .filter(|g| g.name() == Some("CNOT"))
            .count();
        assert_eq!(cnots, 2);
        for g in &replacement {
            assert!(matches!(g.name(), Some("CNOT") | Some("Rz") | Some("Ry")));
        }
    }

    #[test]
    fn test_crk_decomposition() {
        let crk = library::crk(QubitId(1), QubitId(0), 3);
        assert_equivalent(&CnotDecomposer, &crk);
    }

    #[test]
    fn test_cz_decomposer_on_cz() {
        let cz = library::cz(QubitId(0), QubitId(1));
        let replacement = assert_equivalent(&CzDecomposer, &cz);
        assert_eq!(
            replacement
                .iter()
                .filter(|g| g.name() == Some("CZ"))
                .count(),
            1,
            "controlled-Z should hit the single-entangler shortcut: {replacement:?}",
        );
    }

    #[test]
    fn test_cz_decomposer_on_cnot() {
        let cnot = library::cnot(QubitId(0), QubitId(1));
        let replacement = assert_equivalent(&CzDecomposer, &cnot);
        for g in &replacement {
            assert!(matches!(
                g.name(),
                Some("CZ") | Some("Rx") | Some("Ry") | Some("Rz")
            ));
        }
    }

    #[test]
    fn test_cz_decomposer_on_cr() {
        let cr = library::cr(QubitId(0), QubitId(1), -0.8);
        let replacement = assert_equivalent(&CzDecomposer, &cr);
        assert!(replacement.iter().any(|g| g.name() == Some("CZ")));
    }

    #[test]
    fn test_single_qubit_gates_pass_through() {
        let h = library::h(QubitId(0));
        assert_eq!(CnotDecomposer.decompose(&h).unwrap(), vec![h]);
        let swap = library::swap(QubitId(0), QubitId(1));
        assert_eq!(CnotDecomposer.decompose(&swap).unwrap(), vec![swap]);
    }
}
