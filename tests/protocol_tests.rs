// tests/protocol_tests.rs

use num_complex::Complex;
use qbattleships::core::basis;
use qbattleships::protocol::{apply_bombs, build_scenario, entangle_chsh, measure_in_rotated_basis};
use qbattleships::simulation::CircuitEngine;
use qbattleships::{
    BombSelection, CircuitBuilder, Gate, MeasurementMode, Operation, QbsError, Ship, ShipPosition, REGISTER_SIZE,
};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

const TEST_TOLERANCE: f64 = 1e-9;

#[test]
fn test_entangled_pair_amplitudes() -> Result<(), QbsError> {
    let (builder, bobs) = entangle_chsh(CircuitBuilder::new(REGISTER_SIZE), Ship::A.position());
    assert_eq!(bobs.bob_qubits(), vec![0]);

    let mut engine = CircuitEngine::init(REGISTER_SIZE, MeasurementMode::Analytic)?;
    for op in builder.build().operations() {
        engine.apply_operation(op)?;
    }

    // (|01000> + e^{iπ/4}|10000>) / √2
    let low = basis::index_from_bits(&[0, 1, 0, 0, 0]);
    let high = basis::index_from_bits(&[1, 0, 0, 0, 0]);
    let amplitudes = engine.state().amplitudes();
    let expected_high = Complex::from_polar(FRAC_1_SQRT_2, FRAC_PI_4);
    assert!((amplitudes[low] - Complex::new(FRAC_1_SQRT_2, 0.0)).norm() < TEST_TOLERANCE);
    assert!((amplitudes[high] - expected_high).norm() < TEST_TOLERANCE);
    for (k, amp) in amplitudes.iter().enumerate() {
        if k != low && k != high {
            assert!(amp.norm() < TEST_TOLERANCE, "unexpected amplitude at {}", basis::ket_label(k, REGISTER_SIZE));
        }
    }
    Ok(())
}

#[test]
fn test_bombs_pick_setting_by_role() -> Result<(), QbsError> {
    let ship = Ship::D.position();
    let (builder, bobs) = entangle_chsh(CircuitBuilder::new(REGISTER_SIZE), ship);
    let circuit = apply_bombs(builder, &BombSelection::new(2, 3)?, &bobs).build();

    let bomb_ops = &circuit.operations()[4..];
    assert_eq!(
        bomb_ops,
        &[
            Operation::Single { target: 2, gate: Gate::SInverse },
            Operation::Single { target: 3, gate: Gate::S },
        ]
    );
    Ok(())
}

#[test]
fn test_rotated_basis_measures_every_qubit() {
    let circuit = measure_in_rotated_basis(CircuitBuilder::new(REGISTER_SIZE)).build();
    assert_eq!(circuit.len(), 2 * REGISTER_SIZE);
    for (qubit, pair) in circuit.operations().chunks(2).enumerate() {
        assert_eq!(pair[0], Operation::Single { target: qubit, gate: Gate::Hadamard });
        assert!(pair[1].is_measurement());
        assert_eq!(pair[1].involved_qubits(), vec![qubit]);
    }
}

#[test]
fn test_scenario_layout_per_ship() -> Result<(), QbsError> {
    let bombs = BombSelection::new(0, 4)?;
    for ship in Ship::ALL {
        let [i, j] = ship.position().qubits();
        let circuit = build_scenario(ship.position(), &bombs);
        let ops = circuit.operations();
        assert_eq!(ops[0], Operation::Single { target: i, gate: Gate::Hadamard });
        assert_eq!(ops[1], Operation::cnot(i, j));
        assert_eq!(ops[2], Operation::Single { target: i, gate: Gate::PauliX });
        assert_eq!(ops[3], Operation::Single { target: i, gate: Gate::T });
        let expected_bomb_on_zero = if i == 0 { Gate::SInverse } else { Gate::S };
        assert_eq!(ops[4], Operation::Single { target: 0, gate: expected_bomb_on_zero });
        assert_eq!(ops[5], Operation::Single { target: 4, gate: Gate::S });
    }
    Ok(())
}

#[test]
fn test_scenario_diagram_mentions_every_qubit() -> Result<(), QbsError> {
    let circuit = build_scenario(Ship::F.position(), &BombSelection::new(3, 4)?);
    let diagram = circuit.to_string();
    for qubit in 0..REGISTER_SIZE {
        assert!(diagram.contains(&format!("q{}: ", qubit)), "missing row for q{}\n{}", qubit, diagram);
    }
    Ok(())
}

#[test]
fn test_invalid_positions_rejected() {
    assert_eq!(ShipPosition::new(1, 1), Err(QbsError::DuplicateIndex { index: 1 }));
    assert!(matches!(ShipPosition::new(0, 5), Err(QbsError::InvalidIndex { .. })));
    assert!(matches!(BombSelection::new(7, 0), Err(QbsError::InvalidIndex { .. })));
    assert_eq!(BombSelection::new(3, 3), Err(QbsError::DuplicateIndex { index: 3 }));
}

#[test]
fn test_ship_labels_parse() -> Result<(), QbsError> {
    for ship in Ship::ALL {
        let parsed: Ship = ship.label().parse()?;
        assert_eq!(parsed, ship);
    }
    assert!(matches!("g".parse::<Ship>(), Err(QbsError::UnknownShip { .. })));
    Ok(())
}

#[test]
fn test_all_pairs_are_unique_and_ordered() {
    let pairs = BombSelection::all_pairs();
    assert_eq!(pairs.len(), 10);
    assert!(pairs.iter().all(|p| p.qubits()[0] < p.qubits()[1]));
    assert_eq!(pairs[0].to_string(), "(0, 1)");
    assert_eq!(pairs[9].to_string(), "(3, 4)");
}
