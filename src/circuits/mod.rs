// src/circuits/mod.rs

//! Ordered gate sequences over a fixed-size register.
//!
//! A [`Circuit`] records operations in the exact order they must be applied;
//! each gate acts on the state left behind by the previous one, so the order
//! is never rearranged. [`CircuitBuilder`] offers method chaining for the
//! small gate vocabulary.

use crate::operations::{Gate, Operation};
use std::fmt;

/// An ordered sequence of operations on a register of `num_qubits` qubits.
///
/// Indices are not checked when operations are added; the engine rejects
/// out-of-range qubits with `InvalidIndex` when the circuit runs.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            operations: Vec::new(),
        }
    }

    /// Appends one operation.
    pub fn add_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Appends every operation yielded by `ops`, in order.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(ops);
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The operations in application order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of gate (non-measurement) operations.
    pub fn gate_count(&self) -> usize {
        self.operations.iter().filter(|op| !op.is_measurement()).count()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Method-chaining constructor for [`Circuit`].
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Starts an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
        }
    }

    /// Adds a single operation.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds several operations.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Adds `gate` on `target`.
    pub fn gate(self, gate: Gate, target: usize) -> Self {
        self.add_op(Operation::Single { target, gate })
    }

    /// Hadamard on `target`.
    pub fn h(self, target: usize) -> Self {
        self.gate(Gate::Hadamard, target)
    }

    /// Pauli-X on `target`.
    pub fn x(self, target: usize) -> Self {
        self.gate(Gate::PauliX, target)
    }

    /// S on `target`.
    pub fn s(self, target: usize) -> Self {
        self.gate(Gate::S, target)
    }

    /// S† on `target`.
    pub fn s_inv(self, target: usize) -> Self {
        self.gate(Gate::SInverse, target)
    }

    /// T on `target`.
    pub fn t(self, target: usize) -> Self {
        self.gate(Gate::T, target)
    }

    /// Controlled-NOT.
    pub fn cnot(self, control: usize, target: usize) -> Self {
        self.add_op(Operation::cnot(control, target))
    }

    /// Measures `target`.
    pub fn measure(self, target: usize) -> Self {
        self.add_op(Operation::Measure { targets: vec![target] })
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() || self.num_qubits == 0 {
            return writeln!(f, "Circuit[0 operations on {} qubits]", self.num_qubits);
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let rows = self.num_qubits;

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] holds the wire segment, v_connect[row][time] the connector below it
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; rows];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; rows];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::Single { target, gate } => {
                    if let Some(cell) = op_grid.get_mut(*target) {
                        cell[t] = format_gate(gate.symbol());
                    }
                }
                Operation::Controlled { control, target, gate } => {
                    if *control < rows && *target < rows {
                        op_grid[*control][t] = format_gate("@");
                        op_grid[*target][t] = format_gate(gate.symbol());
                        let r_min = (*control).min(*target);
                        let r_max = (*control).max(*target);
                        for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                            row_vec[t] = V_WIRE;
                        }
                    }
                }
                Operation::Measure { targets } => {
                    for target in targets {
                        if let Some(cell) = op_grid.get_mut(*target) {
                            cell[t] = format_gate("M");
                        }
                    }
                }
            }
        }

        let label_width = format!("q{}: ", rows - 1).len();
        let label_padding = " ".repeat(label_width);
        writeln!(f, "Circuit[{} operations on {} qubits]", num_ops, rows)?;
        for r in 0..rows {
            write!(f, "{:<width$}", format!("q{}: ", r), width = label_width)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < rows - 1 {
                write!(f, "{}", label_padding)?;
                for connector in &v_connect[r] {
                    let padding_needed = GATE_WIDTH - 1;
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
