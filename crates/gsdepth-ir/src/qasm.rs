//! OpenQASM 3 emission for graph-state circuits.

use crate::circuit::Circuit;

/// Emit a circuit as OpenQASM 3 source.
pub fn emit_qasm3(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit);
    emitter.output
}

struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        let n = circuit.num_qubits();
        if n == 0 {
            return;
        }
        self.writeln(&format!("qubit[{n}] q;"));
        self.writeln("");

        for q in 0..n {
            self.writeln(&format!("h q[{q}];"));
        }
        for (idx, layer) in circuit.layers().iter().enumerate() {
            self.writeln(&format!("// layer {idx}"));
            for (u, v) in layer.gates() {
                self.writeln(&format!("cz q[{u}], q[{v}];"));
            }
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Layer;

    #[test]
    fn test_emit_single_edge() {
        let c = Circuit::from_layers(2, [Layer::new([(0, 1)])]).unwrap();
        let qasm = emit_qasm3(&c);
        assert!(qasm.starts_with("OPENQASM 3.0;"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("h q[1];"));
        assert!(qasm.contains("// layer 0\ncz q[0], q[1];"));
    }

    #[test]
    fn test_emit_zero_qubits() {
        let qasm = emit_qasm3(&Circuit::new(0));
        assert!(!qasm.contains("qubit"));
    }
}
