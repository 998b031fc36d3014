use rand::rngs::StdRng;
use rand::Rng;

/// Source of the uniform draws that perturb generated rounds.
///
/// Scores, edge strengths and instruction fan-out all pull from here, so a
/// seeded source makes a whole run reproducible.
pub trait Entropy {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f32;
}

impl Entropy for StdRng {
    fn unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Returns the same draw every time. Useful for pinning scores in tests.
#[derive(Clone, Copy, Debug)]
pub struct ConstantEntropy(pub f32);

impl Entropy for ConstantEntropy {
    fn unit(&mut self) -> f32 {
        self.0.clamp(0.0, 0.999_999)
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct CycleEntropy {
    values: Vec<f32>,
    next: usize,
}

impl CycleEntropy {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, next: 0 }
    }
}

impl Entropy for CycleEntropy {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        v.clamp(0.0, 0.999_999)
    }
}
