/// An orthogonal simulation box given by per-axis bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox {
    pub lo: [f64; 3],
    pub hi: [f64; 3],
}

impl SimulationBox {
    pub fn new(lo: [f64; 3], hi: [f64; 3]) -> Self {
        Self { lo, hi }
    }

    /// A cube `[0, side)^3`.
    pub fn cubic(side: f64) -> Self {
        Self {
            lo: [0.0; 3],
            hi: [side; 3],
        }
    }

    /// Side lengths `(Lx, Ly, Lz)`.
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.hi[0] - self.lo[0],
            self.hi[1] - self.lo[1],
            self.hi[2] - self.lo[2],
        ]
    }

    /// The side used for cubic binning. Non-cubic boxes are binned with their x length.
    pub fn cubic_side(&self) -> f64 {
        self.lengths()[0]
    }

    pub fn is_cubic(&self, tolerance: f64) -> bool {
        let [lx, ly, lz] = self.lengths();
        (lx - ly).abs() <= tolerance && (lx - lz).abs() <= tolerance
    }
}
