use super::CurveError;

/// Largest number of bits a curve distance may occupy.
const MAX_DISTANCE_BITS: u64 = 63;

/// A Hilbert curve of a given order filling the `D`-dimensional grid `[0, 2^order)^D`.
///
/// Distances and points are related through Skilling's transpose formulation
/// ("Programming the Hilbert curve", AIP Conf. Proc. 707, 2004): the distance is spread
/// bit-by-bit over the `D` coordinates, Gray-decoded, and the excess rotations/reflections
/// are undone level by level. Consecutive distances always map to grid cells that differ
/// by one unit along exactly one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertCurve<const D: usize> {
    order: u32,
}

impl<const D: usize> HilbertCurve<D> {
    /// Creates the curve of the given order (bits per coordinate).
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ZeroDimensions`] for `D == 0` and
    /// [`CurveError::TooManyBits`] when `order * D` exceeds 63 bits.
    pub fn new(order: u32) -> Result<Self, CurveError> {
        if D == 0 {
            return Err(CurveError::ZeroDimensions);
        }
        let bits = u64::from(order) * D as u64;
        if bits > MAX_DISTANCE_BITS || order > 31 {
            return Err(CurveError::TooManyBits {
                order,
                dimensions: D,
                bits,
            });
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn dimensions(&self) -> usize {
        D
    }

    /// Number of cells along one axis, `2^order`.
    pub fn side(&self) -> u32 {
        1 << self.order
    }

    /// Number of points on the curve, `2^(order * D)`.
    pub fn num_points(&self) -> u64 {
        1 << (u64::from(self.order) * D as u64)
    }

    /// Maps a distance along the curve to grid coordinates.
    pub fn point_from_distance(&self, distance: u64) -> Result<[u32; D], CurveError> {
        let points = self.num_points();
        if distance >= points {
            return Err(CurveError::DistanceOutOfRange { distance, points });
        }

        let p = self.order;
        let mut x = [0u32; D];
        if p == 0 {
            return Ok(x);
        }

        let total_bits = p * D as u32;
        for level in 0..p {
            for (dim, coord) in x.iter_mut().enumerate() {
                let k = level * D as u32 + dim as u32;
                let bit = (distance >> (total_bits - 1 - k)) & 1;
                *coord |= (bit as u32) << (p - 1 - level);
            }
        }

        // Gray decode.
        let t = x[D - 1] >> 1;
        for i in (1..D).rev() {
            x[i] ^= x[i - 1];
        }
        x[0] ^= t;

        // Undo excess work.
        let end = 1u64 << p;
        let mut q = 2u64;
        while q != end {
            let mask = (q - 1) as u32;
            let q_bit = q as u32;
            for i in (0..D).rev() {
                if x[i] & q_bit != 0 {
                    x[0] ^= mask;
                } else {
                    let t = (x[0] ^ x[i]) & mask;
                    x[0] ^= t;
                    x[i] ^= t;
                }
            }
            q <<= 1;
        }

        Ok(x)
    }

    /// Maps grid coordinates to their distance along the curve.
    pub fn distance_from_point(&self, point: [u32; D]) -> Result<u64, CurveError> {
        let side = self.side();
        if let Some((axis, &value)) = point.iter().enumerate().find(|(_, v)| **v >= side) {
            return Err(CurveError::CoordinateOutOfRange { axis, value, side });
        }

        let p = self.order;
        if p == 0 {
            return Ok(0);
        }
        let mut x = point;
        let m = 1u32 << (p - 1);

        // Inverse undo excess work.
        let mut q = m;
        while q > 1 {
            let mask = q - 1;
            for i in 0..D {
                if x[i] & q != 0 {
                    x[0] ^= mask;
                } else {
                    let t = (x[0] ^ x[i]) & mask;
                    x[0] ^= t;
                    x[i] ^= t;
                }
            }
            q >>= 1;
        }

        // Gray encode.
        for i in 1..D {
            x[i] ^= x[i - 1];
        }
        let mut t = 0u32;
        let mut q = m;
        while q > 1 {
            if x[D - 1] & q != 0 {
                t ^= q - 1;
            }
            q >>= 1;
        }
        for coord in x.iter_mut() {
            *coord ^= t;
        }

        let mut distance = 0u64;
        for level in 0..p {
            for coord in &x {
                distance = (distance << 1) | u64::from((coord >> (p - 1 - level)) & 1);
            }
        }
        Ok(distance)
    }
}

/// The 3D curve used for voxel grids.
pub type HilbertCurve3 = HilbertCurve<3>;
