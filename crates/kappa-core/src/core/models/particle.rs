use nalgebra::{Point3, Vector3};
use std::collections::{BTreeMap, HashSet};

/// A single particle of a simulation snapshot.
///
/// Only the information needed for spatial binning is kept: the integer type tag
/// assigned by the simulation package and the Cartesian position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// The particle (atom) type tag, e.g. the LAMMPS atom type.
    pub type_id: u32,
    /// The Cartesian position, in the units of the simulation box.
    pub position: Point3<f64>,
}

impl Particle {
    pub fn new(type_id: u32, x: f64, y: f64, z: f64) -> Self {
        Self {
            type_id,
            position: Point3::new(x, y, z),
        }
    }
}

/// An ordered collection of particles taken from one snapshot.
///
/// The order of particles is preserved as read, but nothing downstream depends on it:
/// binning only looks at positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    particles: Vec<Particle>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.particles.iter().map(|p| &p.position)
    }

    /// Returns a new cloud containing only the particles whose type is in `types`.
    ///
    /// Used to isolate a sublattice (e.g. metal nodes of a framework) before binning.
    pub fn filter_by_types(&self, types: &[u32]) -> PointCloud {
        let wanted: HashSet<u32> = types.iter().copied().collect();
        self.particles
            .iter()
            .filter(|p| wanted.contains(&p.type_id))
            .copied()
            .collect()
    }

    /// Shifts every particle by `offset`.
    ///
    /// Binning works on `[0, box_size)`, so clouds read from boxes whose lower corner is
    /// not the origin are moved with `-lo` first.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for particle in &mut self.particles {
            particle.position += offset;
        }
    }

    /// Counts particles per type tag, in ascending type order.
    pub fn type_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for particle in &self.particles {
            *counts.entry(particle.type_id).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<Particle> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        Self {
            particles: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Particle>> for PointCloud {
    fn from(particles: Vec<Particle>) -> Self {
        Self { particles }
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cloud() -> PointCloud {
        vec![
            Particle::new(1, 0.0, 0.0, 0.0),
            Particle::new(2, 1.0, 1.0, 1.0),
            Particle::new(1, 2.0, 2.0, 2.0),
            Particle::new(10, 3.0, 3.0, 3.0),
        ]
        .into()
    }

    #[test]
    fn filter_by_types_keeps_only_requested_types_in_order() {
        let cloud = sample_cloud();
        let zn = cloud.filter_by_types(&[1]);

        assert_eq!(zn.len(), 2);
        assert_eq!(zn.particles()[0].position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(zn.particles()[1].position, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn filter_by_types_with_unknown_type_returns_empty_cloud() {
        let cloud = sample_cloud();
        assert!(cloud.filter_by_types(&[42]).is_empty());
    }

    #[test]
    fn type_counts_groups_particles_by_type() {
        let counts = sample_cloud().type_counts();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&10), Some(&1));
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![1, 2, 10]);
    }

    #[test]
    fn translate_moves_every_particle() {
        let mut cloud = sample_cloud();
        cloud.translate(&Vector3::new(1.0, -1.0, 0.5));
        assert_eq!(cloud.particles()[0].position, Point3::new(1.0, -1.0, 0.5));
        assert_eq!(cloud.particles()[3].position, Point3::new(4.0, 2.0, 3.5));
    }

    #[test]
    fn collects_from_iterator() {
        let cloud: PointCloud = (0..5).map(|i| Particle::new(1, i as f64, 0.0, 0.0)).collect();
        assert_eq!(cloud.len(), 5);
        assert_eq!(cloud.positions().last().unwrap().x, 4.0);
    }
}
