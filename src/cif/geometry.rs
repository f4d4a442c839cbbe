//! Distances and coordination numbers from a parsed CIF
//!
//! The unit cell is expanded into a 3x3x3 supercell (all ±1 fractional
//! translations) so every unit-cell site sees its full periodic
//! neighborhood. Distances are computed in cartesian coordinates.

use anyhow::{Result, bail};
use std::collections::BTreeSet;

use super::parser::{Cell, CifDocument};

/// Neighbors within `nearest distance * NEIGHBOR_TOLERANCE` count toward a
/// site's coordination number (the minimum-distance method).
const NEIGHBOR_TOLERANCE: f64 = 1.10;

/// Two points closer than this are the same atom
const SELF_EPSILON: f64 = 1e-6;

/// Cartesian view of a structure: unit-cell sites plus the full supercell
/// point cloud.
pub struct Geometry {
    unit: Vec<[f64; 3]>,
    points: Vec<[f64; 3]>,
}

impl Geometry {
    pub fn from_document(doc: &CifDocument) -> Result<Self> {
        let matrix = frac_to_cart(&doc.cell)?;

        let unit: Vec<[f64; 3]> =
            doc.sites.iter().map(|site| apply(&matrix, site.fract)).collect();

        let mut points = Vec::with_capacity(unit.len() * 27);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let shift = [dx as f64, dy as f64, dz as f64];
                    for site in &doc.sites {
                        let fract = [
                            site.fract[0] + shift[0],
                            site.fract[1] + shift[1],
                            site.fract[2] + shift[2],
                        ];
                        points.push(apply(&matrix, fract));
                    }
                }
            }
        }

        Ok(Self { unit, points })
    }

    /// Number of atoms in the expanded supercell
    pub fn supercell_atom_count(&self) -> usize {
        self.points.len()
    }

    /// Minimum pairwise separation between any unit-cell site and any other
    /// atom in the supercell.
    pub fn shortest_distance(&self) -> Result<f64> {
        let mut shortest = f64::INFINITY;
        for site in &self.unit {
            for point in &self.points {
                let d = distance(*site, *point);
                if d > SELF_EPSILON && d < shortest {
                    shortest = d;
                }
            }
        }
        if !shortest.is_finite() {
            bail!("structure has no neighboring atoms");
        }
        Ok(shortest)
    }

    /// Unique coordination numbers across all unit-cell sites, using the
    /// minimum-distance method: per site, count neighbors no farther than
    /// the site's nearest neighbor times the tolerance.
    pub fn coordination_numbers(&self) -> Result<BTreeSet<u32>> {
        let mut values = BTreeSet::new();
        for site in &self.unit {
            let mut nearest = f64::INFINITY;
            for point in &self.points {
                let d = distance(*site, *point);
                if d > SELF_EPSILON && d < nearest {
                    nearest = d;
                }
            }
            if !nearest.is_finite() {
                bail!("site has no neighboring atoms");
            }

            let cutoff = nearest * NEIGHBOR_TOLERANCE;
            let count = self
                .points
                .iter()
                .filter(|point| {
                    let d = distance(*site, **point);
                    d > SELF_EPSILON && d <= cutoff
                })
                .count();
            values.insert(count as u32);
        }
        Ok(values)
    }
}

/// Standard fractional-to-cartesian matrix: `a` along x, `b` in the xy
/// plane. Columns are the cell vectors.
fn frac_to_cart(cell: &Cell) -> Result<[[f64; 3]; 3]> {
    let (alpha, beta, gamma) = (
        cell.alpha.to_radians(),
        cell.beta.to_radians(),
        cell.gamma.to_radians(),
    );

    let bx = cell.b * gamma.cos();
    let by = cell.b * gamma.sin();
    let cx = cell.c * beta.cos();
    let cy = cell.c * (alpha.cos() - beta.cos() * gamma.cos()) / gamma.sin();
    let cz_sq = cell.c * cell.c - cx * cx - cy * cy;
    if cz_sq <= 0.0 {
        bail!("cell angles do not form a valid lattice");
    }

    Ok([[cell.a, bx, cx], [0.0, by, cy], [0.0, 0.0, cz_sq.sqrt()]])
}

fn apply(matrix: &[[f64; 3]; 3], fract: [f64; 3]) -> [f64; 3] {
    [
        matrix[0][0] * fract[0] + matrix[0][1] * fract[1] + matrix[0][2] * fract[2],
        matrix[1][0] * fract[0] + matrix[1][1] * fract[1] + matrix[1][2] * fract[2],
        matrix[2][0] * fract[0] + matrix[2][1] * fract[1] + matrix[2][2] * fract[2],
    ]
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
