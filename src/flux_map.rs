// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Flux maps: flux densities tabulated over a grid of observation angles.

use crate::errors::{Error, Result};


/// Flux densities on a rectangular grid of horizontal and vertical
/// observation angles, in radians.
///
/// The horizontal index is the outer one: the value at `(angles_h[i],
/// angles_v[j])` is stored at `i * angles_v.len() + j`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluxMap {
    angles_h: Vec<f64>,
    angles_v: Vec<f64>,
    flux: Vec<f64>,
}

impl FluxMap {
    /// Fill a map by evaluating `f(angle_h, angle_v)` at every grid point.
    /// The first error aborts.
    pub fn from_fn<F>(angles_h: &[f64], angles_v: &[f64], mut f: F) -> Result<Self>
        where F: FnMut(f64, f64) -> Result<f64>
    {
        let mut flux = Vec::with_capacity(angles_h.len() * angles_v.len());

        for &ah in angles_h {
            for &av in angles_v {
                flux.push(f(ah, av)?);
            }
        }

        Ok(FluxMap {
            angles_h: angles_h.to_vec(),
            angles_v: angles_v.to_vec(),
            flux,
        })
    }

    /// The number of horizontal and vertical grid points.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.angles_h.len(), self.angles_v.len())
    }

    /// Whether the map has no points at all.
    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// The horizontal angles of the grid.
    pub fn angles_h(&self) -> &[f64] {
        &self.angles_h
    }

    /// The vertical angles of the grid.
    pub fn angles_v(&self) -> &[f64] {
        &self.angles_v
    }

    /// The flux at horizontal index `i` and vertical index `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.angles_h.len() && j < self.angles_v.len() {
            Some(self.flux[i * self.angles_v.len() + j])
        } else {
            None
        }
    }

    /// Iterate over `(angle_h, angle_v, flux)` triples, horizontal index
    /// outermost.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let ny = self.angles_v.len();

        self.flux.iter().enumerate().map(move |(k, &f)| {
            (self.angles_h[k / ny], self.angles_v[k % ny], f)
        })
    }

    /// Multiply every flux value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for f in &mut self.flux {
            *f *= factor;
        }
    }

    /// Add up several maps point by point.
    ///
    /// The angles are taken from the first map; the others must have the same
    /// dimensions. An empty list sums to an empty map.
    pub fn sum(maps: &[FluxMap]) -> Result<FluxMap> {
        let mut iter = maps.iter();

        let mut total = match iter.next() {
            Some(m) => m.clone(),
            None => return Ok(FluxMap::default()),
        };

        for m in iter {
            if m.dimensions() != total.dimensions() {
                return Err(Error::MismatchedMaps {
                    expected: total.dimensions(),
                    found: m.dimensions(),
                });
            }

            for (t, f) in total.flux.iter_mut().zip(m.flux.iter()) {
                *t += f;
            }
        }

        Ok(total)
    }

    /// Average the map over blocks of `nh` by `nv` grid points.
    ///
    /// Each block is labeled with the angles of its first point. Blocks that
    /// hang over the far edges of the grid average only the points that are
    /// actually there.
    pub fn rebin(&self, nh: usize, nv: usize) -> Result<FluxMap> {
        if nh == 0 {
            return Err(Error::InvalidArgument { name: "nh", value: 0., requirement: "at least 1" });
        }

        if nv == 0 {
            return Err(Error::InvalidArgument { name: "nv", value: 0., requirement: "at least 1" });
        }

        let (nx, ny) = self.dimensions();
        let angles_h: Vec<f64> = self.angles_h.iter().step_by(nh).cloned().collect();
        let angles_v: Vec<f64> = self.angles_v.iter().step_by(nv).cloned().collect();
        let mut flux = Vec::with_capacity(angles_h.len() * angles_v.len());

        for i0 in (0..nx).step_by(nh) {
            for j0 in (0..ny).step_by(nv) {
                let mut total = 0.;
                let mut count = 0;

                for i in i0..(i0 + nh).min(nx) {
                    for j in j0..(j0 + nv).min(ny) {
                        total += self.flux[i * ny + j];
                        count += 1;
                    }
                }

                flux.push(total / count as f64);
            }
        }

        Ok(FluxMap { angles_h, angles_v, flux })
    }
}


#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use super::FluxMap;

    /// A 3×4 map whose value encodes its indices.
    fn grid() -> FluxMap {
        FluxMap::from_fn(&[0., 1., 2.], &[0., 10., 20., 30.], |h, v| Ok(h * 100. + v)).unwrap()
    }

    #[test]
    fn layout() {
        let m = grid();
        assert_eq!(m.dimensions(), (3, 4));
        assert_eq!(m.get(2, 1), Some(210.));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.get(0, 4), None);

        let first: Vec<_> = m.iter().take(5).collect();
        assert_eq!(first, vec![(0., 0., 0.), (0., 10., 10.), (0., 20., 20.), (0., 30., 30.),
                               (1., 0., 100.)]);
    }

    #[test]
    fn from_fn_propagates_errors() {
        let r = FluxMap::from_fn(&[0., 1.], &[0.], |h, _| {
            if h > 0. {
                Err(Error::NumericalInstability { quantity: "test", detail: String::new() })
            } else {
                Ok(1.)
            }
        });
        assert!(r.is_err());
    }

    #[test]
    fn sum() {
        let mut doubled = grid();
        doubled.scale(2.);
        assert_eq!(FluxMap::sum(&[grid(), grid()]).unwrap(), doubled);
        assert!(FluxMap::sum(&[]).unwrap().is_empty());
    }

    #[test]
    fn sum_mismatched() {
        let small = FluxMap::from_fn(&[0., 1.], &[0., 1., 2., 3.], |_, _| Ok(1.)).unwrap();

        match FluxMap::sum(&[grid(), small]) {
            Err(Error::MismatchedMaps { expected: (3, 4), found: (2, 4) }) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn rebin_even_blocks() {
        let m = FluxMap::from_fn(&[0., 1., 2., 3.], &[0., 1.], |h, v| Ok(h + v)).unwrap();
        let r = m.rebin(2, 2).unwrap();
        assert_eq!(r.dimensions(), (2, 1));
        assert_eq!(r.angles_h(), &[0., 2.]);
        assert_eq!(r.angles_v(), &[0.]);
        assert_eq!(r.get(0, 0), Some(1.));
        assert_eq!(r.get(1, 0), Some(3.));
    }

    #[test]
    fn rebin_partial_edge_blocks() {
        let r = grid().rebin(2, 3).unwrap();
        assert_eq!(r.dimensions(), (2, 2));
        assert_eq!(r.angles_v(), &[0., 30.]);
        // Full block: rows 0-1, columns 0-2.
        assert_eq!(r.get(0, 0), Some(60.));
        // Rows 0-1, column 3 only.
        assert_eq!(r.get(0, 1), Some(80.));
        // Row 2 only, columns 0-2.
        assert_eq!(r.get(1, 0), Some(210.));
        // The lone corner point.
        assert_eq!(r.get(1, 1), Some(230.));
    }

    #[test]
    fn rebin_identity_and_domain() {
        assert_eq!(grid().rebin(1, 1).unwrap(), grid());
        assert!(grid().rebin(0, 2).is_err());
        assert!(grid().rebin(2, 0).is_err());
    }
}
