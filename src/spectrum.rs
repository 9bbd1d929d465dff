// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Spectra: flux densities tabulated against photon energy.

use std::iter::FromIterator;
use std::slice;

use crate::errors::{Error, Result};


/// An ordered list of `(photon energy in eV, flux density)` points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    points: Vec<(f64, f64)>,
}

impl Spectrum {
    /// Create an empty spectrum.
    pub fn new() -> Self {
        Spectrum { points: Vec::new() }
    }

    /// Append a point.
    pub fn push(&mut self, energy_ev: f64, flux: f64) {
        self.points.push((energy_ev, flux));
    }

    /// The number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no points at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points, in order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Iterate over the points.
    pub fn iter(&self) -> slice::Iter<'_, (f64, f64)> {
        self.points.iter()
    }

    /// Multiply every flux value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.points {
            p.1 *= factor;
        }
    }

    /// The point with the largest flux, if any. NaN fluxes are ignored.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points.iter()
            .filter(|p| !p.1.is_nan())
            .fold(None, |best: Option<(f64, f64)>, &p| match best {
                Some(b) if b.1 >= p.1 => Some(b),
                _ => Some(p),
            })
    }

    /// Add up several spectra point by point.
    ///
    /// The energies are taken from the first spectrum; the others must have
    /// the same number of points. An empty list sums to an empty spectrum.
    pub fn sum(spectra: &[Spectrum]) -> Result<Spectrum> {
        let mut iter = spectra.iter();

        let mut total = match iter.next() {
            Some(s) => s.clone(),
            None => return Ok(Spectrum::new()),
        };

        for s in iter {
            if s.len() != total.len() {
                return Err(Error::MismatchedSpectra { expected: total.len(), found: s.len() });
            }

            for (t, p) in total.points.iter_mut().zip(s.points.iter()) {
                t.1 += p.1;
            }
        }

        Ok(total)
    }
}

impl FromIterator<(f64, f64)> for Spectrum {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Spectrum { points: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Spectrum {
    type Item = &'a (f64, f64);
    type IntoIter = slice::Iter<'a, (f64, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
