// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Error types.

use thiserror::Error;

/// Things that can go wrong when evaluating one of the estimators.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// An input lies outside of its physical domain.
    #[error("invalid argument `{name}` = {value:e}: must be {requirement}")]
    InvalidArgument {
        /// The name of the offending parameter.
        name: &'static str,

        /// The value that was passed.
        value: f64,

        /// What the value should have satisfied.
        requirement: &'static str,
    },

    /// A derived quantity could not be evaluated to a finite number, even
    /// after falling back to the stabilized form.
    #[error("numerical instability evaluating {quantity}: {detail}")]
    NumericalInstability {
        /// The quantity being evaluated.
        quantity: &'static str,

        /// Some context about the failure.
        detail: String,
    },

    /// Spectra that were supposed to be combined point-by-point do not line
    /// up.
    #[error("spectra do not have the same dimensions (expected {expected} points, found {found})")]
    MismatchedSpectra {
        /// The number of points in the first spectrum.
        expected: usize,

        /// The number of points in the spectrum that disagreed.
        found: usize,
    },

    /// Flux maps that were supposed to be combined point-by-point do not
    /// have the same grid dimensions.
    #[error("flux maps do not have the same dimensions (expected {expected:?}, found {found:?})")]
    MismatchedMaps {
        /// The horizontal and vertical sizes of the first map.
        expected: (usize, usize),

        /// The sizes of the map that disagreed.
        found: (usize, usize),
    },
}

/// A `Result` type whose error is our `Error`.
pub type Result<T> = ::std::result::Result<T, Error>;


/// Require that `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0. {
        Ok(value)
    } else {
        Err(Error::InvalidArgument { name, value, requirement: "finite and positive" })
    }
}

/// Require that `value` is finite and not negative.
pub(crate) fn require_nonnegative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0. {
        Ok(value)
    } else {
        Err(Error::InvalidArgument { name, value, requirement: "finite and non-negative" })
    }
}

/// Require that `value` is finite.
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidArgument { name, value, requirement: "finite" })
    }
}
