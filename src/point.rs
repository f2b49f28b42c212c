// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The contract between the generator and whatever it is drawing.

use image::Rgba;
use num::Complex;

/// A colour sample before it is averaged and truncated into the
/// framebuffer.  Channels are expected to be in `0.0..=255.0`.
pub type Sample = Rgba<f64>;

/// Something that can colour a single point of the complex plane.
///
/// Every worker calls the same point function at the same time, so
/// implementations must be `Sync` and must not depend on any shared
/// mutable state.  The iteration cap is passed through from the
/// Generator untouched; what it means is up to the implementation.
pub trait PointFunction: Sync {
    /// Colour the given point.
    fn sample(&self, point: Complex<f64>, iterations: usize) -> Sample;
}

impl<F> PointFunction for F
where
    F: Fn(Complex<f64>, usize) -> Sample + Sync,
{
    #[inline]
    fn sample(&self, point: Complex<f64>, iterations: usize) -> Sample {
        self(point, iterations)
    }
}
