// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colouring functions turn the result of an escape-time iteration
//! into a colour.  All of them return opaque colours with channels in
//! `0.0..=255.0`.

use image::Rgba;
use num::{clamp, Complex};

use point::Sample;

/// How a point left, or failed to leave, the neighbourhood of the
/// origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// Still bounded when the iteration cap ran out.
    Inside,
    /// Escaped on the given (zero-based) iteration, with z last seen
    /// at the given point.
    Outside(usize, Complex<f64>),
}

/// Given an escape and the iteration cap, produce a colour.
pub type Colouring = fn(Escape, usize) -> Sample;

const BLACK: Sample = Rgba([0.0, 0.0, 0.0, 255.0]);
const WHITE: Sample = Rgba([255.0, 255.0, 255.0, 255.0]);

#[inline]
fn grey(v: f64) -> Sample {
    let v = clamp(v, 0.0, 255.0);
    Rgba([v, v, v, 255.0])
}

/// Black inside; outside, a grey ramp from dark (escaped at once) to
/// white (escaped on the last iteration).
pub fn default(escape: Escape, cap: usize) -> Sample {
    match escape {
        Escape::Inside => BLACK,
        Escape::Outside(i, _) => grey(255.0 * (i + 1) as f64 / cap as f64),
    }
}

/// The default ramp turned upside down: white inside, and the slow
/// escapers darkest.
pub fn inverted(escape: Escape, cap: usize) -> Sample {
    match escape {
        Escape::Inside => WHITE,
        Escape::Outside(i, _) => grey(255.0 * (1.0 - (i + 1) as f64 / cap as f64)),
    }
}

/// Alternating pale and deep blue bands by escape iteration.
pub fn bands(escape: Escape, _cap: usize) -> Sample {
    match escape {
        Escape::Inside => BLACK,
        Escape::Outside(i, _) if i % 2 == 0 => Rgba([224.0, 232.0, 255.0, 255.0]),
        Escape::Outside(_, _) => Rgba([16.0, 32.0, 112.0, 255.0]),
    }
}

/// Continuous ("normalized") iteration count run through a blue to
/// gold polynomial palette.  There are no visible steps between
/// iteration counts, so this is the one to supersample.
pub fn smooth(escape: Escape, cap: usize) -> Sample {
    match escape {
        Escape::Inside => BLACK,
        Escape::Outside(i, z) => {
            let nu = (i + 1) as f64 - z.norm().ln().ln() / ::std::f64::consts::LN_2;
            let t = clamp(nu / cap as f64, 0.0, 1.0);
            let u = 1.0 - t;
            Rgba([
                clamp(9.0 * u * t * t * t * 255.0, 0.0, 255.0),
                clamp(15.0 * u * u * t * t * 255.0, 0.0, 255.0),
                clamp(8.5 * u * u * u * t * 255.0, 0.0, 255.0),
                255.0,
            ])
        }
    }
}

/// The colourings every built-in fractal family offers, by name.
pub fn standard() -> Vec<(&'static str, Colouring)> {
    vec![
        ("default", default as Colouring),
        ("inverted", inverted as Colouring),
        ("bands", bands as Colouring),
        ("smooth", smooth as Colouring),
    ]
}
