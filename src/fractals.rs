// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The fractal registry.  Each named fractal family knows how many
//! constants it needs, which colourings it can be drawn with, and how
//! to build a point function out of a colouring and its constants.
//! The Generator never sees any of this; it only gets the finished
//! point function.

use std::collections::BTreeMap;

use num::Complex;

use colouring::{self, Colouring, Escape};
use error::RenderError;
use point::PointFunction;

/// Builds a point function from a colouring and a list of constants.
/// The constant count has already been checked by the registry.
pub type Builder = fn(Colouring, &[f64]) -> Box<dyn PointFunction>;

/// One entry in the registry.
pub struct FractalFamily {
    /// How many constants `build` expects.
    pub constants: usize,
    /// The point function factory.
    pub build: Builder,
    /// The colourings this family can be drawn with, by name.
    pub colourings: BTreeMap<&'static str, Colouring>,
}

impl FractalFamily {
    /// A family offering all of the standard colourings.
    pub fn new(constants: usize, build: Builder) -> Self {
        FractalFamily {
            constants,
            build,
            colourings: colouring::standard().into_iter().collect(),
        }
    }
}

/// A table of fractal families by name.
pub struct Registry {
    families: BTreeMap<&'static str, FractalFamily>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Registry {
    /// A registry holding the built-in families: mandelbrot, julia,
    /// burningship and tricorn.
    pub fn new() -> Self {
        let mut registry = Registry::empty();
        registry.insert("mandelbrot", FractalFamily::new(0, mandelbrot));
        registry.insert("julia", FractalFamily::new(2, julia));
        registry.insert("burningship", FractalFamily::new(0, burning_ship));
        registry.insert("tricorn", FractalFamily::new(0, tricorn));
        registry
    }

    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Registry {
            families: BTreeMap::new(),
        }
    }

    /// Add or replace a family.
    pub fn insert(&mut self, name: &'static str, family: FractalFamily) {
        self.families.insert(name, family);
    }

    /// Look up a family by name.
    pub fn get(&self, name: &str) -> Option<&FractalFamily> {
        self.families.get(name)
    }

    /// The names of every registered family, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.families.keys().cloned().collect()
    }

    /// Find the named fractal, check its constants, find the named
    /// colouring, and only then build the point function.
    pub fn resolve(
        &self,
        fractal: &str,
        colouring: &str,
        constants: &[f64],
    ) -> Result<Box<dyn PointFunction>, RenderError> {
        let family = self
            .get(fractal)
            .ok_or_else(|| RenderError::UnknownFractal(fractal.to_string()))?;

        if constants.len() != family.constants {
            return Err(RenderError::WrongConstantCount {
                fractal: fractal.to_string(),
                expected: family.constants,
                got: constants.len(),
            });
        }

        let colour = family
            .colourings
            .get(colouring)
            .ok_or_else(|| RenderError::UnknownColouring {
                fractal: fractal.to_string(),
                colouring: colouring.to_string(),
            })?;

        debug!(
            "Resolved {} with {} colouring and constants {:?}",
            fractal, colouring, constants
        );
        Ok((family.build)(*colour, constants))
    }
}

/// Parse a comma-separated list of constants.  A blank list means no
/// constants.  Otherwise every entry that is not a number, empty ones
/// included, is reported and skipped, so a typo shows up later as a
/// wrong constant count rather than a crash.
pub fn parse_constants(value: &str) -> Vec<f64> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter_map(|s| match s.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Error parsing {} as a float", s);
                None
            }
        })
        .collect()
}

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// False if the point is certainly inside the main cardioid or the
/// period-2 bulb of the Mandelbrot set.  True does not mean the point
/// is outside, only that it has to be iterated to find out.
pub fn maybe_outside(point: Complex<f64>) -> bool {
    let y = point.im * point.im;
    let q = y + (point.re - D4) * (point.re - D4);
    q * (q + point.re - D4) > (y * D4) && (point.re + 1.0) * (point.re + 1.0) + y > D16
}

/// Our classic iterator: apply `step` to z until it leaves the circle
/// of radius 2 or the cap runs out.
#[inline]
pub fn escape<S>(mut z: Complex<f64>, c: Complex<f64>, cap: usize, step: S) -> Escape
where
    S: Fn(Complex<f64>, Complex<f64>) -> Complex<f64>,
{
    for i in 0..cap {
        z = step(z, c);
        if z.norm_sqr() >= 4.0 {
            return Escape::Outside(i, z);
        }
    }
    Escape::Inside
}

fn square(z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
    z * z + c
}

/// z <- z² + c, starting from zero.
pub fn mandelbrot_escape(c: Complex<f64>, cap: usize) -> Escape {
    if !maybe_outside(c) {
        return Escape::Inside;
    }
    escape(Complex::new(0.0, 0.0), c, cap, square)
}

/// z <- z² + k, starting from the point itself.
pub fn julia_escape(point: Complex<f64>, k: Complex<f64>, cap: usize) -> Escape {
    escape(point, k, cap, square)
}

/// z <- (|re z| + i|im z|)² + c, starting from zero.
pub fn burning_ship_escape(c: Complex<f64>, cap: usize) -> Escape {
    escape(Complex::new(0.0, 0.0), c, cap, |z, c| {
        let w = Complex::new(z.re.abs(), z.im.abs());
        w * w + c
    })
}

/// z <- conj(z)² + c, starting from zero.
pub fn tricorn_escape(c: Complex<f64>, cap: usize) -> Escape {
    escape(Complex::new(0.0, 0.0), c, cap, |z, c| {
        let w = z.conj();
        w * w + c
    })
}

fn mandelbrot(colour: Colouring, _constants: &[f64]) -> Box<dyn PointFunction> {
    Box::new(move |c: Complex<f64>, cap: usize| colour(mandelbrot_escape(c, cap), cap))
}

fn julia(colour: Colouring, constants: &[f64]) -> Box<dyn PointFunction> {
    let k = Complex::new(constants[0], constants[1]);
    Box::new(move |point: Complex<f64>, cap: usize| colour(julia_escape(point, k, cap), cap))
}

fn burning_ship(colour: Colouring, _constants: &[f64]) -> Box<dyn PointFunction> {
    Box::new(move |c: Complex<f64>, cap: usize| colour(burning_ship_escape(c, cap), cap))
}

fn tricorn(colour: Colouring, _constants: &[f64]) -> Box<dyn PointFunction> {
    Box::new(move |c: Complex<f64>, cap: usize| colour(tricorn_escape(c, cap), cap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn registry_lists_builtins() {
        assert_eq!(
            Registry::new().names(),
            vec!["burningship", "julia", "mandelbrot", "tricorn"]
        );
    }

    #[test]
    fn unknown_fractal_is_rejected() {
        match Registry::new().resolve("sierpinski", "default", &[]) {
            Err(e) => assert_eq!(e, RenderError::UnknownFractal("sierpinski".to_string())),
            Ok(_) => panic!("resolved a fractal that does not exist"),
        }
    }

    #[test]
    fn constant_count_is_checked_before_colouring() {
        match Registry::new().resolve("julia", "nonsense", &[0.3]) {
            Err(e) => assert_eq!(
                e,
                RenderError::WrongConstantCount {
                    fractal: "julia".to_string(),
                    expected: 2,
                    got: 1
                }
            ),
            Ok(_) => panic!("julia resolved with one constant"),
        }
    }

    #[test]
    fn unknown_colouring_is_rejected() {
        match Registry::new().resolve("mandelbrot", "plaid", &[]) {
            Err(e) => assert_eq!(
                e,
                RenderError::UnknownColouring {
                    fractal: "mandelbrot".to_string(),
                    colouring: "plaid".to_string()
                }
            ),
            Ok(_) => panic!("resolved a colouring that does not exist"),
        }
    }

    #[test]
    fn resolved_mandelbrot_colours_the_origin_black() {
        let f = Registry::new().resolve("mandelbrot", "default", &[]).unwrap();
        assert_eq!(f.sample(Complex::new(0.0, 0.0), 100), Rgba([0.0, 0.0, 0.0, 255.0]));
        assert_eq!(f.sample(Complex::new(-1.0, 0.0), 100), Rgba([0.0, 0.0, 0.0, 255.0]));
        assert_ne!(f.sample(Complex::new(0.5, 0.5), 100), Rgba([0.0, 0.0, 0.0, 255.0]));
    }

    #[test]
    fn cardioid_and_bulb_are_skipped() {
        assert!(!maybe_outside(Complex::new(0.0, 0.0)));
        assert!(!maybe_outside(Complex::new(-1.0, 0.0)));
        assert!(maybe_outside(Complex::new(2.0, 2.0)));
        assert!(maybe_outside(Complex::new(-0.75, 0.2)));
    }

    #[test]
    fn escapes() {
        assert_eq!(
            mandelbrot_escape(Complex::new(2.0, 2.0), 10),
            Escape::Outside(0, Complex::new(2.0, 2.0))
        );
        assert_eq!(mandelbrot_escape(Complex::new(-0.1, 0.1), 500), Escape::Inside);
        assert_eq!(julia_escape(Complex::new(0.5, 0.0), Complex::new(0.0, 0.0), 100), Escape::Inside);
        assert_eq!(
            julia_escape(Complex::new(1.5, 0.0), Complex::new(0.0, 0.0), 100),
            Escape::Outside(0, Complex::new(2.25, 0.0))
        );
        assert_eq!(burning_ship_escape(Complex::new(0.0, 0.0), 100), Escape::Inside);
        assert_eq!(tricorn_escape(Complex::new(0.0, 0.0), 100), Escape::Inside);
        match burning_ship_escape(Complex::new(1.0, 1.0), 100) {
            Escape::Outside(i, _) => assert!(i < 3),
            Escape::Inside => panic!("1+i does not stay bounded"),
        }
    }

    #[test]
    fn julia_uses_its_constants() {
        let registry = Registry::new();
        let still = registry.resolve("julia", "default", &[0.0, 0.0]).unwrap();
        let moved = registry.resolve("julia", "default", &[2.0, 0.0]).unwrap();
        let p = Complex::new(0.5, 0.0);
        assert_eq!(still.sample(p, 50), Rgba([0.0, 0.0, 0.0, 255.0]));
        assert_ne!(moved.sample(p, 50), Rgba([0.0, 0.0, 0.0, 255.0]));
    }

    #[test]
    fn constants_parse_tolerantly() {
        assert_eq!(parse_constants(""), Vec::<f64>::new());
        assert_eq!(parse_constants("-0.8,0.156"), vec![-0.8, 0.156]);
        assert_eq!(parse_constants(" 1.5 , x, 2"), vec![1.5, 2.0]);
    }

    #[test]
    fn empty_entries_are_skipped_but_blank_lists_are_empty() {
        assert_eq!(parse_constants("   "), Vec::<f64>::new());
        assert_eq!(parse_constants("0.3,,0.5"), vec![0.3, 0.5]);
        assert_eq!(parse_constants(",0.3"), vec![0.3]);
        assert_eq!(parse_constants("0.3,"), vec![0.3]);
    }
}
