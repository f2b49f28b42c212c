#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Supersampled fractal generator
//!
//! An escape-time fractal is drawn by asking, for every pixel, how
//! quickly the corresponding point of the complex plane runs off to
//! infinity under some iteration.  Sampling once per pixel makes the
//! boundary of the set look like a staircase, because the boundary
//! has detail at every scale and a pixel is either in or out.  Taking
//! several samples spread across the area of each pixel and averaging
//! them gives a much better picture of what the pixel actually
//! contains.
//!
//! The [`Generator`] does that work across a fixed number of threads.
//! It knows nothing about fractals; it is handed a [`PointFunction`],
//! which turns a point of the plane into a colour.  The [`Registry`]
//! builds point functions for a handful of well-known fractals out of
//! a fractal name, a colouring name, and a list of constants.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod colouring;
pub mod error;
pub mod fractals;
pub mod generator;
pub mod planes;
pub mod point;

pub use error::RenderError;
pub use fractals::{parse_constants, FractalFamily, Registry};
pub use generator::Generator;
pub use planes::PlaneMapper;
pub use point::{PointFunction, Sample};
