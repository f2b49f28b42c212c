// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error type shared by the generator, the registry, and the
//! command line front end.

/// Everything that can stop a render from happening.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum RenderError {
    /// The frame has no pixels along one of its axes.
    #[fail(display = "Image dimensions must be positive, got {}x{}", width, height)]
    InvalidDimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// There must be at least one worker to do the work.
    #[fail(display = "Worker count must be at least 1")]
    InvalidWorkers,

    /// The iteration cap handed to point functions must be positive.
    #[fail(display = "Iteration cap must be at least 1")]
    InvalidIterations,

    /// Zoom is a divisor; it has to be a positive, finite number.
    #[fail(display = "Zoom must be a positive, finite number, got {}", _0)]
    InvalidZoom(f64),

    /// Zero samples per axis would average over nothing.
    #[fail(display = "Samples per axis must be at least 1")]
    NoSamples,

    /// The registry has no fractal by that name.
    #[fail(display = "Invalid fractal function: {}", _0)]
    UnknownFractal(String),

    /// The fractal exists, but has no colouring by that name.
    #[fail(display = "Invalid colouring function {} for fractal {}", colouring, fractal)]
    UnknownColouring {
        /// The fractal that was found.
        fractal: String,
        /// The colouring that was not.
        colouring: String,
    },

    /// The fractal was given the wrong number of constants.
    #[fail(
        display = "Invalid amount of constants for {}: expected {}, got {}",
        fractal, expected, got
    )]
    WrongConstantCount {
        /// The fractal being built.
        fractal: String,
        /// How many constants it takes.
        expected: usize,
        /// How many it was given.
        got: usize,
    },

    /// A worker thread panicked, which is fatal to the whole render.
    #[fail(display = "A render worker panicked")]
    WorkerPanicked,

    /// The finished framebuffer could not be written out.
    #[fail(display = "Could not write image: {}", _0)]
    Image(String),
}
