// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Generator owns a framebuffer and fills it by asking a point
//! function for the colour of every pixel.
//!
//! Each pixel is sampled on a small square grid of sub-pixel
//! positions and the samples are averaged, which smooths out the
//! jagged edges escape-time fractals are prone to.  The pixels are
//! dealt out to the workers like cards: worker 0 gets pixels 0, n,
//! 2n..., worker 1 gets pixels 1, n+1, 2n+1..., and so on.  Expensive
//! regions of a fractal tend to clump together, and dealing the pixels
//! out this way keeps any one worker from getting stuck with a clump.
//!
//! Every worker receives exclusive `&mut` access to the pixels in its
//! hand, so no locking is needed on the framebuffer.

extern crate crossbeam;

use std::time::Instant;

use image::{Rgba, RgbaImage};
use itertools::iproduct;
use num::{clamp, Complex};

use error::RenderError;
use planes::PlaneMapper;
use point::PointFunction;

/// The sub-pixel positions sampled along each axis, relative to the
/// pixel's own coordinate.  They are evenly spaced and centered, so a
/// single sample is taken exactly at offset 0.
pub fn sample_offsets(samples: usize) -> Vec<f64> {
    (0..samples)
        .map(|k| (1.0 + (2 * k) as f64 - samples as f64) / (2 * samples) as f64)
        .collect()
}

/// Deal items round-robin into `hands` hands: hand `r` receives items
/// `r`, `r + hands`, `r + 2 * hands`...  Panics if `hands` is zero.
pub fn deal<I: IntoIterator>(items: I, hands: usize) -> Vec<Vec<I::Item>> {
    let mut dealt: Vec<Vec<I::Item>> = (0..hands).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        dealt[i % hands].push(item);
    }
    dealt
}

#[inline]
fn to_channel(value: f64) -> u8 {
    clamp(value, 0.0, 255.0) as u8
}

/// The Generator contains the parameters of a single render and the
/// framebuffer it renders into.  Once built, the parameters do not
/// change.
#[derive(Debug)]
pub struct Generator {
    plane: PlaneMapper,
    workers: usize,
    iterations: usize,
    framebuffer: RgbaImage,
}

impl Generator {
    /// Requires the width and height of the image, the number of
    /// workers to split the render across, the iteration cap to hand
    /// the point function, and the center and zoom of the region of
    /// the complex plane to render.
    pub fn new(
        width: usize,
        height: usize,
        workers: usize,
        iterations: usize,
        center: Complex<f64>,
        zoom: f64,
    ) -> Result<Self, RenderError> {
        if width == 0
            || height == 0
            || width > u32::max_value() as usize
            || height > u32::max_value() as usize
        {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if workers == 0 {
            return Err(RenderError::InvalidWorkers);
        }
        if iterations == 0 {
            return Err(RenderError::InvalidIterations);
        }
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(RenderError::InvalidZoom(zoom));
        }

        Ok(Generator {
            plane: PlaneMapper::new(width, height, center, zoom),
            workers,
            iterations,
            framebuffer: RgbaImage::new(width as u32, height as u32),
        })
    }

    /// The mapping between this render's pixels and the complex plane.
    pub fn mapper(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Number of workers each call to `generate` uses.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The iteration cap handed to the point function.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The framebuffer.  Fully black and transparent until the first
    /// successful call to `generate`.
    pub fn framebuffer(&self) -> &RgbaImage {
        &self.framebuffer
    }

    /// Give up the generator, keeping its framebuffer.
    pub fn into_framebuffer(self) -> RgbaImage {
        self.framebuffer
    }

    /// Render every pixel of the framebuffer, taking `samples` x
    /// `samples` samples per pixel.  Blocks until every worker is
    /// finished.  If any worker panics the render as a whole fails, and
    /// the framebuffer is left in an unspecified state.
    ///
    /// While the workers run, each pixel is held in a worker's hand as
    /// an (index, `&mut` pixel) pair, 16 bytes of bookkeeping on top of
    /// the 4 bytes of the pixel itself on 64-bit targets.  An 8192 x
    /// 8192 render needs about 1 GiB of it.
    pub fn generate<F>(&mut self, point_fn: &F, samples: usize) -> Result<(), RenderError>
    where
        F: PointFunction + ?Sized,
    {
        if samples == 0 {
            return Err(RenderError::NoSamples);
        }

        info!(
            "Generating {}x{} at {} (zoom {}), {} samples per pixel, {} workers",
            self.plane.width,
            self.plane.height,
            self.plane.center,
            self.plane.zoom,
            samples * samples,
            self.workers
        );
        let started = Instant::now();

        let plane = &self.plane;
        let iterations = self.iterations;
        let hands = deal(self.framebuffer.pixels_mut().enumerate(), self.workers);

        crossbeam::scope(|spawner| {
            for (rank, hand) in hands.into_iter().enumerate() {
                spawner.spawn(move |_| {
                    render_hand(plane, point_fn, iterations, samples, hand);
                    debug!("Worker {} done.", rank);
                });
            }
        })
        .map_err(|_| {
            error!("A worker panicked, abandoning the render");
            RenderError::WorkerPanicked
        })?;

        let elapsed = started.elapsed();
        info!(
            "Generated {} pixels in {}.{:03}s",
            plane.len(),
            elapsed.as_secs(),
            elapsed.subsec_millis()
        );
        Ok(())
    }
}

/// The body of a single worker.  The offsets table is the worker's
/// own; nothing here is shared but read-only state.
fn render_hand<F>(
    plane: &PlaneMapper,
    point_fn: &F,
    iterations: usize,
    samples: usize,
    hand: Vec<(usize, &mut Rgba<u8>)>,
) where
    F: PointFunction + ?Sized,
{
    let offsets = sample_offsets(samples);
    let samples_squared = (samples * samples) as f64;

    for (i, pixel) in hand {
        let x = (i % plane.width) as f64;
        let y = (i / plane.width) as f64;

        // Summed, then divided once, so that a pixel whose samples all
        // agree comes out exactly equal to them.
        let mut sum = [0.0_f64; 4];
        for (ox, oy) in iproduct!(offsets.iter(), offsets.iter()) {
            let Rgba(channels) = point_fn.sample(plane.pixel_to_point(x + ox, y + oy), iterations);
            for (total, channel) in sum.iter_mut().zip(channels.iter()) {
                *total += channel;
            }
        }

        *pixel = Rgba([
            to_channel(sum[0] / samples_squared),
            to_channel(sum[1] / samples_squared),
            to_channel(sum[2] / samples_squared),
            to_channel(sum[3] / samples_squared),
        ]);
    }
}
