// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which maps a rectangle on the
//! integral plane with an origin at the top-left corner onto a region
//! of the complex plane described by a center point and a zoom factor.
use num::Complex;

/// Maps pixel positions onto the complex plane.  The shorter
/// of the two image dimensions always spans a length of 2 on the
/// complex plane at a zoom of 1; the longer one spans proportionally
/// more, so pixels stay square.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    /// Width of the integral plane, in pixels.
    pub width: usize,
    /// Height of the integral plane, in pixels.
    pub height: usize,
    /// The point on the complex plane that lands on the center of the
    /// image.
    pub center: Complex<f64>,
    /// Larger is closer.
    pub zoom: f64,
    // The smaller of width and height, as a float.  Fixed at
    // construction.
    scale: f64,
}

impl PlaneMapper {
    /// Constructor.  Performs no validation; the Generator checks its
    /// parameters before building one of these.
    pub fn new(width: usize, height: usize, center: Complex<f64>, zoom: f64) -> PlaneMapper {
        let scale = width.min(height) as f64;
        PlaneMapper {
            width,
            height,
            center,
            zoom,
            scale,
        }
    }

    /// The length, in pixels, of a span of 2 on the complex plane at
    /// a zoom of 1.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The size of one pixel on the complex plane.
    #[inline]
    pub fn step(&self) -> f64 {
        (2.0 / self.scale) / self.zoom
    }

    /// Given a position on the integral plane, possibly between pixels,
    /// return the complex number at the equivalent location.
    #[inline]
    pub fn pixel_to_point(&self, x: f64, y: f64) -> Complex<f64> {
        let step = self.step();
        Complex::new(
            (x - (self.width as f64) / 2.0) * step + self.center.re,
            (y - (self.height as f64) / 2.0) * step + self.center.im,
        )
    }

    /// The complex coordinates of the top-left and bottom-right
    /// corners of the image.
    pub fn bounds(&self) -> (Complex<f64>, Complex<f64>) {
        (
            self.pixel_to_point(0.0, 0.0),
            self.pixel_to_point(self.width as f64, self.height as f64),
        )
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(i: Complex<f64>, j: Complex<f64>) -> f64 {
        (i - j).norm()
    }

    #[test]
    fn scale_is_the_shorter_side() {
        assert_eq!(PlaneMapper::new(640, 480, Complex::new(0.0, 0.0), 1.0).scale(), 480.0);
        assert_eq!(PlaneMapper::new(300, 900, Complex::new(0.0, 0.0), 1.0).scale(), 300.0);
        assert_eq!(PlaneMapper::new(4, 4, Complex::new(0.0, 0.0), 1.0).scale(), 4.0);
    }

    #[test]
    fn center_pixel_maps_to_center_point() {
        for zoom in &[0.25, 1.0, 3.0, 1.0e9] {
            let center = Complex::new(-0.743_643_887, 0.131_825_904);
            let pm = PlaneMapper::new(801, 600, center, *zoom);
            assert_eq!(pm.pixel_to_point(801.0 / 2.0, 300.0), center);
        }
    }

    #[test]
    fn pixel_to_point_on_small_square() {
        let pm = PlaneMapper::new(4, 4, Complex::new(0.0, 0.0), 1.0);
        assert_eq!(pm.pixel_to_point(0.0, 0.0), Complex::new(-1.0, -1.0));
        assert_eq!(pm.pixel_to_point(2.0, 2.0), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(4.0, 4.0), Complex::new(1.0, 1.0));
        assert_eq!(pm.pixel_to_point(2.5, 2.5), Complex::new(0.25, 0.25));
    }

    #[test]
    fn wide_planes_span_two_units_vertically() {
        let pm = PlaneMapper::new(800, 400, Complex::new(1.0, 1.0), 1.0);
        let (ul, lr) = pm.bounds();
        assert_eq!(ul, Complex::new(-1.0, 0.0));
        assert_eq!(lr, Complex::new(3.0, 2.0));
    }

    #[test]
    fn doubling_zoom_halves_distance() {
        let center = Complex::new(0.3, -0.2);
        let near = PlaneMapper::new(640, 480, center, 2.0);
        let far = PlaneMapper::new(640, 480, center, 4.0);
        let span = near.scale();
        let d_near = dist(near.pixel_to_point(10.0, 10.0), near.pixel_to_point(10.0 + span, 10.0));
        let d_far = dist(far.pixel_to_point(10.0, 10.0), far.pixel_to_point(10.0 + span, 10.0));
        assert!((d_near - 1.0).abs() < 1e-12);
        assert!((d_far - d_near / 2.0).abs() < 1e-12);
    }

    #[test]
    fn length_counts_pixels() {
        assert_eq!(PlaneMapper::new(3, 4, Complex::new(0.0, 0.0), 1.0).len(), 12);
    }
}
