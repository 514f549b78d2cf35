//! Geometric primitives and the page view coordinate transform.
//!
//! Two coordinate spaces meet here. Document space is the native point-based
//! space of a page: y grows upward and rectangles carry explicit
//! top/left/bottom/right edges. Device space is the pixel space of a rendered
//! page view: the origin sits at the top-left corner and y grows downward.
//! A [`PageView`] relates the two through the affine transform implied by a
//! zoom factor and a display rotation.

use serde::Serialize;

use crate::error::{Error, Result};

/// A rectangle in document space (points, y-up).
///
/// Field order matches the wire shape emitted by the extractors:
/// `{top, left, bottom, right}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PdfRect {
    /// Top edge (largest y)
    pub top: f64,
    /// Left edge (smallest x)
    pub left: f64,
    /// Bottom edge (smallest y)
    pub bottom: f64,
    /// Right edge (largest x)
    pub right: f64,
}

impl PdfRect {
    /// Create a rectangle from its four edges.
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Width of the rectangle in points.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the rectangle in points.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// A rectangle in device space (pixels, y-down, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevRect {
    /// Left edge (smallest x)
    pub left: f64,
    /// Top edge (smallest y)
    pub top: f64,
    /// Right edge (largest x)
    pub right: f64,
    /// Bottom edge (largest y)
    pub bottom: f64,
}

impl DevRect {
    /// Create a rectangle from its four edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from its top-left corner and dimensions.
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// True for the all-zero rectangle, which callers use as a
    /// "whole page" sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }
}

/// Display rotation of a page view, in quarter turns clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Upright
    None,
    /// Rotated 90 degrees clockwise
    Clockwise90,
    /// Rotated 180 degrees
    UpsideDown,
    /// Rotated 270 degrees clockwise
    Clockwise270,
}

impl Rotation {
    /// Parse a rotation from degrees. Any multiple of 90 is accepted,
    /// including negative values; other angles return `None`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::None),
            90 => Some(Self::Clockwise90),
            180 => Some(Self::UpsideDown),
            270 => Some(Self::Clockwise270),
            _ => None,
        }
    }

    /// Rotation in degrees, normalized to 0..360.
    pub fn degrees(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::UpsideDown => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// Whether this rotation swaps the page's width and height on screen.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Clockwise90 | Self::Clockwise270)
    }
}

/// A 2D affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scale
    pub a: f64,
    /// Vertical shear
    pub b: f64,
    /// Horizontal shear
    pub c: f64,
    /// Vertical scale
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Apply the transform to a point.
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Compute the inverse transform, if one exists.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Matrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

/// A page view: the affine mapping between one page's document space and the
/// device space of its rendered image at a given zoom and rotation.
///
/// A view is a snapshot of `(page box, zoom, rotation)`. It must be
/// constructed fresh whenever zoom or rotation changes; holding a view across
/// parameter changes yields stale transforms.
#[derive(Debug, Clone)]
pub struct PageView {
    page_box: PdfRect,
    zoom: f64,
    rotation: Rotation,
    to_device: Matrix,
    to_page: Matrix,
}

impl PageView {
    /// Build a view of `page_box` at `zoom` (device pixels per point) and
    /// `rotation`.
    ///
    /// Fails when the zoom is non-positive or non-finite, or when the page
    /// box is degenerate, since either would make the transform
    /// non-invertible.
    pub fn new(page_box: PdfRect, zoom: f64, rotation: Rotation) -> Result<Self> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(Error::InvalidPageView(format!("zoom factor {}", zoom)));
        }
        if page_box.width() <= 0.0 || page_box.height() <= 0.0 {
            return Err(Error::InvalidPageView(format!(
                "degenerate page box {:?}",
                page_box
            )));
        }

        let to_device = Self::device_matrix(&page_box, zoom, rotation);
        let to_page = to_device
            .invert()
            .ok_or_else(|| Error::InvalidPageView("transform is singular".to_string()))?;

        Ok(Self {
            page_box,
            zoom,
            rotation,
            to_device,
            to_page,
        })
    }

    // Maps the page box to a device canvas with its top-left corner at the
    // origin. The upright case flips y; rotated cases permute axes so the
    // canvas origin always lands on the displayed top-left page corner.
    fn device_matrix(page_box: &PdfRect, zoom: f64, rotation: Rotation) -> Matrix {
        let z = zoom;
        match rotation {
            Rotation::None => Matrix {
                a: z,
                b: 0.0,
                c: 0.0,
                d: -z,
                e: -z * page_box.left,
                f: z * page_box.top,
            },
            Rotation::Clockwise90 => Matrix {
                a: 0.0,
                b: z,
                c: z,
                d: 0.0,
                e: -z * page_box.bottom,
                f: -z * page_box.left,
            },
            Rotation::UpsideDown => Matrix {
                a: -z,
                b: 0.0,
                c: 0.0,
                d: z,
                e: z * page_box.right,
                f: -z * page_box.bottom,
            },
            Rotation::Clockwise270 => Matrix {
                a: 0.0,
                b: -z,
                c: -z,
                d: 0.0,
                e: z * page_box.top,
                f: z * page_box.right,
            },
        }
    }

    /// The zoom factor this view was built with.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The rotation this view was built with.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Width of the rendered view in device pixels.
    pub fn device_width(&self) -> f64 {
        if self.rotation.swaps_axes() {
            self.page_box.height() * self.zoom
        } else {
            self.page_box.width() * self.zoom
        }
    }

    /// Height of the rendered view in device pixels.
    pub fn device_height(&self) -> f64 {
        if self.rotation.swaps_axes() {
            self.page_box.width() * self.zoom
        } else {
            self.page_box.height() * self.zoom
        }
    }

    /// Convert a device-space rectangle into document space.
    ///
    /// The all-zero rectangle is the "whole page" sentinel and returns the
    /// page box without going through the transform.
    pub fn rect_to_page(&self, rect: &DevRect) -> PdfRect {
        if rect.is_sentinel() {
            return self.page_box;
        }
        let corners = [
            self.to_page.transform_point(rect.left, rect.top),
            self.to_page.transform_point(rect.right, rect.top),
            self.to_page.transform_point(rect.left, rect.bottom),
            self.to_page.transform_point(rect.right, rect.bottom),
        ];
        let first = corners[0];
        let (min_x, max_x) = corners
            .iter()
            .map(|(x, _)| *x)
            .fold((first.0, first.0), |(lo, hi), x| (lo.min(x), hi.max(x)));
        let (min_y, max_y) = corners
            .iter()
            .map(|(_, y)| *y)
            .fold((first.1, first.1), |(lo, hi), y| (lo.min(y), hi.max(y)));
        PdfRect {
            top: max_y,
            left: min_x,
            bottom: min_y,
            right: max_x,
        }
    }

    /// Convert a document-space rectangle into device space.
    pub fn rect_to_device(&self, rect: &PdfRect) -> DevRect {
        let corners = [
            self.to_device.transform_point(rect.left, rect.top),
            self.to_device.transform_point(rect.right, rect.top),
            self.to_device.transform_point(rect.left, rect.bottom),
            self.to_device.transform_point(rect.right, rect.bottom),
        ];
        let first = corners[0];
        let (min_x, max_x) = corners
            .iter()
            .map(|(x, _)| *x)
            .fold((first.0, first.0), |(lo, hi), x| (lo.min(x), hi.max(x)));
        let (min_y, max_y) = corners
            .iter()
            .map(|(_, y)| *y)
            .fold((first.1, first.1), |(lo, hi), y| (lo.min(y), hi.max(y)));
        DevRect {
            left: min_x,
            top: min_y,
            right: max_x,
            bottom: max_y,
        }
    }
}
