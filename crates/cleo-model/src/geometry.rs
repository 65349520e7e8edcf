//! Rectilinear gridbox geometry.
//!
//! Gridboxes are indexed with z fastest, then x, then y:
//! `gbxindex = k + nz * (i + nx * j)` for cell `k` along z, `i` along x and
//! `j` along y.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Spatial axis. CLEO numbers them z = 3, x = 1, y = 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Z,
    X,
    Y,
}

impl Axis {
    /// Axes in storage order.
    pub const ALL: [Axis; 3] = [Self::Z, Self::X, Self::Y];

    /// Position of the axis in `[z, x, y]` arrays.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Z => 0,
            Self::X => 1,
            Self::Y => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Z => "z",
            Self::X => "x",
            Self::Y => "y",
        }
    }

    /// Name of the half-coordinate array for this axis.
    #[must_use]
    pub const fn halfcoord_name(self) -> &'static str {
        match self {
            Self::Z => "zhalf",
            Self::X => "xhalf",
            Self::Y => "yhalf",
        }
    }

    /// Name of the superdroplet coordinate along this axis.
    #[must_use]
    pub const fn coord_name(self) -> &'static str {
        match self {
            Self::Z => "coord3",
            Self::X => "coord1",
            Self::Y => "coord2",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounds of one gridbox, as `[z, x, y]` lower and upper corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridboxBounds {
    pub lower: [f64; 3],
    pub upper: [f64; 3],
}

impl GridboxBounds {
    /// `[zmin, zmax, xmin, xmax, ymin, ymax]`, the on-disk layout.
    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.lower[0],
            self.upper[0],
            self.lower[1],
            self.upper[1],
            self.lower[2],
            self.upper[2],
        ]
    }

    /// Inverse of [`GridboxBounds::to_array`].
    #[must_use]
    pub fn from_array(b: [f64; 6]) -> Self {
        Self {
            lower: [b[0], b[2], b[4]],
            upper: [b[1], b[3], b[5]],
        }
    }

    /// True when `lower <= coord < upper` along `axis`.
    #[must_use]
    pub fn contains(&self, axis: Axis, coord: f64) -> bool {
        let p = axis.position();
        self.lower[p] <= coord && coord < self.upper[p]
    }

    /// Width along `axis`.
    #[must_use]
    pub fn width(&self, axis: Axis) -> f64 {
        let p = axis.position();
        self.upper[p] - self.lower[p]
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        Axis::ALL.into_iter().map(|a| self.width(a)).product()
    }

    #[must_use]
    pub fn centre(&self) -> [f64; 3] {
        [0, 1, 2].map(|p| (self.lower[p] + self.upper[p]) / 2.0)
    }
}

/// Coordinates of a list of points, one array per axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateArrays {
    pub z: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CoordinateArrays {
    fn with_capacity(n: usize) -> Self {
        Self {
            z: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, z: f64, x: f64, y: f64) {
        self.z.push(z);
        self.x.push(x);
        self.y.push(y);
    }

    /// Coordinates along `axis`.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Z => &self.z,
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.z.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
}

/// Half-coordinates (cell boundaries) of a rectilinear domain, in metres.
///
/// Immutable once built; every axis has at least one cell and strictly
/// increasing boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HalfCoords", into = "HalfCoords")]
pub struct DomainGeometry {
    halfcoords: [Vec<f64>; 3],
}

#[derive(Serialize, Deserialize)]
struct HalfCoords {
    zhalf: Vec<f64>,
    xhalf: Vec<f64>,
    yhalf: Vec<f64>,
}

impl TryFrom<HalfCoords> for DomainGeometry {
    type Error = ModelError;

    fn try_from(h: HalfCoords) -> Result<Self> {
        Self::new(h.zhalf, h.xhalf, h.yhalf)
    }
}

impl From<DomainGeometry> for HalfCoords {
    fn from(g: DomainGeometry) -> Self {
        let [zhalf, xhalf, yhalf] = g.halfcoords;
        Self {
            zhalf,
            xhalf,
            yhalf,
        }
    }
}

impl DomainGeometry {
    /// Build a geometry from per-axis half-coordinates.
    pub fn new(zhalf: Vec<f64>, xhalf: Vec<f64>, yhalf: Vec<f64>) -> Result<Self> {
        let halfcoords = [zhalf, xhalf, yhalf];
        for axis in Axis::ALL {
            check_halfcoords(axis, &halfcoords[axis.position()])?;
        }
        Ok(Self { halfcoords })
    }

    /// Cell boundaries along `axis`.
    #[must_use]
    pub fn halfcoords(&self, axis: Axis) -> &[f64] {
        &self.halfcoords[axis.position()]
    }

    /// Cell centres along `axis`.
    #[must_use]
    pub fn fullcoords(&self, axis: Axis) -> Vec<f64> {
        self.halfcoords(axis)
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0)
            .collect()
    }

    /// Number of cells along `axis`.
    #[must_use]
    pub fn ncells(&self, axis: Axis) -> usize {
        self.halfcoords(axis).len() - 1
    }

    /// Number of cells along `[z, x, y]`.
    #[must_use]
    pub fn ndims(&self) -> [usize; 3] {
        Axis::ALL.map(|a| self.ncells(a))
    }

    #[must_use]
    pub fn ngridboxes(&self) -> usize {
        self.ndims().iter().product()
    }

    /// Lower corner of the domain, `[z, x, y]`.
    #[must_use]
    pub fn origin(&self) -> [f64; 3] {
        Axis::ALL.map(|a| self.halfcoords(a)[0])
    }

    /// Upper corner of the domain, `[z, x, y]`.
    #[must_use]
    pub fn upper_corner(&self) -> [f64; 3] {
        Axis::ALL.map(|a| self.halfcoords(a)[self.ncells(a)])
    }

    /// Gridbox index of cell `(k, i, j)`.
    #[must_use]
    pub fn gbxindex(&self, k: usize, i: usize, j: usize) -> usize {
        let [nz, nx, _] = self.ndims();
        k + nz * (i + nx * j)
    }

    /// Cell `(k, i, j)` of a gridbox index.
    pub fn cell(&self, gbxindex: usize) -> Result<(usize, usize, usize)> {
        let ngridboxes = self.ngridboxes();
        if gbxindex >= ngridboxes {
            return Err(ModelError::GridboxOutOfRange {
                index: gbxindex,
                ngridboxes,
            });
        }
        let [nz, nx, _] = self.ndims();
        Ok((gbxindex % nz, (gbxindex / nz) % nx, gbxindex / (nz * nx)))
    }

    /// Bounds of one gridbox.
    pub fn gridbox_bounds(&self, gbxindex: usize) -> Result<GridboxBounds> {
        let (k, i, j) = self.cell(gbxindex)?;
        let cells = [k, i, j];
        Ok(GridboxBounds {
            lower: Axis::ALL.map(|a| self.halfcoords(a)[cells[a.position()]]),
            upper: Axis::ALL.map(|a| self.halfcoords(a)[cells[a.position()] + 1]),
        })
    }

    /// Bounds of every gridbox, in index order.
    #[must_use]
    pub fn all_bounds(&self) -> Vec<GridboxBounds> {
        let [zh, xh, yh] = &self.halfcoords;
        let mut bounds = Vec::with_capacity(self.ngridboxes());
        for y in yh.windows(2) {
            for x in xh.windows(2) {
                for z in zh.windows(2) {
                    bounds.push(GridboxBounds {
                        lower: [z[0], x[0], y[0]],
                        upper: [z[1], x[1], y[1]],
                    });
                }
            }
        }
        bounds
    }

    /// Gridbox volumes in index order.
    #[must_use]
    pub fn volumes(&self) -> Vec<f64> {
        self.all_bounds().iter().map(GridboxBounds::volume).collect()
    }

    /// Total domain volume.
    #[must_use]
    pub fn domain_volume(&self) -> f64 {
        Axis::ALL
            .into_iter()
            .map(|a| {
                let h = self.halfcoords(a);
                h[h.len() - 1] - h[0]
            })
            .product()
    }

    /// Gridbox centres in index order.
    #[must_use]
    pub fn centres(&self) -> CoordinateArrays {
        let [zf, xf, yf] = Axis::ALL.map(|a| self.fullcoords(a));
        let mut out = CoordinateArrays::with_capacity(self.ngridboxes());
        for &y in &yf {
            for &x in &xf {
                for &z in &zf {
                    out.push(z, x, y);
                }
            }
        }
        out
    }

    /// Number of faces normal to `axis`: one more than cells along `axis`.
    #[must_use]
    pub fn nfaces(&self, axis: Axis) -> usize {
        let mut n = self.ndims();
        n[axis.position()] += 1;
        n.iter().product()
    }

    /// Centres of the faces normal to `axis`.
    ///
    /// Ordered like gridboxes (y outermost, z innermost) with the staggered
    /// axis running over half-coordinates instead of cell centres.
    #[must_use]
    pub fn face_coords(&self, axis: Axis) -> CoordinateArrays {
        let along = |a: Axis| {
            if a == axis {
                self.halfcoords(a).to_vec()
            } else {
                self.fullcoords(a)
            }
        };
        let (zs, xs, ys) = (along(Axis::Z), along(Axis::X), along(Axis::Y));
        let mut out = CoordinateArrays::with_capacity(self.nfaces(axis));
        for &y in &ys {
            for &x in &xs {
                for &z in &zs {
                    out.push(z, x, y);
                }
            }
        }
        out
    }

    /// Gridbox containing the point `[z, x, y]`, if it lies in the domain.
    #[must_use]
    pub fn locate(&self, point: [f64; 3]) -> Option<usize> {
        let mut cells = [0_usize; 3];
        for axis in Axis::ALL {
            let h = self.halfcoords(axis);
            let c = point[axis.position()];
            if !(h[0] <= c && c < h[h.len() - 1]) {
                return None;
            }
            // first boundary strictly above c, minus one
            cells[axis.position()] = h.partition_point(|&b| b <= c) - 1;
        }
        Some(self.gbxindex(cells[0], cells[1], cells[2]))
    }
}

fn check_halfcoords(axis: Axis, h: &[f64]) -> Result<()> {
    if h.len() < 2 {
        return Err(ModelError::invalid_geometry(
            axis,
            format!("need at least 2 boundaries, found {}", h.len()),
        ));
    }
    if let Some(bad) = h.iter().find(|v| !v.is_finite()) {
        return Err(ModelError::invalid_geometry(
            axis,
            format!("boundary {bad} is not finite"),
        ));
    }
    if let Some(pos) = h.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ModelError::invalid_geometry(
            axis,
            format!(
                "boundaries not strictly increasing at index {}: {} <= {}",
                pos + 1,
                h[pos + 1],
                h[pos]
            ),
        ));
    }
    Ok(())
}
