//! Rendered connector paths: reading SVG `d` strings and locating points by
//! arc length.
//!
//! Parsing, segment evaluation and arc-length solving are `kurbo`'s. A
//! connector is drawn as one continuous stroke, so only single-subpath data is
//! accepted. Elliptical arcs come back from the parser as cubics.

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, ParamCurveDeriv, PathEl, PathSeg, Point, Vec2};

use crate::consts::MIN_PATH_LENGTH;

/// Errors produced while reading or measuring path data.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PathError {
    #[error("malformed path data: {0}")]
    Syntax(String),

    #[error("path must start with a move command")]
    MissingStart,

    #[error("path has more than one subpath")]
    Discontinuous,

    #[error("path has no measurable length")]
    Degenerate,
}

/// Parse a rendered `d` string into a single-subpath [`BezPath`].
///
/// # Errors
///
/// `Syntax` for anything the SVG grammar rejects, `MissingStart` when the data
/// does not open with a move, `Discontinuous` for a second subpath.
pub fn parse(input: &str) -> Result<BezPath, PathError> {
    let path = BezPath::from_svg(input).map_err(|e| PathError::Syntax(e.to_string()))?;
    let Some((PathEl::MoveTo(_), rest)) = path.elements().split_first() else {
        return Err(PathError::MissingStart);
    };
    if rest.iter().any(|el| matches!(el, PathEl::MoveTo(_))) {
        return Err(PathError::Discontinuous);
    }
    Ok(path)
}

/// Serialize `elements` as a `d` string, coordinates rounded to 3 decimals.
pub fn to_svg(elements: impl IntoIterator<Item = PathEl>) -> String {
    elements.into_iter().map(round_element).collect::<BezPath>().to_svg()
}

fn round_element(el: PathEl) -> PathEl {
    match el {
        PathEl::MoveTo(p) => PathEl::MoveTo(round3(p)),
        PathEl::LineTo(p) => PathEl::LineTo(round3(p)),
        PathEl::QuadTo(c, p) => PathEl::QuadTo(round3(c), round3(p)),
        PathEl::CurveTo(c1, c2, p) => PathEl::CurveTo(round3(c1), round3(c2), round3(p)),
        PathEl::ClosePath => PathEl::ClosePath,
    }
}

fn round3(p: Point) -> Point {
    Point::new(round_coord(p.x), round_coord(p.y))
}

fn round_coord(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    // No "-0" in output.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Where an arc-length sample landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLocation {
    /// Index into [`BezPath::elements`] of the element drawing `segment`.
    pub element: usize,
    pub segment: PathSeg,
    /// Curve parameter within `segment`.
    pub t: f64,
    pub point: Point,
}

impl PathLocation {
    /// Direction of travel at the sample, unnormalized.
    #[must_use]
    pub fn tangent(&self) -> Vec2 {
        match self.segment {
            PathSeg::Line(line) => line.p1 - line.p0,
            PathSeg::Quad(quad) => quad.deriv().eval(self.t).to_vec2(),
            PathSeg::Cubic(cubic) => cubic.deriv().eval(self.t).to_vec2(),
        }
    }
}

/// The drawable segments of a path with their cumulative arc lengths.
#[derive(Debug, Clone)]
pub struct ArcIndex {
    segments: Vec<(usize, PathSeg)>,
    ends: Vec<f64>,
    accuracy: f64,
}

impl ArcIndex {
    /// Measure every segment of `path` to within `accuracy`.
    ///
    /// # Errors
    ///
    /// `Degenerate` when the total length is not finite or too small to sample.
    pub fn new(path: &BezPath, accuracy: f64) -> Result<Self, PathError> {
        // Element 0 is the move; a close draws its return line when it has one.
        let segments: Vec<(usize, PathSeg)> =
            (1..path.elements().len()).filter_map(|ix| Some((ix, path.get_seg(ix)?))).collect();
        let mut total = 0.0;
        let ends = segments
            .iter()
            .map(|(_, seg)| {
                total += seg.arclen(accuracy);
                total
            })
            .collect();
        if !total.is_finite() || total <= MIN_PATH_LENGTH {
            return Err(PathError::Degenerate);
        }
        Ok(Self { segments, ends, accuracy })
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    /// Location at `pct` percent of the total length, clamped to the path.
    #[must_use]
    pub fn at_percent(&self, pct: f64) -> PathLocation {
        self.at_length(self.total() * pct / 100.0)
    }

    /// Location `target` units along the path, clamped to the path.
    ///
    /// A sample exactly on a joint lands at the end of the earlier segment.
    #[must_use]
    pub fn at_length(&self, target: f64) -> PathLocation {
        let target = target.clamp(0.0, self.total());
        let ix = self
            .ends
            .iter()
            .position(|&end| end >= target)
            .unwrap_or(self.ends.len().saturating_sub(1));
        let (element, segment) = self.segments[ix];
        let start = if ix == 0 { 0.0 } else { self.ends[ix - 1] };
        let t = if self.ends[ix] > start {
            segment.inv_arclen(target - start, self.accuracy).clamp(0.0, 1.0)
        } else {
            0.0
        };
        PathLocation { element, segment, t, point: segment.eval(t) }
    }
}
