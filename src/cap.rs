//! Cap annotator: splice a small rounded notch into a rendered connector path.
//!
//! Three points are sampled by arc length around the cap position (by default
//! 48 %, 50 % and 52 % of the path). Everything before the first sample is
//! kept, the stretch between the outer samples is replaced by two cubics that
//! bulge out along the chord normal, and the path resumes after the last
//! sample. Only the rendered path string changes; entity geometry is left
//! alone.

#[cfg(test)]
#[path = "cap_test.rs"]
mod cap_test;

use kurbo::{ParamCurve, PathEl, PathSeg, Point, Vec2};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::consts::MIN_PATH_LENGTH;
use crate::path::{ArcIndex, PathError, PathLocation, parse, to_svg};
use crate::scene::SceneAccessor;

/// Rewrite `path` with a cap centred at `cap_point_pct` percent of its length,
/// spanning `delta_pct` percent on either side.
///
/// # Errors
///
/// Whatever [`parse`] rejects, or `Degenerate` when the path is too short for
/// the rounded sample points to be distinct.
pub fn add_cap(path: &str, cap_point_pct: f64, delta_pct: f64, accuracy: f64) -> Result<String, PathError> {
    let parsed = parse(path)?;
    let index = ArcIndex::new(&parsed, accuracy)?;
    let capped = splice_cap(parsed.elements(), &index, cap_point_pct, delta_pct)?;
    Ok(to_svg(capped))
}

fn splice_cap(
    elements: &[PathEl],
    index: &ArcIndex,
    cap_point_pct: f64,
    delta_pct: f64,
) -> Result<Vec<PathEl>, PathError> {
    let head = index.at_percent(cap_point_pct - delta_pct);
    let mid = index.at_percent(cap_point_pct);
    let tail = index.at_percent(cap_point_pct + delta_pct);
    let (p_before, p_center, p_after) = (head.point.round(), mid.point.round(), tail.point.round());
    if p_before == p_center && p_center == p_after {
        return Err(PathError::Degenerate);
    }
    let span = index.total() * 2.0 * delta_pct / 100.0;
    let offset = bulge(p_before, p_after, &mid, span).ok_or(PathError::Degenerate)?;

    // Everything before the element holding the head sample, move included.
    let mut out = elements[..head.element].to_vec();

    let before = head.segment.subsegment(0.0..head.t);
    if !is_point_like(before) || before.start() != p_before {
        out.push(ending_at(before, p_before));
    }

    out.push(PathEl::CurveTo(p_before + offset, p_center + offset, p_center));
    out.push(PathEl::CurveTo(p_center + offset, p_after + offset, p_after));

    let after = tail.segment.subsegment(tail.t..1.0);
    if elements[tail.element] == PathEl::ClosePath {
        out.push(PathEl::ClosePath);
    } else if !is_point_like(after) {
        out.push(ending_at(after, after.end()));
    }
    out.extend_from_slice(&elements[tail.element + 1..]);
    Ok(out)
}

/// Control-point offset: the left-hand normal of the chord from the first to
/// the last sample, half the chord long. When the chord collapses (a hairpin
/// or a closed loop) the tangent at the centre sample stands in, sized to the
/// arc-length `span` of the window.
fn bulge(p_before: Point, p_after: Point, mid: &PathLocation, span: f64) -> Option<Vec2> {
    let chord = p_after - p_before;
    if chord.x.hypot(chord.y) > MIN_PATH_LENGTH {
        return Some(Vec2::new(-chord.y, chord.x) * 0.5);
    }
    let tangent = mid.tangent();
    let len = tangent.x.hypot(tangent.y);
    if !len.is_finite() || len <= MIN_PATH_LENGTH {
        return None;
    }
    Some(Vec2::new(-tangent.y, tangent.x) * (0.5 * span / len))
}

/// The element drawing `seg` from the current point, with its end moved to `end`.
fn ending_at(seg: PathSeg, end: Point) -> PathEl {
    match seg {
        PathSeg::Line(_) => PathEl::LineTo(end),
        PathSeg::Quad(quad) => PathEl::QuadTo(quad.p1, end),
        PathSeg::Cubic(cubic) => PathEl::CurveTo(cubic.p1, cubic.p2, end),
    }
}

fn is_point_like(seg: PathSeg) -> bool {
    match seg {
        PathSeg::Line(line) => line.p0 == line.p1,
        PathSeg::Quad(quad) => quad.p0 == quad.p1 && quad.p1 == quad.p2,
        PathSeg::Cubic(cubic) => cubic.p0 == cubic.p1 && cubic.p1 == cubic.p2 && cubic.p2 == cubic.p3,
    }
}

/// Add a cap to every selected connector that has a rendered path.
/// Returns how many paths were rewritten.
pub fn add_caps_selection(host: &mut impl SceneAccessor, config: &EngineConfig) -> usize {
    let mut count = 0;
    for id in host.selection() {
        let Some(entity) = host.entity(&id) else {
            continue;
        };
        if !entity.kind.is_connector() {
            continue;
        }
        let Some(path) = host.rendered_path(&id) else {
            debug!(%id, "cap skipped: connector has no rendered path");
            continue;
        };
        match add_cap(&path, config.cap_point_pct, config.cap_delta_pct, config.arc_accuracy) {
            Ok(capped) => {
                host.set_rendered_path(&id, capped);
                count += 1;
            }
            Err(PathError::Degenerate) => {
                debug!(%id, "cap skipped: path too short");
            }
            Err(e) => {
                warn!(%id, error = %e, "cap skipped: unreadable path");
            }
        }
    }
    if count > 0 {
        info!(count, "connector caps added");
    }
    count
}
