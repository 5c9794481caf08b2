//! Board geometry: polygonization of copper items, outline assembly and the
//! boolean isolation computation.
//!
//! All geometry here is in millimeters on the file's y-down axis; conversion
//! from internal units happens at this boundary. Polygon booleans and unions
//! are delegated to the `geo` crate.

use geo::{Area, BooleanOps, Contains, Coord, LineString, MultiPolygon, Polygon, coord};

use crate::kicad::{
    Board, Footprint, GraphicShape, Pad, PadShape, Point, Track, TrackArc, Via, ZoneFill, to_mm,
};

/// Segment count for full-circle approximation (KiCad itself emits polygonal
/// circles; 32 matches the fidelity of its via openings).
pub const CIRCLE_SEGMENTS: usize = 32;

/// Endpoint snap tolerance when chaining outline segments, in mm.
const CHAIN_TOLERANCE: f64 = 0.01;

/// Mirror an x coordinate across a vertical axis.
pub fn mirror_x(x: f64, center_x: f64) -> f64 {
    2.0 * center_x - x
}

/// Rotation by `deg` on the y-down board axis (counterclockwise on screen).
fn rotate_deg(x: f64, y: f64, deg: f64) -> (f64, f64) {
    let (sin, cos) = deg.to_radians().sin_cos();
    (x * cos + y * sin, -x * sin + y * cos)
}

fn close_ring(mut ring: Vec<Coord<f64>>) -> LineString<f64> {
    if !ring.is_empty() && ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    LineString::from(ring)
}

fn ring_polygon(ring: Vec<Coord<f64>>) -> Polygon<f64> {
    Polygon::new(close_ring(ring), vec![])
}

fn circle_ring(cx: f64, cy: f64, r: f64, segments: usize) -> Vec<Coord<f64>> {
    (0..segments)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / segments as f64;
            coord! { x: cx + r * angle.cos(), y: cy + r * angle.sin() }
        })
        .collect()
}

pub fn circle_polygon(center: Point, radius_mm: f64) -> Polygon<f64> {
    ring_polygon(circle_ring(
        center.x_mm(),
        center.y_mm(),
        radius_mm,
        CIRCLE_SEGMENTS,
    ))
}

/// Stadium shape around the segment a-b with the given total width.
fn capsule_ring(ax: f64, ay: f64, bx: f64, by: f64, width_mm: f64) -> Vec<Coord<f64>> {
    let r = width_mm / 2.0;
    let (dx, dy) = (bx - ax, by - ay);
    if dx.hypot(dy) < 1e-9 {
        return circle_ring(ax, ay, r, CIRCLE_SEGMENTS);
    }
    let dir = dy.atan2(dx);
    let half = CIRCLE_SEGMENTS / 2;
    let mut ring = Vec::with_capacity(CIRCLE_SEGMENTS + 2);
    // cap around b, then cap around a
    for i in 0..=half {
        let angle = dir - std::f64::consts::FRAC_PI_2
            + std::f64::consts::PI * i as f64 / half as f64;
        ring.push(coord! { x: bx + r * angle.cos(), y: by + r * angle.sin() });
    }
    for i in 0..=half {
        let angle = dir + std::f64::consts::FRAC_PI_2
            + std::f64::consts::PI * i as f64 / half as f64;
        ring.push(coord! { x: ax + r * angle.cos(), y: ay + r * angle.sin() });
    }
    ring
}

pub fn track_polygon(track: &Track) -> Polygon<f64> {
    ring_polygon(capsule_ring(
        track.start.x_mm(),
        track.start.y_mm(),
        track.end.x_mm(),
        track.end.y_mm(),
        to_mm(track.width),
    ))
}

/// Circumcenter of three points, or `None` when they are collinear.
fn arc_center(
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    (x3, y3): (f64, f64),
) -> Option<(f64, f64)> {
    let d = 2.0 * (x1 * (y2 - y3) + x2 * (y3 - y1) + x3 * (y1 - y2));
    if d.abs() < 1e-9 {
        return None;
    }
    let s1 = x1 * x1 + y1 * y1;
    let s2 = x2 * x2 + y2 * y2;
    let s3 = x3 * x3 + y3 * y3;
    let cx = (s1 * (y2 - y3) + s2 * (y3 - y1) + s3 * (y1 - y2)) / d;
    let cy = (s1 * (x3 - x2) + s2 * (x1 - x3) + s3 * (x2 - x1)) / d;
    Some((cx, cy))
}

/// Tessellate a start/mid/end arc into a polyline, endpoints included.
pub(crate) fn arc_points(start: Point, mid: Point, end: Point) -> Vec<(f64, f64)> {
    let p1 = (start.x_mm(), start.y_mm());
    let p2 = (mid.x_mm(), mid.y_mm());
    let p3 = (end.x_mm(), end.y_mm());
    let Some((cx, cy)) = arc_center(p1, p2, p3) else {
        return vec![p1, p3];
    };
    let radius = (p1.0 - cx).hypot(p1.1 - cy);
    let a0 = (p1.1 - cy).atan2(p1.0 - cx);
    let am = (p2.1 - cy).atan2(p2.0 - cx);
    let a1 = (p3.1 - cy).atan2(p3.0 - cx);

    let ccw = |from: f64, to: f64| (to - from).rem_euclid(std::f64::consts::TAU);
    // pick the sweep direction that passes through the mid point
    let sweep = if ccw(a0, am) <= ccw(a0, a1) {
        ccw(a0, a1)
    } else {
        ccw(a0, a1) - std::f64::consts::TAU
    };

    let steps = ((sweep.abs() / std::f64::consts::TAU * CIRCLE_SEGMENTS as f64).ceil() as usize)
        .max(2);
    (0..=steps)
        .map(|i| {
            let angle = a0 + sweep * i as f64 / steps as f64;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// A curved track as a run of capsules along the tessellated centerline;
/// the later union pass merges them.
pub fn arc_polygons(arc: &TrackArc) -> Vec<Polygon<f64>> {
    let width = to_mm(arc.width);
    let points = arc_points(arc.start, arc.mid, arc.end);
    points
        .windows(2)
        .map(|pair| ring_polygon(capsule_ring(pair[0].0, pair[0].1, pair[1].0, pair[1].1, width)))
        .collect()
}

/// Via annular ring (outer copper diameter).
pub fn via_polygon(via: &Via) -> Polygon<f64> {
    circle_polygon(via.at, to_mm(via.size) / 2.0)
}

/// Pad copper shape in board coordinates.
pub fn pad_polygon(footprint: &Footprint, pad: &Pad) -> Polygon<f64> {
    let center = footprint.pad_position(pad);
    let (cx, cy) = (center.x_mm(), center.y_mm());
    let w = to_mm(pad.size.0);
    let h = to_mm(pad.size.1);

    let local: Vec<(f64, f64)> = match pad.shape {
        PadShape::Circle => return circle_polygon(center, w / 2.0),
        PadShape::Oval => {
            if (w - h).abs() < 1e-9 {
                return circle_polygon(center, w / 2.0);
            }
            // stadium along the longer axis
            let (r, half_len, along_x) = if w > h {
                (h / 2.0, (w - h) / 2.0, true)
            } else {
                (w / 2.0, (h - w) / 2.0, false)
            };
            let (ax, ay, bx, by) = if along_x {
                (-half_len, 0.0, half_len, 0.0)
            } else {
                (0.0, -half_len, 0.0, half_len)
            };
            capsule_ring(ax, ay, bx, by, r * 2.0)
                .into_iter()
                .map(|c| (c.x, c.y))
                .collect()
        }
        PadShape::Rect | PadShape::Trapezoid => {
            let (hw, hh) = (w / 2.0, h / 2.0);
            vec![(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        }
        PadShape::RoundRect { ratio } => rounded_rect_ring(w, h, ratio),
        // filtered during parsing
        PadShape::Custom => vec![],
    };

    let ring = local
        .into_iter()
        .map(|(x, y)| {
            let (rx, ry) = rotate_deg(x, y, pad.angle);
            coord! { x: cx + rx, y: cy + ry }
        })
        .collect();
    ring_polygon(ring)
}

fn rounded_rect_ring(w: f64, h: f64, ratio: f64) -> Vec<(f64, f64)> {
    let r = (ratio * w.min(h)).min(w.min(h) / 2.0);
    let (hw, hh) = (w / 2.0, h / 2.0);
    let quarter = CIRCLE_SEGMENTS / 4;
    // corner centers in counterclockwise order, each with its start angle
    let corners = [
        (hw - r, hh - r, 0.0),
        (-(hw - r), hh - r, std::f64::consts::FRAC_PI_2),
        (-(hw - r), -(hh - r), std::f64::consts::PI),
        (hw - r, -(hh - r), 1.5 * std::f64::consts::PI),
    ];
    let mut ring = Vec::with_capacity(4 * (quarter + 1));
    for (cx, cy, start) in corners {
        for i in 0..=quarter {
            let angle = start + std::f64::consts::FRAC_PI_2 * i as f64 / quarter as f64;
            ring.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    ring
}

pub fn zone_fill_polygon(fill: &ZoneFill) -> Polygon<f64> {
    ring_polygon(
        fill.outline
            .iter()
            .map(|p| coord! { x: p.x_mm(), y: p.y_mm() })
            .collect(),
    )
}

/// Balanced pairwise union; avoids the worst case of a linear fold.
pub fn union_all(polys: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut parts: Vec<MultiPolygon<f64>> = polys
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect();
    if parts.is_empty() {
        return MultiPolygon::new(vec![]);
    }
    while parts.len() > 1 {
        let mut merged = Vec::with_capacity(parts.len().div_ceil(2));
        let mut iter = parts.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => merged.push(a.union(&b)),
                None => merged.push(a),
            }
        }
        parts = merged;
    }
    parts.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Counts reported alongside a layer's copper, for progress output.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopperStats {
    pub tracks: usize,
    pub pads: usize,
    pub zones: usize,
}

/// All copper on one layer (tracks, track arcs, via rings, pads, zone fills),
/// unioned into a single region.
pub fn copper_on_layer(board: &Board, layer: &str) -> (MultiPolygon<f64>, CopperStats) {
    let mut polys = Vec::new();
    let mut stats = CopperStats::default();

    for track in board.tracks.iter().filter(|t| t.layer == layer) {
        polys.push(track_polygon(track));
        stats.tracks += 1;
    }
    for arc in board.arcs.iter().filter(|a| a.layer == layer) {
        polys.extend(arc_polygons(arc));
        stats.tracks += 1;
    }
    for via in board.vias.iter().filter(|v| v.layers.iter().any(|l| l == layer)) {
        polys.push(via_polygon(via));
        stats.tracks += 1;
    }
    for footprint in &board.footprints {
        for pad in footprint.pads.iter().filter(|p| p.is_on_layer(layer)) {
            polys.push(pad_polygon(footprint, pad));
            stats.pads += 1;
        }
    }
    for zone in board.zones.iter().filter(|z| z.is_on_layer(layer)) {
        polys.extend(zone.fills_on(layer).map(zone_fill_polygon));
        stats.zones += 1;
    }

    (union_all(polys), stats)
}

/// Solder mask openings for one side: pad openings, zone fills on the mask
/// layer and via annular openings.
pub fn mask_openings(board: &Board, mask_layer: &str) -> (MultiPolygon<f64>, CopperStats) {
    let mut polys = Vec::new();
    let mut stats = CopperStats::default();

    for footprint in &board.footprints {
        for pad in footprint.pads.iter().filter(|p| p.is_on_layer(mask_layer)) {
            polys.push(pad_polygon(footprint, pad));
            stats.pads += 1;
        }
    }
    for zone in board.zones.iter().filter(|z| z.is_on_layer(mask_layer)) {
        polys.extend(zone.fills_on(mask_layer).map(zone_fill_polygon));
        stats.zones += 1;
    }
    // vias need mask relief on both sides
    for via in &board.vias {
        polys.push(via_polygon(via));
        stats.tracks += 1;
    }

    (union_all(polys), stats)
}

/// The board area from `Edge.Cuts`: open segments and arcs chained into
/// closed rings, closed shapes taken as-is, contained rings demoted to holes.
pub fn board_outline(board: &Board) -> MultiPolygon<f64> {
    let mut closed: Vec<Vec<Coord<f64>>> = Vec::new();
    let mut open: Vec<Vec<Coord<f64>>> = Vec::new();

    for graphic in board.graphics_on("Edge.Cuts") {
        match &graphic.shape {
            GraphicShape::Line { start, end } => open.push(vec![
                coord! { x: start.x_mm(), y: start.y_mm() },
                coord! { x: end.x_mm(), y: end.y_mm() },
            ]),
            GraphicShape::Arc { start, mid, end } => open.push(
                arc_points(*start, *mid, *end)
                    .into_iter()
                    .map(|(x, y)| coord! { x: x, y: y })
                    .collect(),
            ),
            GraphicShape::Circle { center, end } => {
                let r = (center.x_mm() - end.x_mm()).hypot(center.y_mm() - end.y_mm());
                closed.push(circle_ring(center.x_mm(), center.y_mm(), r, CIRCLE_SEGMENTS));
            }
            GraphicShape::Rect { start, end } => {
                let (x0, y0) = (start.x_mm(), start.y_mm());
                let (x1, y1) = (end.x_mm(), end.y_mm());
                closed.push(vec![
                    coord! { x: x0, y: y0 },
                    coord! { x: x1, y: y0 },
                    coord! { x: x1, y: y1 },
                    coord! { x: x0, y: y1 },
                ]);
            }
            GraphicShape::Poly { points } => {
                closed.push(points.iter().map(|p| coord! { x: p.x_mm(), y: p.y_mm() }).collect());
            }
        }
    }

    closed.extend(chain_open_paths(open));
    assemble_rings(closed)
}

fn near(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).hypot(a.y - b.y) <= CHAIN_TOLERANCE
}

/// Greedy endpoint matching of open polylines into closed rings. Chains that
/// never close are dropped (dangling edge-cut strokes).
fn chain_open_paths(mut open: Vec<Vec<Coord<f64>>>) -> Vec<Vec<Coord<f64>>> {
    let mut rings = Vec::new();
    while let Some(mut chain) = open.pop() {
        loop {
            let tail = *chain.last().expect("chain is never empty");
            if chain.len() > 2 && near(tail, chain[0]) {
                chain.pop();
                rings.push(chain);
                break;
            }
            let next = open.iter().position(|path| {
                near(tail, path[0]) || near(tail, *path.last().expect("path is never empty"))
            });
            match next {
                Some(idx) => {
                    let mut path = open.swap_remove(idx);
                    if !near(tail, path[0]) {
                        path.reverse();
                    }
                    chain.extend(path.into_iter().skip(1));
                }
                None => break,
            }
        }
    }
    rings
}

/// Turn a flat ring set into polygons with holes: any ring contained in a
/// larger one becomes a hole of that ring.
fn assemble_rings(rings: Vec<Vec<Coord<f64>>>) -> MultiPolygon<f64> {
    let mut rings: Vec<LineString<f64>> = rings
        .into_iter()
        .filter(|r| r.len() >= 3)
        .map(close_ring)
        .collect();
    rings.sort_by(|a, b| {
        let area_a = Polygon::new(a.clone(), vec![]).unsigned_area();
        let area_b = Polygon::new(b.clone(), vec![]).unsigned_area();
        area_b.partial_cmp(&area_a).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut outers: Vec<Polygon<f64>> = Vec::new();
    for ring in rings {
        let probe = geo::Point::from(ring[0]);
        match outers.iter_mut().find(|outer| outer.contains(&probe)) {
            Some(outer) => outer.interiors_push(ring),
            None => outers.push(Polygon::new(ring, vec![])),
        }
    }
    MultiPolygon::new(outers)
}

/// `board_area - copper`: the region the laser must etch away.
pub fn isolation(board_area: &MultiPolygon<f64>, copper: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    board_area.difference(copper)
}

/// Axis-aligned bounds over everything the model carries, in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center_x(&self) -> f64 {
        self.min_x + self.width() / 2.0
    }
}

pub fn board_bbox(board: &Board) -> BoundingBox {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut grow = |x: f64, y: f64, margin: f64| {
        min_x = min_x.min(x - margin);
        min_y = min_y.min(y - margin);
        max_x = max_x.max(x + margin);
        max_y = max_y.max(y + margin);
    };

    for graphic in &board.graphics {
        let stroke = to_mm(graphic.width) / 2.0;
        match &graphic.shape {
            GraphicShape::Line { start, end } | GraphicShape::Rect { start, end } => {
                grow(start.x_mm(), start.y_mm(), stroke);
                grow(end.x_mm(), end.y_mm(), stroke);
            }
            GraphicShape::Circle { center, end } => {
                let r = (center.x_mm() - end.x_mm()).hypot(center.y_mm() - end.y_mm());
                grow(center.x_mm(), center.y_mm(), r + stroke);
            }
            GraphicShape::Arc { start, mid, end } => {
                for (x, y) in arc_points(*start, *mid, *end) {
                    grow(x, y, stroke);
                }
            }
            GraphicShape::Poly { points } => {
                for p in points {
                    grow(p.x_mm(), p.y_mm(), stroke);
                }
            }
        }
    }
    for track in &board.tracks {
        let r = to_mm(track.width) / 2.0;
        grow(track.start.x_mm(), track.start.y_mm(), r);
        grow(track.end.x_mm(), track.end.y_mm(), r);
    }
    for arc in &board.arcs {
        let r = to_mm(arc.width) / 2.0;
        for (x, y) in arc_points(arc.start, arc.mid, arc.end) {
            grow(x, y, r);
        }
    }
    for via in &board.vias {
        grow(via.at.x_mm(), via.at.y_mm(), to_mm(via.size) / 2.0);
    }
    for footprint in &board.footprints {
        for pad in &footprint.pads {
            for c in pad_polygon(footprint, pad).exterior().coords() {
                grow(c.x, c.y, 0.0);
            }
        }
    }
    for zone in &board.zones {
        for fill in &zone.fills {
            for p in &fill.outline {
                grow(p.x_mm(), p.y_mm(), 0.0);
            }
        }
    }

    if !min_x.is_finite() {
        return BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        };
    }
    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kicad::from_mm;

    fn pt(x: f64, y: f64) -> Point {
        Point::from_mm(x, y)
    }

    #[test]
    fn test_capsule_area_close_to_analytic() {
        let track = Track {
            start: pt(0.0, 0.0),
            end: pt(10.0, 0.0),
            width: from_mm(1.0),
            layer: "F.Cu".into(),
            net: 0,
        };
        let poly = track_polygon(&track);
        // 10x1 rectangle plus a full r=0.5 circle
        let expected = 10.0 + std::f64::consts::PI * 0.25;
        assert!((poly.unsigned_area() - expected).abs() < 0.05);
    }

    #[test]
    fn test_mirror_is_involutive() {
        let cx = 55.25;
        for x in [0.0, 12.5, 55.25, 103.7] {
            assert!((mirror_x(mirror_x(x, cx), cx) - x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_arc_points_pass_through_mid() {
        // quarter arc of radius 10 around the origin
        let points = arc_points(pt(10.0, 0.0), pt(7.0710678, 7.0710678), pt(0.0, 10.0));
        assert!(points.len() > 4);
        let on_radius = points
            .iter()
            .all(|(x, y)| (x.hypot(*y) - 10.0).abs() < 1e-6);
        assert!(on_radius);
        let (sx, sy) = points[0];
        let (ex, ey) = *points.last().unwrap();
        assert!((sx - 10.0).abs() < 1e-9 && sy.abs() < 1e-9);
        assert!(ex.abs() < 1e-9 && (ey - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_arc_degrades_to_line() {
        let points = arc_points(pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0));
        assert_eq!(points, vec![(0.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn test_outline_rect_with_circular_cutout() {
        let mut board = Board::default();
        board.graphics.push(crate::kicad::Graphic {
            shape: GraphicShape::Rect {
                start: pt(0.0, 0.0),
                end: pt(20.0, 10.0),
            },
            layer: "Edge.Cuts".into(),
            width: from_mm(0.1),
        });
        board.graphics.push(crate::kicad::Graphic {
            shape: GraphicShape::Circle {
                center: pt(10.0, 5.0),
                end: pt(12.0, 5.0),
            },
            layer: "Edge.Cuts".into(),
            width: from_mm(0.1),
        });
        let outline = board_outline(&board);
        assert_eq!(outline.0.len(), 1);
        assert_eq!(outline.0[0].interiors().len(), 1);
        let expected = 200.0 - std::f64::consts::PI * 4.0;
        assert!((outline.unsigned_area() - expected).abs() < 0.5);
    }

    #[test]
    fn test_outline_chains_segments() {
        let mut board = Board::default();
        let corners = [
            (pt(0.0, 0.0), pt(10.0, 0.0)),
            (pt(10.0, 0.0), pt(10.0, 10.0)),
            // reversed on purpose; chaining must flip it
            (pt(0.0, 10.0), pt(10.0, 10.0)),
            (pt(0.0, 10.0), pt(0.0, 0.0)),
        ];
        for (start, end) in corners {
            board.graphics.push(crate::kicad::Graphic {
                shape: GraphicShape::Line { start, end },
                layer: "Edge.Cuts".into(),
                width: from_mm(0.1),
            });
        }
        let outline = board_outline(&board);
        assert_eq!(outline.0.len(), 1);
        assert!((outline.unsigned_area() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_isolation_of_empty_layer_is_full_board() {
        let mut board = Board::default();
        board.graphics.push(crate::kicad::Graphic {
            shape: GraphicShape::Rect {
                start: pt(0.0, 0.0),
                end: pt(30.0, 20.0),
            },
            layer: "Edge.Cuts".into(),
            width: from_mm(0.1),
        });
        let area = board_outline(&board);
        let (copper, stats) = copper_on_layer(&board, "F.Cu");
        assert_eq!(stats.tracks + stats.pads + stats.zones, 0);
        let iso = isolation(&area, &copper);
        assert!((iso.unsigned_area() - area.unsigned_area()).abs() < 1e-9);
    }

    #[test]
    fn test_isolation_subtracts_track() {
        let mut board = Board::default();
        board.graphics.push(crate::kicad::Graphic {
            shape: GraphicShape::Rect {
                start: pt(0.0, 0.0),
                end: pt(30.0, 20.0),
            },
            layer: "Edge.Cuts".into(),
            width: from_mm(0.1),
        });
        board.tracks.push(Track {
            start: pt(5.0, 10.0),
            end: pt(25.0, 10.0),
            width: from_mm(1.0),
            layer: "F.Cu".into(),
            net: 1,
        });
        let area = board_outline(&board);
        let (copper, stats) = copper_on_layer(&board, "F.Cu");
        assert_eq!(stats.tracks, 1);
        let iso = isolation(&area, &copper);
        let removed = area.unsigned_area() - iso.unsigned_area();
        assert!((removed - copper.unsigned_area()).abs() < 0.05);
    }

    #[test]
    fn test_bbox_covers_track_width() {
        let mut board = Board::default();
        board.tracks.push(Track {
            start: pt(10.0, 10.0),
            end: pt(20.0, 10.0),
            width: from_mm(2.0),
            layer: "F.Cu".into(),
            net: 0,
        });
        let bbox = board_bbox(&board);
        assert!((bbox.min_x - 9.0).abs() < 1e-9);
        assert!((bbox.max_x - 21.0).abs() < 1e-9);
        assert!((bbox.min_y - 9.0).abs() < 1e-9);
        assert!((bbox.height() - 2.0).abs() < 1e-9);
    }
}
