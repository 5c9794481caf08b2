//! Parser from the `.kicad_pcb` s-expression tree into the [`Board`] model.
//!
//! Only the node kinds the conversion needs are read; everything else
//! (silkscreen text, nets, setup, groups) is skipped. Both the modern
//! `footprint` tag and the legacy `module` tag are accepted.

use tracing::warn;

use crate::error::Error;
use crate::kicad::sexpr::{self, Sexpr};
use crate::kicad::types::*;

pub fn parse_board(input: &str) -> Result<Board, Error> {
    let root = sexpr::parse(input)?;
    if root.tag() != Some("kicad_pcb") {
        return Err(Error::NotABoard {
            found: root.tag().unwrap_or("").to_string(),
        });
    }

    let mut board = Board::default();

    for node in root.items().iter().skip(1) {
        let Some(tag) = node.tag() else { continue };
        match tag {
            "layers" => board.layers = parse_layers(node)?,
            "segment" => board.tracks.push(parse_segment(node)?),
            "arc" => board.arcs.push(parse_track_arc(node)?),
            "via" => board.vias.push(parse_via(node)?),
            "footprint" | "module" => board.footprints.push(parse_footprint(node)?),
            "zone" => board.zones.push(parse_zone(node)?),
            "gr_line" | "gr_rect" | "gr_circle" | "gr_arc" | "gr_poly" => {
                if let Some(graphic) = parse_graphic(tag, node)? {
                    board.graphics.push(graphic);
                }
            }
            _ => {}
        }
    }

    Ok(board)
}

fn parse_layers(node: &Sexpr) -> Result<Vec<LayerDef>, Error> {
    let mut layers = Vec::new();
    for entry in node.items().iter().skip(1) {
        let id = entry
            .i32_at(0)
            .ok_or_else(|| Error::malformed("layers", "entry without numeric id"))?;
        let name = entry
            .atom_at(1)
            .ok_or_else(|| Error::malformed("layers", format!("layer {id} has no name")))?;
        let kind = match entry.atom_at(2) {
            Some("signal") => LayerKind::Signal,
            Some("power") => LayerKind::Power,
            Some("mixed") => LayerKind::Mixed,
            Some("jumper") => LayerKind::Jumper,
            _ => LayerKind::User,
        };
        layers.push(LayerDef {
            id,
            name: name.to_string(),
            kind,
        });
    }
    Ok(layers)
}

/// `(xy x y)` or any node carrying x/y at positions 1 and 2, e.g. `(start x y)`.
fn point_at(node: &Sexpr) -> Option<Point> {
    Some(Point::from_mm(node.f64_at(1)?, node.f64_at(2)?))
}

fn required_point(node: &Sexpr, tag: &str, ctx: &'static str) -> Result<Point, Error> {
    node.find(tag)
        .and_then(point_at)
        .ok_or_else(|| Error::malformed(ctx, format!("missing ({tag} x y)")))
}

fn parse_pts(node: &Sexpr) -> Vec<Point> {
    node.find("pts")
        .map(|pts| pts.find_all("xy").filter_map(point_at).collect())
        .unwrap_or_default()
}

/// Stroke width from either the legacy `(width w)` or the v6 `(stroke (width w))`.
fn stroke_width(node: &Sexpr) -> i64 {
    let mm = node
        .f64_of("width")
        .or_else(|| node.find("stroke").and_then(|s| s.f64_of("width")))
        .unwrap_or(0.0);
    from_mm(mm)
}

fn layer_name(node: &Sexpr, ctx: &'static str) -> Result<String, Error> {
    node.value_of("layer")
        .map(str::to_string)
        .ok_or_else(|| Error::malformed(ctx, "missing (layer ...)"))
}

fn parse_segment(node: &Sexpr) -> Result<Track, Error> {
    Ok(Track {
        start: required_point(node, "start", "segment")?,
        end: required_point(node, "end", "segment")?,
        width: from_mm(
            node.f64_of("width")
                .ok_or_else(|| Error::malformed("segment", "missing (width ...)"))?,
        ),
        layer: layer_name(node, "segment")?,
        net: node.i32_of("net").unwrap_or(0),
    })
}

fn parse_track_arc(node: &Sexpr) -> Result<TrackArc, Error> {
    Ok(TrackArc {
        start: required_point(node, "start", "arc")?,
        mid: required_point(node, "mid", "arc")?,
        end: required_point(node, "end", "arc")?,
        width: from_mm(
            node.f64_of("width")
                .ok_or_else(|| Error::malformed("arc", "missing (width ...)"))?,
        ),
        layer: layer_name(node, "arc")?,
    })
}

fn parse_via(node: &Sexpr) -> Result<Via, Error> {
    let layers = node
        .find("layers")
        .map(|l| {
            l.items()
                .iter()
                .skip(1)
                .filter_map(Sexpr::as_atom)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_else(|| vec!["F.Cu".to_string(), "B.Cu".to_string()]);
    Ok(Via {
        at: required_point(node, "at", "via")?,
        size: from_mm(
            node.f64_of("size")
                .ok_or_else(|| Error::malformed("via", "missing (size ...)"))?,
        ),
        drill: from_mm(node.f64_of("drill").unwrap_or(0.0)),
        layers,
    })
}

fn parse_footprint(node: &Sexpr) -> Result<Footprint, Error> {
    let name = node.atom_at(1).unwrap_or("").to_string();
    let at = node
        .find("at")
        .ok_or_else(|| Error::malformed("footprint", format!("{name}: missing (at x y)")))?;
    let position = point_at(at)
        .ok_or_else(|| Error::malformed("footprint", format!("{name}: bad (at ...)")))?;
    let angle = at.f64_at(3).unwrap_or(0.0);

    let mut pads = Vec::new();
    for pad_node in node.find_all("pad") {
        if let Some(pad) = parse_pad(pad_node, &name)? {
            pads.push(pad);
        }
    }

    Ok(Footprint {
        layer: layer_name(node, "footprint")?,
        name,
        at: position,
        angle,
        pads,
    })
}

fn parse_pad(node: &Sexpr, footprint: &str) -> Result<Option<Pad>, Error> {
    let number = node.atom_at(1).unwrap_or("").to_string();
    let kind = match node.atom_at(2) {
        Some("smd") => PadKind::Smd,
        Some("thru_hole") => PadKind::ThruHole,
        Some("np_thru_hole") => PadKind::NpThruHole,
        Some("connect") => PadKind::Connect,
        other => {
            return Err(Error::malformed(
                "pad",
                format!("{footprint} pad {number}: unknown kind {other:?}"),
            ));
        }
    };
    let shape = match node.atom_at(3) {
        Some("circle") => PadShape::Circle,
        Some("oval") => PadShape::Oval,
        Some("rect") => PadShape::Rect,
        Some("roundrect") => PadShape::RoundRect {
            ratio: node.f64_of("roundrect_rratio").unwrap_or(0.25),
        },
        Some("trapezoid") => PadShape::Trapezoid,
        Some("custom") => PadShape::Custom,
        other => {
            return Err(Error::malformed(
                "pad",
                format!("{footprint} pad {number}: unknown shape {other:?}"),
            ));
        }
    };
    if shape == PadShape::Custom {
        warn!(footprint, pad = %number, "skipping custom pad shape");
        return Ok(None);
    }

    let at = node
        .find("at")
        .ok_or_else(|| Error::malformed("pad", format!("{footprint} pad {number}: missing at")))?;
    let offset = point_at(at)
        .ok_or_else(|| Error::malformed("pad", format!("{footprint} pad {number}: bad at")))?;
    let angle = at.f64_at(3).unwrap_or(0.0);

    let size_node = node
        .find("size")
        .ok_or_else(|| Error::malformed("pad", format!("{footprint} pad {number}: missing size")))?;
    let size = (
        from_mm(size_node.f64_at(1).unwrap_or(0.0)),
        from_mm(size_node.f64_at(2).unwrap_or(0.0)),
    );

    let drill = parse_drill(node);

    let layers = node
        .find("layers")
        .map(|l| {
            l.items()
                .iter()
                .skip(1)
                .filter_map(Sexpr::as_atom)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(Pad {
        number,
        kind,
        shape,
        offset,
        angle,
        size,
        drill,
        layers,
    }))
}

/// `(drill d)`, `(drill oval w h)`, possibly with a trailing `(offset ...)`.
fn parse_drill(node: &Sexpr) -> DrillSize {
    let Some(drill) = node.find("drill") else {
        return DrillSize::default();
    };
    if drill.atom_at(1) == Some("oval") {
        let w = from_mm(drill.f64_at(2).unwrap_or(0.0));
        let h = from_mm(drill.f64_at(3).unwrap_or(0.0));
        DrillSize { x: w, y: h }
    } else {
        let d = from_mm(drill.f64_at(1).unwrap_or(0.0));
        DrillSize { x: d, y: d }
    }
}

fn parse_zone(node: &Sexpr) -> Result<Zone, Error> {
    // Single-layer zones use (layer ...), multi-layer ones (layers ...)
    let layers = if let Some(multi) = node.find("layers") {
        multi
            .items()
            .iter()
            .skip(1)
            .filter_map(Sexpr::as_atom)
            .map(str::to_string)
            .collect()
    } else {
        vec![layer_name(node, "zone")?]
    };

    let mut fills = Vec::new();
    for fill in node.find_all("filled_polygon") {
        let layer = fill
            .value_of("layer")
            .map(str::to_string)
            .unwrap_or_else(|| layers.first().cloned().unwrap_or_default());
        let outline = parse_pts(fill);
        if outline.len() >= 3 {
            fills.push(ZoneFill { layer, outline });
        }
    }

    Ok(Zone {
        net: node.i32_of("net").unwrap_or(0),
        layers,
        fills,
    })
}

fn parse_graphic(tag: &str, node: &Sexpr) -> Result<Option<Graphic>, Error> {
    let shape = match tag {
        "gr_line" => GraphicShape::Line {
            start: required_point(node, "start", "gr_line")?,
            end: required_point(node, "end", "gr_line")?,
        },
        "gr_rect" => GraphicShape::Rect {
            start: required_point(node, "start", "gr_rect")?,
            end: required_point(node, "end", "gr_rect")?,
        },
        "gr_circle" => GraphicShape::Circle {
            center: required_point(node, "center", "gr_circle")?,
            end: required_point(node, "end", "gr_circle")?,
        },
        "gr_arc" => GraphicShape::Arc {
            start: required_point(node, "start", "gr_arc")?,
            mid: required_point(node, "mid", "gr_arc")?,
            end: required_point(node, "end", "gr_arc")?,
        },
        "gr_poly" => {
            let points = parse_pts(node);
            if points.len() < 2 {
                return Ok(None);
            }
            GraphicShape::Poly { points }
        }
        _ => return Ok(None),
    };
    Ok(Some(Graphic {
        shape,
        layer: layer_name(node, "graphic")?,
        width: stroke_width(node),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        (kicad_pcb (version 20221018) (generator pcbnew)
          (general (thickness 1.6))
          (layers
            (0 "F.Cu" signal)
            (31 "B.Cu" signal)
            (36 "B.Mask" user)
            (39 "F.Mask" user)
            (41 "Cmts.User" user "User.Comments")
            (44 "Edge.Cuts" user))
          (net 0 "")
          (net 1 "GND")
          (segment (start 102 51) (end 108 51) (width 0.25) (layer "F.Cu") (net 1))
          (via (at 105 51) (size 0.8) (drill 0.4) (layers "F.Cu" "B.Cu") (net 1))
          (footprint "Test:TH" (layer "F.Cu")
            (at 104 52 90)
            (pad "1" thru_hole circle (at -1 0) (size 1.7 1.7) (drill 1.0)
              (layers "*.Cu" "*.Mask"))
            (pad "2" smd roundrect (at 1 0 90) (size 1.2 0.8) (roundrect_rratio 0.25)
              (layers "F.Cu" "F.Mask")))
          (zone (net 1) (net_name "GND") (layer "F.Cu")
            (polygon (pts (xy 100 50) (xy 110 50) (xy 110 55) (xy 100 55)))
            (filled_polygon (layer "F.Cu")
              (pts (xy 100.2 50.2) (xy 109.8 50.2) (xy 109.8 54.8) (xy 100.2 54.8))))
          (gr_rect (start 100 50) (end 110 55) (stroke (width 0.1) (type solid))
            (layer "Edge.Cuts"))
          (gr_line (start 101 56) (end 109 56) (stroke (width 0.2) (type solid))
            (layer "Cmts.User")))
    "#;

    #[test]
    fn test_parses_minimal_board() {
        let board = parse_board(MINIMAL).unwrap();
        assert_eq!(board.layers.len(), 6);
        assert!(board.has_layer("F.Cu"));
        assert!(board.has_layer("Edge.Cuts"));
        assert!(!board.has_layer("In1.Cu"));
        assert_eq!(board.tracks.len(), 1);
        assert_eq!(board.vias.len(), 1);
        assert_eq!(board.footprints.len(), 1);
        assert_eq!(board.footprints[0].pads.len(), 2);
        assert_eq!(board.zones.len(), 1);
        assert_eq!(board.zones[0].fills.len(), 1);
        assert_eq!(board.graphics.len(), 2);
    }

    #[test]
    fn test_track_fields() {
        let board = parse_board(MINIMAL).unwrap();
        let track = &board.tracks[0];
        assert_eq!(track.start, Point::from_mm(102.0, 51.0));
        assert_eq!(track.width, from_mm(0.25));
        assert_eq!(track.layer, "F.Cu");
        assert_eq!(track.net, 1);
    }

    #[test]
    fn test_pad_fields() {
        let board = parse_board(MINIMAL).unwrap();
        let th = &board.footprints[0].pads[0];
        assert_eq!(th.kind, PadKind::ThruHole);
        assert!(th.drill.is_some() && th.drill.is_round());
        assert!(th.is_on_layer("B.Cu"));
        let smd = &board.footprints[0].pads[1];
        assert_eq!(smd.shape, PadShape::RoundRect { ratio: 0.25 });
        assert_eq!(smd.angle, 90.0);
        assert!(!smd.is_on_layer("B.Cu"));
    }

    #[test]
    fn test_rejects_non_board_input() {
        assert!(matches!(
            parse_board("(kicad_sch (version 1))"),
            Err(Error::NotABoard { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_segment() {
        let input = r#"(kicad_pcb (segment (start 0 0) (width 0.2) (layer "F.Cu")))"#;
        assert!(matches!(
            parse_board(input),
            Err(Error::MalformedNode { node: "segment", .. })
        ));
    }

    #[test]
    fn test_oval_drill() {
        let input = r#"
            (kicad_pcb
              (footprint "Test:SLOT" (layer "F.Cu") (at 0 0)
                (pad "1" thru_hole oval (at 0 0 45) (size 3 2) (drill oval 2 1)
                  (layers "*.Cu" "*.Mask"))))
        "#;
        let board = parse_board(input).unwrap();
        let pad = &board.footprints[0].pads[0];
        assert_eq!(pad.drill.x, from_mm(2.0));
        assert_eq!(pad.drill.y, from_mm(1.0));
        assert!(!pad.drill.is_round());
    }
}
