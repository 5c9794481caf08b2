//! Output generation: one SVG per requested layer or category, plus the
//! merged multi-color drawings for direct import into the laser software.

use std::fs;
use std::path::{Path, PathBuf};

use geo::CoordsIter;
use tracing::info;

use crate::error::Error;
use crate::geom::{self, BoundingBox, mirror_x};
use crate::kicad::{Board, GraphicShape, to_mm};
use crate::style::{
    COMMENTS_COLOR, COMMENTS_LAYER, CONTOUR_COLOR, CONTOUR_STROKE_WIDTH, HOLES_COLOR, MASK_COLOR,
    TRACES_COLOR, layer_file_stem, mask_layer_for,
};
use crate::svg::{SvgDocument, fmt_mm, region_path_data, region_path_data_mirrored};

fn require_layer(board: &Board, layer: &str) -> Result<(), Error> {
    if board.has_layer(layer) {
        Ok(())
    } else {
        Err(Error::UnknownLayer(layer.to_string()))
    }
}

fn write_svg(out_dir: &Path, file_name: &str, doc: &SvgDocument) -> Result<PathBuf, Error> {
    fs::create_dir_all(out_dir).map_err(|source| Error::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(file_name);
    fs::write(&path, doc.render()).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "generated");
    Ok(path)
}

/// Isolation routing for one copper layer: board area minus all copper,
/// filled black so the laser etches everything that is not a trace.
pub fn generate_isolation_svg(
    board: &Board,
    layer: &str,
    out_dir: &Path,
) -> Result<PathBuf, Error> {
    require_layer(board, layer)?;
    let bbox = geom::board_bbox(board);
    info!(
        layer,
        board = %format!(
            "({:.2}, {:.2}) {:.2}x{:.2}mm",
            bbox.min_x,
            bbox.min_y,
            bbox.width(),
            bbox.height()
        ),
        "processing isolation"
    );

    let area = geom::board_outline(board);
    info!(
        outlines = area.0.len(),
        vertices = area.coords_count(),
        "board outline"
    );

    let (copper, stats) = geom::copper_on_layer(board, layer);
    info!(
        tracks = stats.tracks,
        pads = stats.pads,
        zones = stats.zones,
        "copper collected"
    );

    let iso = geom::isolation(&area, &copper);
    info!(
        outlines = iso.0.len(),
        vertices = iso.coords_count(),
        "isolation computed"
    );

    let mut doc = SvgDocument::new(bbox);
    doc.add_filled_region(&region_path_data(&iso), TRACES_COLOR);
    write_svg(
        out_dir,
        &format!("isolation_{}.svg", layer_file_stem(layer)),
        &doc,
    )
}

/// Board outline as an unfilled contour cut.
pub fn generate_edge_cuts_svg(board: &Board, out_dir: &Path) -> Result<PathBuf, Error> {
    require_layer(board, "Edge.Cuts")?;
    let bbox = geom::board_bbox(board);
    let outline = geom::board_outline(board);
    let mut doc = SvgDocument::new(bbox);
    doc.add_contour(
        &region_path_data(&outline),
        CONTOUR_COLOR,
        CONTOUR_STROKE_WIDTH,
    );
    write_svg(out_dir, "edge_cuts.svg", &doc)
}

/// Drill points: pad holes (round or slotted) and via drills.
pub fn generate_drill_holes_svg(board: &Board, out_dir: &Path) -> Result<PathBuf, Error> {
    let bbox = geom::board_bbox(board);
    let mut doc = SvgDocument::new(bbox);
    let mut holes = 0usize;

    for footprint in &board.footprints {
        for pad in footprint.pads.iter().filter(|p| p.drill.is_some()) {
            let pos = footprint.pad_position(pad);
            if pad.drill.is_round() {
                doc.add_circle(
                    pos.x_mm(),
                    pos.y_mm(),
                    to_mm(pad.drill.x) / 2.0,
                    HOLES_COLOR,
                );
            } else {
                doc.add_ellipse(
                    pos.x_mm(),
                    pos.y_mm(),
                    to_mm(pad.drill.x) / 2.0,
                    to_mm(pad.drill.y) / 2.0,
                    pad.angle,
                    HOLES_COLOR,
                );
            }
            holes += 1;
        }
    }
    // via drills cut through everything; the laser app treats black as etch
    for via in board.vias.iter().filter(|v| v.drill > 0) {
        doc.add_circle(
            via.at.x_mm(),
            via.at.y_mm(),
            to_mm(via.drill) / 2.0,
            TRACES_COLOR,
        );
        holes += 1;
    }

    info!(holes, "drill holes collected");
    write_svg(out_dir, "drill_holes.svg", &doc)
}

/// Solder mask openings for the side of the given copper layer.
pub fn generate_solder_mask_svg(
    board: &Board,
    copper_layer: &str,
    out_dir: &Path,
) -> Result<PathBuf, Error> {
    let mask_layer = mask_layer_for(copper_layer);
    require_layer(board, mask_layer)?;
    let bbox = geom::board_bbox(board);
    let (openings, stats) = geom::mask_openings(board, mask_layer);
    info!(
        mask_layer,
        pads = stats.pads,
        vias = stats.tracks,
        zones = stats.zones,
        outlines = openings.0.len(),
        "mask openings collected"
    );

    let mut doc = SvgDocument::new(bbox);
    if !openings.0.is_empty() {
        doc.add_filled_region(&region_path_data(&openings), MASK_COLOR);
    }
    write_svg(
        out_dir,
        &format!("solder_mask_{}.svg", layer_file_stem(copper_layer)),
        &doc,
    )
}

fn points_path_data(points: &[(f64, f64)], close: bool, mirror_axis: Option<f64>) -> String {
    let mut path = Vec::with_capacity(points.len() + 1);
    for (i, (x, y)) in points.iter().enumerate() {
        let x = match mirror_axis {
            Some(cx) => mirror_x(*x, cx),
            None => *x,
        };
        let cmd = if i == 0 { "M" } else { "L" };
        path.push(format!("{cmd} {} {}", fmt_mm(x), fmt_mm(*y)));
    }
    if close {
        path.push("Z".to_string());
    }
    path.join(" ")
}

fn add_comment_shapes(board: &Board, doc: &mut SvgDocument, mirror_axis: Option<f64>) -> usize {
    let mx = |x: f64| match mirror_axis {
        Some(cx) => mirror_x(x, cx),
        None => x,
    };
    let mut count = 0usize;
    for graphic in board.graphics_on(COMMENTS_LAYER) {
        let width = to_mm(graphic.width);
        match &graphic.shape {
            GraphicShape::Line { start, end } => {
                doc.add_line(
                    mx(start.x_mm()),
                    start.y_mm(),
                    mx(end.x_mm()),
                    end.y_mm(),
                    COMMENTS_COLOR,
                    width,
                );
            }
            GraphicShape::Rect { start, end } => {
                let (x0, x1) = (mx(start.x_mm()), mx(end.x_mm()));
                let x = x0.min(x1);
                let y = start.y_mm().min(end.y_mm());
                let w = (x1 - x0).abs();
                let h = (end.y_mm() - start.y_mm()).abs();
                doc.add_rect(x, y, w, h, COMMENTS_COLOR, width);
            }
            GraphicShape::Circle { center, end } => {
                let r = (center.x_mm() - end.x_mm()).hypot(center.y_mm() - end.y_mm());
                doc.add_stroked_circle(mx(center.x_mm()), center.y_mm(), r, COMMENTS_COLOR, width);
            }
            GraphicShape::Arc { start, mid, end } => {
                let points = geom::arc_points(*start, *mid, *end);
                doc.add_stroked_path(
                    &points_path_data(&points, false, mirror_axis),
                    COMMENTS_COLOR,
                    width,
                );
            }
            GraphicShape::Poly { points } => {
                let points: Vec<(f64, f64)> =
                    points.iter().map(|p| (p.x_mm(), p.y_mm())).collect();
                doc.add_stroked_path(
                    &points_path_data(&points, true, mirror_axis),
                    COMMENTS_COLOR,
                    width,
                );
            }
        }
        count += 1;
    }
    count
}

/// Scoring and annotation lines from the user comments layer.
pub fn generate_user_comments_svg(board: &Board, out_dir: &Path) -> Result<PathBuf, Error> {
    require_layer(board, COMMENTS_LAYER)?;
    let bbox = geom::board_bbox(board);
    let mut doc = SvgDocument::new(bbox);
    let count = add_comment_shapes(board, &mut doc, None);
    info!(shapes = count, "comment shapes collected");
    write_svg(out_dir, "user_comments.svg", &doc)
}

fn merged_document(
    board: &Board,
    layers: &[&str],
    bbox: BoundingBox,
    mirror_axis: Option<f64>,
) -> Result<SvgDocument, Error> {
    let mut doc = SvgDocument::new(bbox);
    let region_data = |region: &geo::MultiPolygon<f64>| match mirror_axis {
        Some(cx) => region_path_data_mirrored(region, cx),
        None => region_path_data(region),
    };
    let mx = |x: f64| match mirror_axis {
        Some(cx) => mirror_x(x, cx),
        None => x,
    };

    let outline = geom::board_outline(board);
    doc.add_contour(&region_data(&outline), CONTOUR_COLOR, CONTOUR_STROKE_WIDTH);

    for layer in layers {
        require_layer(board, layer)?;
        let (copper, _) = geom::copper_on_layer(board, layer);
        let iso = geom::isolation(&outline, &copper);
        if !iso.0.is_empty() {
            doc.add_filled_region(&region_data(&iso), TRACES_COLOR);
        }
    }

    // merged output colors every drill orange; slots are left to the
    // dedicated drill file
    let mut holes = 0usize;
    for footprint in &board.footprints {
        for pad in footprint.pads.iter().filter(|p| p.drill.is_some()) {
            if pad.drill.is_round() {
                let pos = footprint.pad_position(pad);
                doc.add_circle(
                    mx(pos.x_mm()),
                    pos.y_mm(),
                    to_mm(pad.drill.x) / 2.0,
                    HOLES_COLOR,
                );
                holes += 1;
            }
        }
    }
    for via in board.vias.iter().filter(|v| v.drill > 0) {
        doc.add_circle(
            mx(via.at.x_mm()),
            via.at.y_mm(),
            to_mm(via.drill) / 2.0,
            HOLES_COLOR,
        );
        holes += 1;
    }

    for layer in layers {
        let (openings, _) = geom::mask_openings(board, mask_layer_for(layer));
        if !openings.0.is_empty() {
            doc.add_filled_region(&region_data(&openings), MASK_COLOR);
        }
    }

    let comments = add_comment_shapes(board, &mut doc, mirror_axis);
    info!(holes, comments, "merged layers assembled");
    Ok(doc)
}

/// Single multi-color SVG with all front-side layers.
pub fn generate_multi_color_svg(
    board: &Board,
    layers: &[&str],
    out_dir: &Path,
) -> Result<PathBuf, Error> {
    let bbox = geom::board_bbox(board);
    info!(
        board = %format!(
            "({:.2}, {:.2}) {:.2}x{:.2}mm",
            bbox.min_x,
            bbox.min_y,
            bbox.width(),
            bbox.height()
        ),
        "generating merged front svg"
    );
    let doc = merged_document(board, layers, bbox, None)?;
    write_svg(out_dir, "multi_color_pcb.svg", &doc)
}

/// Single multi-color SVG for the back side, mirrored across the board center
/// so it is laser-ready with the board flipped.
pub fn generate_multi_color_svg_back(
    board: &Board,
    layers: &[&str],
    out_dir: &Path,
) -> Result<PathBuf, Error> {
    let bbox = geom::board_bbox(board);
    info!(
        board = %format!(
            "({:.2}, {:.2}) {:.2}x{:.2}mm",
            bbox.min_x,
            bbox.min_y,
            bbox.width(),
            bbox.height()
        ),
        "generating merged back svg (mirrored)"
    );
    let back_layers: Vec<&str> = layers
        .iter()
        .copied()
        .filter(|l| l.starts_with("B."))
        .collect();
    let doc = merged_document(board, &back_layers, bbox, Some(bbox.center_x()))?;
    write_svg(out_dir, "multi_color_pcb_back.svg", &doc)
}
