//! SVG serialization.
//!
//! Regions come out of the geometry stage as `geo` multipolygons; here they
//! become `M/L/Z` path data (exterior ring first, then holes, rendered with
//! `fill-rule="evenodd"`) inside a millimeter-sized document whose `viewBox`
//! is the board bounding box.

use geo::{LineString, MultiPolygon};

use crate::geom::{BoundingBox, mirror_x};

/// Format a coordinate with 6 decimal places, treating -0 as 0.
pub(crate) fn fmt_mm(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{:.6}", n)
}

fn ring_path_data(path: &mut Vec<String>, ring: &LineString<f64>, mirror_axis: Option<f64>) {
    let coords = ring.coords().collect::<Vec<_>>();
    if coords.is_empty() {
        return;
    }
    // a closed LineString repeats the first coordinate; Z replaces it
    let last = if coords.len() > 1 && coords.first() == coords.last() {
        coords.len() - 1
    } else {
        coords.len()
    };
    for (i, c) in coords[..last].iter().enumerate() {
        let x = match mirror_axis {
            Some(cx) => mirror_x(c.x, cx),
            None => c.x,
        };
        let cmd = if i == 0 { "M" } else { "L" };
        path.push(format!("{cmd} {} {}", fmt_mm(x), fmt_mm(c.y)));
    }
    path.push("Z".to_string());
}

/// Path data for a region: one `M .. Z` subpath per outline and per hole.
pub fn region_path_data(region: &MultiPolygon<f64>) -> String {
    region_path(region, None)
}

/// Path data mirrored across the vertical line `x = center_x`.
pub fn region_path_data_mirrored(region: &MultiPolygon<f64>, center_x: f64) -> String {
    region_path(region, Some(center_x))
}

fn region_path(region: &MultiPolygon<f64>, mirror_axis: Option<f64>) -> String {
    let mut path = Vec::new();
    for polygon in &region.0 {
        ring_path_data(&mut path, polygon.exterior(), mirror_axis);
        for hole in polygon.interiors() {
            ring_path_data(&mut path, hole, mirror_axis);
        }
    }
    path.join(" ")
}

/// One output drawing, assembled element by element and rendered once.
pub struct SvgDocument {
    bbox: BoundingBox,
    elements: Vec<String>,
}

impl SvgDocument {
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            elements: Vec::new(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Solid region with evenodd hole semantics.
    pub fn add_filled_region(&mut self, d: &str, fill: &str) {
        self.elements.push(format!(
            "<path d=\"{d}\" fill=\"{fill}\" fill-rule=\"evenodd\"/>"
        ));
    }

    /// Unfilled contour, e.g. the board outline.
    pub fn add_contour(&mut self, d: &str, stroke: &str, stroke_width: &str) {
        self.elements.push(format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>"
        ));
    }

    /// Stroked path with a shape-derived width (comments layer polygons).
    pub fn add_stroked_path(&mut self, d: &str, stroke: &str, width_mm: f64) {
        self.elements.push(format!(
            "<path d=\"{d}\" stroke=\"{stroke}\" stroke-width=\"{width_mm:.3}\" fill=\"none\"/>"
        ));
    }

    pub fn add_circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        self.elements.push(format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{fill}\"/>",
            fmt_mm(cx),
            fmt_mm(cy),
            fmt_mm(r)
        ));
    }

    /// Slot hole: an ellipse, rotated about its own center when angled.
    pub fn add_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, angle: f64, fill: &str) {
        let mut el = format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
            fmt_mm(cx),
            fmt_mm(cy),
            fmt_mm(rx),
            fmt_mm(ry)
        );
        if angle != 0.0 {
            el.push_str(&format!(
                " transform=\"rotate({} {} {})\"",
                fmt_mm(angle),
                fmt_mm(cx),
                fmt_mm(cy)
            ));
        }
        el.push_str(&format!(" fill=\"{fill}\"/>"));
        self.elements.push(el);
    }

    pub fn add_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width_mm: f64) {
        self.elements.push(format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{stroke}\" \
             stroke-width=\"{width_mm:.3}\" fill=\"none\"/>",
            fmt_mm(x1),
            fmt_mm(y1),
            fmt_mm(x2),
            fmt_mm(y2)
        ));
    }

    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: &str, width_mm: f64) {
        self.elements.push(format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" stroke=\"{stroke}\" \
             stroke-width=\"{width_mm:.3}\" fill=\"none\"/>",
            fmt_mm(x),
            fmt_mm(y),
            fmt_mm(w),
            fmt_mm(h)
        ));
    }

    pub fn add_stroked_circle(&mut self, cx: f64, cy: f64, r: f64, stroke: &str, width_mm: f64) {
        self.elements.push(format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" stroke=\"{stroke}\" \
             stroke-width=\"{width_mm:.3}\" fill=\"none\"/>",
            fmt_mm(cx),
            fmt_mm(cy),
            fmt_mm(r)
        ));
    }

    pub fn render(&self) -> String {
        let w = fmt_mm(self.bbox.width());
        let h = fmt_mm(self.bbox.height());
        let view_box = format!(
            "{} {} {} {}",
            fmt_mm(self.bbox.min_x),
            fmt_mm(self.bbox.min_y),
            w,
            h
        );
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{}mm" height="{}mm" viewBox="{}">
    {}
</svg>"#,
            w,
            h,
            view_box,
            self.elements.join("\n    ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, Polygon, polygon};

    fn unit_square() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]])
    }

    #[test]
    fn test_fmt_mm_negative_zero() {
        assert_eq!(fmt_mm(-0.0), "0.000000");
        assert_eq!(fmt_mm(1.5), "1.500000");
    }

    #[test]
    fn test_square_path_data() {
        let d = region_path_data(&unit_square());
        assert_eq!(
            d,
            "M 0.000000 0.000000 L 1.000000 0.000000 L 1.000000 1.000000 L 0.000000 1.000000 Z"
        );
    }

    #[test]
    fn test_hole_becomes_second_subpath() {
        let outer: Polygon<f64> = polygon![
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 4.0, y: 0.0),
                (x: 4.0, y: 4.0),
                (x: 0.0, y: 4.0),
            ],
            interiors: [[
                (x: 1.0, y: 1.0),
                (x: 3.0, y: 1.0),
                (x: 3.0, y: 3.0),
                (x: 1.0, y: 3.0),
            ]],
        ];
        let d = region_path_data(&MultiPolygon::new(vec![outer]));
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }

    #[test]
    fn test_mirrored_x_values() {
        let d = region_path_data_mirrored(&unit_square(), 0.5);
        // x=0 maps to 1 and x=1 maps to 0; y is untouched
        assert!(d.starts_with("M 1.000000 0.000000"));
        assert!(d.contains("L 0.000000 1.000000"));
    }

    #[test]
    fn test_document_render() {
        let bbox = BoundingBox {
            min_x: 10.0,
            min_y: 20.0,
            max_x: 40.0,
            max_y: 40.0,
        };
        let mut doc = SvgDocument::new(bbox);
        doc.add_circle(15.0, 25.0, 0.5, "#ff7f56");
        let svg = doc.render();
        assert!(svg.contains("width=\"30.000000mm\""));
        assert!(svg.contains("height=\"20.000000mm\""));
        assert!(svg.contains("viewBox=\"10.000000 20.000000 30.000000 20.000000\""));
        assert!(svg.contains("<circle"));
    }
}
