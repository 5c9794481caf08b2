//! In-memory board model.
//!
//! Coordinates are stored in KiCad internal units (1 IU = 1 nanometer); the
//! file format carries millimeters, converted on parse. Keeping integers
//! internally makes the mm round-trip exact for file-representable values.

/// Internal units per millimeter (KiCad uses nanometers).
pub const IU_PER_MM: f64 = 1_000_000.0;

pub fn from_mm(mm: f64) -> i64 {
    (mm * IU_PER_MM).round() as i64
}

pub fn to_mm(iu: i64) -> f64 {
    iu as f64 / IU_PER_MM
}

/// A point in internal units, y axis pointing down (KiCad convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn from_mm(x: f64, y: f64) -> Self {
        Self {
            x: from_mm(x),
            y: from_mm(y),
        }
    }

    pub fn x_mm(&self) -> f64 {
        to_mm(self.x)
    }

    pub fn y_mm(&self) -> f64 {
        to_mm(self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Signal,
    Power,
    User,
    Mixed,
    Jumper,
}

/// One entry of the board's layer table.
#[derive(Debug, Clone)]
pub struct LayerDef {
    pub id: i32,
    pub name: String,
    pub kind: LayerKind,
}

/// A straight track segment on a copper layer.
#[derive(Debug, Clone)]
pub struct Track {
    pub start: Point,
    pub end: Point,
    pub width: i64,
    pub layer: String,
    pub net: i32,
}

/// A curved track on a copper layer, given by start/mid/end points.
#[derive(Debug, Clone)]
pub struct TrackArc {
    pub start: Point,
    pub mid: Point,
    pub end: Point,
    pub width: i64,
    pub layer: String,
}

#[derive(Debug, Clone)]
pub struct Via {
    pub at: Point,
    /// Outer copper diameter (annular ring).
    pub size: i64,
    /// Drill diameter.
    pub drill: i64,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadShape {
    Circle,
    Oval,
    Rect,
    RoundRect { ratio: f64 },
    Trapezoid,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKind {
    Smd,
    ThruHole,
    NpThruHole,
    Connect,
}

/// Drill hole of a pad; zero on both axes means no hole.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrillSize {
    pub x: i64,
    pub y: i64,
}

impl DrillSize {
    pub fn is_some(&self) -> bool {
        self.x > 0 && self.y > 0
    }

    pub fn is_round(&self) -> bool {
        self.x == self.y
    }
}

#[derive(Debug, Clone)]
pub struct Pad {
    pub number: String,
    pub kind: PadKind,
    pub shape: PadShape,
    /// Position relative to the footprint anchor, before footprint rotation.
    pub offset: Point,
    /// Absolute rotation in degrees (KiCad stores pad angles absolute).
    pub angle: f64,
    pub size: (i64, i64),
    pub drill: DrillSize,
    /// Layer names, possibly with `*.`/`F.`/`B.` wildcards.
    pub layers: Vec<String>,
}

impl Pad {
    /// Layer-set membership with KiCad wildcard expansion (`*.Cu`, `F.Mask`, ...).
    pub fn is_on_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|l| layer_matches(l, layer))
    }
}

fn layer_matches(pattern: &str, layer: &str) -> bool {
    if pattern == layer {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix("*.") {
        return layer
            .split_once('.')
            .is_some_and(|(_, layer_suffix)| layer_suffix == suffix);
    }
    false
}

#[derive(Debug, Clone)]
pub struct Footprint {
    /// Library id, e.g. `Resistor_SMD:R_0603_1608Metric`.
    pub name: String,
    pub at: Point,
    /// Rotation in degrees.
    pub angle: f64,
    pub layer: String,
    pub pads: Vec<Pad>,
}

impl Footprint {
    /// Board position of a pad: the pad offset rotated by the footprint angle.
    ///
    /// KiCad rotates counterclockwise on screen, which with a y-down axis is
    /// `x' = x cos + y sin`, `y' = -x sin + y cos`.
    pub fn pad_position(&self, pad: &Pad) -> Point {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let x = pad.offset.x as f64;
        let y = pad.offset.y as f64;
        Point {
            x: self.at.x + (x * cos + y * sin).round() as i64,
            y: self.at.y + (-x * sin + y * cos).round() as i64,
        }
    }
}

/// One stored fill polygon of a zone, as written by the zone filler.
#[derive(Debug, Clone)]
pub struct ZoneFill {
    pub layer: String,
    pub outline: Vec<Point>,
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub net: i32,
    pub layers: Vec<String>,
    pub fills: Vec<ZoneFill>,
}

impl Zone {
    pub fn is_on_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|l| l == layer)
    }

    pub fn fills_on<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a ZoneFill> + 'a {
        self.fills.iter().filter(move |f| f.layer == layer)
    }
}

#[derive(Debug, Clone)]
pub enum GraphicShape {
    Line { start: Point, end: Point },
    Rect { start: Point, end: Point },
    Circle { center: Point, end: Point },
    Arc { start: Point, mid: Point, end: Point },
    Poly { points: Vec<Point> },
}

/// A board-level drawing (`gr_line`, `gr_rect`, ...).
#[derive(Debug, Clone)]
pub struct Graphic {
    pub shape: GraphicShape,
    pub layer: String,
    /// Stroke width.
    pub width: i64,
}

/// The loaded design. Immutable once parsed.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub layers: Vec<LayerDef>,
    pub tracks: Vec<Track>,
    pub arcs: Vec<TrackArc>,
    pub vias: Vec<Via>,
    pub footprints: Vec<Footprint>,
    pub zones: Vec<Zone>,
    pub graphics: Vec<Graphic>,
}

impl Board {
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    pub fn graphics_on<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Graphic> + 'a {
        self.graphics.iter().filter(move |g| g.layer == layer)
    }
}
