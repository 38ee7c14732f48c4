//! SVG rendering of a 2D boundary curve.
//!
//! The layout matches the interactive 2D view: curve centred on the canvas,
//! `scale = min(width, height) / 2.5` pixels per unit, `y` pointing up.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::ExportError;
use crate::geom::{BoundaryCurve2D, Point2};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const TICKS: [f64; 4] = [-1.0, -0.5, 0.5, 1.0];
const TICK_HALF_LENGTH: f64 = 5.0;
const LABEL_OFFSET: f64 = 20.0;
const AXIS_COLOR: &str = "#ccc";
const TICK_COLOR: &str = "#888";

#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    pub width: f64,
    pub height: f64,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            stroke: "#646cff".to_string(),
            stroke_width: 2.0,
        }
    }
}

impl SvgOptions {
    #[must_use]
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Canvas mapping from boundary coordinates to SVG pixels.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    cx: f64,
    cy: f64,
    scale: f64,
}

impl Viewport {
    fn new(width: f64, height: f64) -> Self {
        Self {
            cx: width / 2.0,
            cy: height / 2.0,
            scale: width.min(height) / 2.5,
        }
    }

    fn x(self, x: f64) -> f64 {
        self.cx + x * self.scale
    }

    fn y(self, y: f64) -> f64 {
        self.cy - y * self.scale
    }
}

/// Renders `curve` as a standalone SVG document.
///
/// The path visits every sample once and is closed with `Z`.
///
/// # Errors
///
/// [`ExportError::InvalidCanvas`] unless width and height are finite and
/// positive.
pub fn curve_to_svg(curve: &BoundaryCurve2D, options: &SvgOptions) -> Result<String, ExportError> {
    let SvgOptions { width, height, .. } = *options;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ExportError::InvalidCanvas { width, height });
    }
    let view = Viewport::new(width, height);

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

    let mut svg = BytesStart::new("svg");
    svg.push_attribute(("width", width.to_string().as_str()));
    svg.push_attribute(("height", height.to_string().as_str()));
    svg.push_attribute(("xmlns", SVG_NS));
    writer.write_event(Event::Start(svg))?;

    write_empty(
        &mut writer,
        "rect",
        &[("width", "100%".into()), ("height", "100%".into()), ("fill", "white".into())],
    )?;

    writer.write_event(Event::Comment(BytesText::new(" Axes ")))?;
    write_line(&mut writer, [0.0, view.cy, width, view.cy], AXIS_COLOR)?;
    write_line(&mut writer, [view.cx, 0.0, view.cx, height], AXIS_COLOR)?;

    writer.write_event(Event::Comment(BytesText::new(" Unit marks ")))?;
    for tick in TICKS {
        let x = view.x(tick);
        write_line(
            &mut writer,
            [x, view.cy - TICK_HALF_LENGTH, x, view.cy + TICK_HALF_LENGTH],
            TICK_COLOR,
        )?;
        write_label(&mut writer, x, view.cy + LABEL_OFFSET, &tick.to_string())?;
    }
    for tick in TICKS {
        let y = view.y(tick);
        write_line(
            &mut writer,
            [view.cx - TICK_HALF_LENGTH, y, view.cx + TICK_HALF_LENGTH, y],
            TICK_COLOR,
        )?;
        write_label(&mut writer, view.cx - LABEL_OFFSET, y, &tick.to_string())?;
    }

    writer.write_event(Event::Comment(BytesText::new(" Boundary ")))?;
    write_empty(
        &mut writer,
        "path",
        &[
            ("d", path_data(curve.points(), view)),
            ("fill", "none".into()),
            ("stroke", options.stroke.clone()),
            ("stroke-width", options.stroke_width.to_string()),
        ],
    )?;

    let mut title = BytesStart::new("text");
    title.push_attribute(("x", "10"));
    title.push_attribute(("y", "20"));
    title.push_attribute(("font-family", "Arial"));
    title.push_attribute(("font-size", "16"));
    title.push_attribute(("fill", "#000"));
    writer.write_event(Event::Start(title))?;
    let heading = format!("L{}-norm boundary", curve.k().label());
    writer.write_event(Event::Text(BytesText::new(&heading)))?;
    writer.write_event(Event::End(BytesEnd::new("text")))?;

    writer.write_event(Event::End(BytesEnd::new("svg")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// `M x0 y0 L x1 y1 ... Z` in canvas coordinates.
fn path_data(points: &[Point2], view: Viewport) -> String {
    let mut d = String::with_capacity(points.len() * 24);
    for (i, p) in points.iter().enumerate() {
        let command = if i == 0 { "M" } else { " L" };
        d.push_str(&format!("{command} {} {}", view.x(p.x), view.y(p.y)));
    }
    if !points.is_empty() {
        d.push_str(" Z");
    }
    d
}

fn write_empty(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attributes: &[(&str, String)],
) -> Result<(), ExportError> {
    let mut element = BytesStart::new(name);
    for (key, value) in attributes {
        element.push_attribute((*key, value.as_str()));
    }
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn write_line(writer: &mut Writer<Vec<u8>>, [x1, y1, x2, y2]: [f64; 4], stroke: &str) -> Result<(), ExportError> {
    write_empty(
        writer,
        "line",
        &[
            ("x1", x1.to_string()),
            ("y1", y1.to_string()),
            ("x2", x2.to_string()),
            ("y2", y2.to_string()),
            ("stroke", stroke.to_string()),
            ("stroke-width", "1".into()),
        ],
    )
}

fn write_label(writer: &mut Writer<Vec<u8>>, x: f64, y: f64, label: &str) -> Result<(), ExportError> {
    let mut text = BytesStart::new("text");
    text.push_attribute(("x", x.to_string().as_str()));
    text.push_attribute(("y", y.to_string().as_str()));
    text.push_attribute(("text-anchor", "middle"));
    text.push_attribute(("fill", TICK_COLOR));
    writer.write_event(Event::Start(text))?;
    writer.write_event(Event::Text(BytesText::new(label)))?;
    writer.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}
