//! Board to SVG.
//!
//! [`render`] lays the visible part of a [`Board`] out on a canvas and
//! returns an [`SvgDocument`]: a flat list of elements in paint order
//! (background, grid lines, star points, stones, labels). Callers that only
//! need markup use [`SvgDocument::to_svg_string`].

use std::fmt::{self, Write};

use tracing::{debug, instrument};

use crate::board::Board;
use crate::coord;
use crate::theme::{ColorResolver, ColorRole, Layered, Palette};
use crate::types::{Bounds, Color, PointContent, Side};

const HOSHI_RADIUS_RATIO: f64 = 0.1;
const MIN_HOSHI_RADIUS: f64 = 2.0;
const LABEL_OFFSET_RATIO: f64 = 0.6;
const FONT_FAMILY: &str = "sans-serif";

/// Canvas and drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Stone radius as a fraction of half the cell size.
    pub stone_size_ratio: f64,
    pub line_width: f64,
    pub coordinate_font_size: f64,
    /// Smallest distance between grid lines. The canvas grows past the
    /// requested size rather than going below it.
    pub min_cell_size: f64,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            margin: 30.0,
            stone_size_ratio: 0.9,
            line_width: 1.0,
            coordinate_font_size: 12.0,
            min_cell_size: 18.0,
        }
    }
}

/// Where the grid lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Final canvas size, possibly larger than requested.
    pub width: f64,
    pub height: f64,
    /// Canvas position of the first visible intersection.
    pub origin_x: f64,
    pub origin_y: f64,
    pub step_x: f64,
    pub step_y: f64,
    /// Cell size used for stone and marker sizes.
    pub cell: f64,
    pub columns: usize,
    pub rows: usize,
}

impl Layout {
    pub fn compute(bounds: Bounds, params: &RenderParams) -> Self {
        let columns = bounds.columns();
        let rows = bounds.rows();
        let margin = params.margin.max(0.0);

        let mut usable_w = (params.width - 2.0 * margin).max(0.0);
        let mut usable_h = (params.height - 2.0 * margin).max(0.0);

        let need_w = gaps(columns) * params.min_cell_size;
        let need_h = gaps(rows) * params.min_cell_size;
        let scale = growth(need_w, usable_w).max(growth(need_h, usable_h));
        if scale.is_finite() {
            usable_w *= scale;
            usable_h *= scale;
        } else {
            usable_w = usable_w.max(need_w);
            usable_h = usable_h.max(need_h);
        }

        let step_x = if columns > 1 { usable_w / gaps(columns) } else { 0.0 };
        let step_y = if rows > 1 { usable_h / gaps(rows) } else { 0.0 };
        let origin_x = margin + if columns > 1 { 0.0 } else { usable_w / 2.0 };
        let origin_y = margin + if rows > 1 { 0.0 } else { usable_h / 2.0 };

        let cell = match (step_x > 0.0, step_y > 0.0) {
            (true, true) => step_x.min(step_y),
            (true, false) => step_x,
            (false, true) => step_y,
            (false, false) => usable_w.min(usable_h),
        };
        let cell = if cell > 0.0 { cell } else { params.min_cell_size };

        Self {
            width: usable_w + 2.0 * margin,
            height: usable_h + 2.0 * margin,
            origin_x,
            origin_y,
            step_x,
            step_y,
            cell,
            columns,
            rows,
        }
    }

    /// Canvas x of the `col`-th visible column.
    pub fn x(&self, col: usize) -> f64 {
        self.origin_x + col as f64 * self.step_x
    }

    /// Canvas y of the `row`-th visible row.
    pub fn y(&self, row: usize) -> f64 {
        self.origin_y + row as f64 * self.step_y
    }

    fn right(&self) -> f64 {
        self.x(self.columns - 1)
    }

    fn bottom(&self) -> f64 {
        self.y(self.rows - 1)
    }
}

fn gaps(lines: usize) -> f64 {
    lines.saturating_sub(1) as f64
}

/// Factor by which `have` must grow to reach `need`.
fn growth(need: f64, have: f64) -> f64 {
    if need <= have {
        1.0
    } else if have > 0.0 {
        need / have
    } else {
        f64::INFINITY
    }
}

/// What a circle stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleKind {
    Hoshi,
    Stone(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
    },
    Circle {
        kind: CircleKind,
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
        stroke: Option<String>,
        stroke_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        font_size: f64,
        fill: String,
    },
}

/// Rendered image.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<Element>,
}

impl SvgDocument {
    pub fn to_svg_string(&self) -> String {
        self.to_string()
    }

    pub fn circles(&self, kind: CircleKind) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |e| matches!(e, Element::Circle { kind: k, .. } if *k == kind))
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = (num(self.width), num(self.height));
        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        for element in &self.elements {
            f.write_char('\n')?;
            write_element(f, element)?;
        }
        f.write_str("\n</svg>")
    }
}

fn write_element(f: &mut fmt::Formatter<'_>, element: &Element) -> fmt::Result {
    match element {
        Element::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => write!(
            f,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            num(*x),
            num(*y),
            num(*width),
            num(*height),
            escape(fill)
        ),
        Element::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => write!(
            f,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            num(*x1),
            num(*y1),
            num(*x2),
            num(*y2),
            escape(stroke),
            num(*stroke_width)
        ),
        Element::Circle {
            kind,
            cx,
            cy,
            r,
            fill,
            stroke,
            stroke_width,
        } => {
            let class = match kind {
                CircleKind::Hoshi => "hoshi",
                CircleKind::Stone(Color::Black) => "stone black",
                CircleKind::Stone(Color::White) => "stone white",
            };
            write!(
                f,
                r#"<circle class="{class}" cx="{}" cy="{}" r="{}" fill="{}""#,
                num(*cx),
                num(*cy),
                num(*r),
                escape(fill)
            )?;
            if let Some(stroke) = stroke {
                write!(
                    f,
                    r#" stroke="{}" stroke-width="{}""#,
                    escape(stroke),
                    num(*stroke_width)
                )?;
            }
            f.write_str("/>")
        }
        Element::Text {
            x,
            y,
            content,
            font_size,
            fill,
        } => write!(
            f,
            r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
            num(*x),
            num(*y),
            num(*font_size),
            escape(fill),
            escape(content)
        ),
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Draws the board's visible region.
///
/// Star points are drawn only on empty intersections. Black stones get a
/// stroke in the black-stroke color; white stones always get an outline so
/// they stay visible on light backgrounds.
#[instrument(level = "trace", skip_all)]
pub fn render(board: &Board, params: &RenderParams, colors: &dyn ColorResolver) -> SvgDocument {
    let fallback = Palette::default();
    let colors = Layered::new(colors, &fallback);
    let bounds = board.boundaries();
    let layout = Layout::compute(bounds, params);
    let mut elements = Vec::new();

    elements.push(Element::Rect {
        x: 0.0,
        y: 0.0,
        width: layout.width,
        height: layout.height,
        fill: colors.color(ColorRole::Background).to_string(),
    });

    draw_grid(&mut elements, &layout, params, &colors);
    draw_points(&mut elements, board, &layout, params, &colors);
    draw_labels(&mut elements, board, &layout, params, &colors);

    debug!(
        width = layout.width,
        height = layout.height,
        elements = elements.len(),
        "rendered board"
    );

    SvgDocument {
        width: layout.width,
        height: layout.height,
        elements,
    }
}

fn draw_grid(
    elements: &mut Vec<Element>,
    layout: &Layout,
    params: &RenderParams,
    colors: &Layered<'_>,
) {
    let stroke = colors.color(ColorRole::Line);

    for col in 0..layout.columns {
        let x = layout.x(col);
        elements.push(Element::Line {
            x1: x,
            y1: layout.y(0),
            x2: x,
            y2: layout.bottom(),
            stroke: stroke.to_string(),
            stroke_width: params.line_width,
        });
    }

    for row in 0..layout.rows {
        let y = layout.y(row);
        elements.push(Element::Line {
            x1: layout.x(0),
            y1: y,
            x2: layout.right(),
            y2: y,
            stroke: stroke.to_string(),
            stroke_width: params.line_width,
        });
    }
}

fn draw_points(
    elements: &mut Vec<Element>,
    board: &Board,
    layout: &Layout,
    params: &RenderParams,
    colors: &Layered<'_>,
) {
    let bounds = board.boundaries();
    let visible = move || {
        (bounds.min.y..=bounds.max.y)
            .flat_map(move |y| (bounds.min.x..=bounds.max.x).map(move |x| (x, y)))
    };

    let hoshi_radius = (layout.cell * HOSHI_RADIUS_RATIO).max(MIN_HOSHI_RADIUS);
    for (x, y) in visible() {
        let Some(point) = board.point(x, y) else { continue };
        if point.has_hoshi && point.content == PointContent::Empty {
            elements.push(Element::Circle {
                kind: CircleKind::Hoshi,
                cx: layout.x(x - bounds.min.x),
                cy: layout.y(y - bounds.min.y),
                r: hoshi_radius,
                fill: colors.color(ColorRole::Hoshi).to_string(),
                stroke: None,
                stroke_width: 0.0,
            });
        }
    }

    let stone_radius = layout.cell / 2.0 * params.stone_size_ratio;
    for (x, y) in visible() {
        let Some(point) = board.point(x, y) else { continue };
        let (color, fill, stroke) = match point.content {
            PointContent::Empty => continue,
            PointContent::Black => (Color::Black, ColorRole::BlackStone, ColorRole::BlackStroke),
            PointContent::White => (Color::White, ColorRole::WhiteStone, ColorRole::WhiteStroke),
        };
        elements.push(Element::Circle {
            kind: CircleKind::Stone(color),
            cx: layout.x(x - bounds.min.x),
            cy: layout.y(y - bounds.min.y),
            r: stone_radius,
            fill: colors.color(fill).to_string(),
            stroke: Some(colors.color(stroke).to_string()),
            stroke_width: params.line_width,
        });
    }
}

fn draw_labels(
    elements: &mut Vec<Element>,
    board: &Board,
    layout: &Layout,
    params: &RenderParams,
    colors: &Layered<'_>,
) {
    let sides = board.coordinate_sides();
    if sides.is_empty() {
        return;
    }

    let bounds = board.boundaries();
    let fill = colors.color(ColorRole::Text);
    let font_size = params.coordinate_font_size;
    // Labels are centered on their anchor, so half a font height must still
    // fit inside the margin.
    let room = (params.margin - font_size / 2.0).max(0.0);
    let offset = (layout.cell * LABEL_OFFSET_RATIO)
        .max(font_size * 0.8)
        .min(room);
    let mut label = |x: f64, y: f64, content: String| {
        elements.push(Element::Text {
            x,
            y,
            content,
            font_size,
            fill: fill.to_string(),
        });
    };

    for side in Side::ALL.into_iter().filter(|side| sides.contains(*side)) {
        match side {
            Side::Top | Side::Bottom => {
                let y = if side == Side::Top {
                    layout.y(0) - offset
                } else {
                    layout.bottom() + offset
                };
                for col in 0..layout.columns {
                    if let Some(letter) = coord::column_letter(bounds.min.x + col) {
                        label(layout.x(col), y, letter.to_string());
                    }
                }
            }
            Side::Left | Side::Right => {
                let x = if side == Side::Left {
                    layout.x(0) - offset
                } else {
                    layout.right() + offset
                };
                for row in 0..layout.rows {
                    label(x, layout.y(row), coord::row_label(bounds.min.y + row));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseDefaults, parse};
    use crate::types::{BoardSize, Coord, CoordinateSides, Point};

    fn board_from(input: &str) -> Board {
        Board::from_parse(&parse(input, &ParseDefaults::default()))
    }

    fn params(width: f64, height: f64, margin: f64) -> RenderParams {
        RenderParams {
            width,
            height,
            margin,
            ..RenderParams::default()
        }
    }

    fn count(doc: &SvgDocument, pred: impl Fn(&Element) -> bool) -> usize {
        doc.elements.iter().filter(|&e| pred(e)).count()
    }

    fn centers(doc: &SvgDocument, kind: CircleKind) -> Vec<(f64, f64)> {
        doc.circles(kind)
            .map(|e| match e {
                Element::Circle { cx, cy, .. } => (*cx, *cy),
                _ => unreachable!(),
            })
            .collect()
    }

    fn vertical(e: &Element) -> bool {
        matches!(e, Element::Line { x1, x2, .. } if x1 == x2)
    }

    fn horizontal(e: &Element) -> bool {
        matches!(e, Element::Line { y1, y2, .. } if y1 == y2)
    }

    #[test]
    fn empty_nine_by_nine_structure() {
        let board = board_from("size 9x9");
        let doc = render(&board, &params(200.0, 200.0, 20.0), &Palette::default());

        assert_eq!(count(&doc, |e| matches!(e, Element::Rect { .. })), 1);
        assert_eq!(count(&doc, vertical), 9);
        assert_eq!(count(&doc, horizontal), 9);
        assert_eq!(doc.circles(CircleKind::Stone(Color::Black)).count(), 0);
        assert_eq!(doc.circles(CircleKind::Stone(Color::White)).count(), 0);
        assert_eq!(count(&doc, |e| matches!(e, Element::Text { .. })), 0);

        // step = (200 - 40) / 8 = 20, so column c sits at 20 + 20c.
        assert_eq!(
            centers(&doc, CircleKind::Hoshi),
            vec![(60.0, 60.0), (140.0, 60.0), (100.0, 100.0), (60.0, 140.0), (140.0, 140.0)]
        );
        assert_eq!((doc.width, doc.height), (200.0, 200.0));
    }

    #[test]
    fn background_covers_whole_canvas() {
        let board = board_from("size 5x5");
        let doc = render(&board, &params(200.0, 160.0, 20.0), &Palette::default());

        assert_eq!(
            doc.elements[0],
            Element::Rect {
                x: 0.0,
                y: 0.0,
                width: 200.0,
                height: 160.0,
                fill: "#DCB35C".to_string(),
            }
        );
    }

    #[test]
    fn stones_are_drawn_and_hide_hoshi() {
        let board = board_from("size 9x9\nB E5\nW A1");
        let doc = render(&board, &params(200.0, 200.0, 20.0), &Palette::default());

        assert_eq!(centers(&doc, CircleKind::Stone(Color::Black)), vec![(100.0, 100.0)]);
        assert_eq!(centers(&doc, CircleKind::Stone(Color::White)), vec![(20.0, 20.0)]);
        assert_eq!(doc.circles(CircleKind::Hoshi).count(), 4);
    }

    #[test]
    fn white_stones_keep_an_outline() {
        let board = board_from("size 9x9\nW A1");
        let doc = render(&board, &params(200.0, 200.0, 20.0), &Palette::default());

        let Some(Element::Circle { fill, stroke, r, .. }) =
            doc.circles(CircleKind::Stone(Color::White)).next()
        else {
            panic!("missing white stone");
        };
        assert_eq!(fill, "#FFFFFF");
        assert_eq!(stroke.as_deref(), Some("#000000"));
        assert!((r - 9.0).abs() < 1e-9);
    }

    #[test]
    fn labels_follow_configured_sides() {
        let board = board_from("size 9x9\ncoordinates top,left");
        let doc = render(&board, &params(200.0, 200.0, 20.0), &Palette::default());

        let texts: Vec<&str> = doc
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(texts.len(), 18);
        assert_eq!(&texts[..9], &["A", "B", "C", "D", "E", "F", "G", "H", "J"]);
        assert_eq!(texts[9], "1");
        assert_eq!(texts[17], "9");
    }

    fn labels(doc: &SvgDocument) -> Vec<(f64, f64, &str)> {
        doc.elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { x, y, content, .. } => Some((*x, *y, content.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn labels_stay_on_canvas_with_default_params() {
        for size in [5, 9, 13, 19] {
            let board = board_from(&format!("size {size}x{size}\ncoordinates on"));
            let doc = render(&board, &RenderParams::default(), &Palette::default());
            let half_font = RenderParams::default().coordinate_font_size / 2.0 - 1e-6;

            let texts = labels(&doc);
            assert_eq!(texts.len(), 4 * size);
            for (x, y, content) in texts {
                assert!(
                    x - half_font >= 0.0 && x + half_font <= doc.width,
                    "{size}x{size} label {content} at x={x}"
                );
                assert!(
                    y - half_font >= 0.0 && y + half_font <= doc.height,
                    "{size}x{size} label {content} at y={y}"
                );
            }
        }
    }

    #[test]
    fn label_offset_is_limited_by_margin() {
        let board = board_from("size 5x5\ncoordinates top,left");
        let doc = render(&board, &RenderParams::default(), &Palette::default());

        // cell = 340 / 4 = 85 would put labels 51px out; the 30px margin
        // leaves room for 30 - 6 = 24.
        let texts = labels(&doc);
        assert_eq!(texts[0], (30.0, 6.0, "A"));
        assert_eq!(texts[5], (6.0, 30.0, "1"));
    }

    #[test]
    fn large_board_grows_canvas_to_minimum_cell() {
        let board = board_from("size 19x19");
        let doc = render(&board, &params(200.0, 200.0, 20.0), &Palette::default());

        // 18 gaps * 18px minimum cell + 2 * 20px margin.
        assert!((doc.width - 364.0).abs() < 1e-9);
        assert!((doc.height - 364.0).abs() < 1e-9);
        assert_eq!(count(&doc, vertical), 19);
    }

    #[test]
    fn viewport_limits_lines_and_keeps_real_labels() {
        let board = board_from("size 19x19\nviewport K10-T19\ncoordinates bottom\nB A1, Q16");
        let doc = render(&board, &params(400.0, 400.0, 30.0), &Palette::default());

        assert_eq!(count(&doc, vertical), 10);
        assert_eq!(count(&doc, horizontal), 10);
        assert_eq!(doc.circles(CircleKind::Stone(Color::Black)).count(), 1);
        // Four star points are in view; the one at Q16 is covered by the stone.
        assert_eq!(doc.circles(CircleKind::Hoshi).count(), 3);

        let first_label = doc.elements.iter().find_map(|e| match e {
            Element::Text { content, .. } => Some(content.clone()),
            _ => None,
        });
        assert_eq!(first_label.as_deref(), Some("K"));
    }

    #[test]
    fn single_intersection_board_is_centered() {
        let board = board_from("size 1x1\nB A1");
        let doc = render(&board, &params(100.0, 100.0, 10.0), &Palette::default());

        assert_eq!(count(&doc, |e| matches!(e, Element::Line { .. })), 2);
        assert_eq!(centers(&doc, CircleKind::Stone(Color::Black)), vec![(50.0, 50.0)]);
    }

    #[test]
    fn resolver_colors_are_used() {
        struct Dark;
        impl ColorResolver for Dark {
            fn resolve(&self, role: ColorRole) -> Option<&str> {
                match role {
                    ColorRole::Background => Some("#1e1e1e"),
                    ColorRole::Line => Some("#cccccc"),
                    _ => None,
                }
            }
        }

        let board = board_from("size 5x5");
        let svg = render(&board, &RenderParams::default(), &Dark).to_svg_string();

        assert!(svg.contains(r##"fill="#1e1e1e""##));
        assert!(svg.contains(r##"stroke="#cccccc""##));
    }

    #[test]
    fn svg_markup_is_well_formed() {
        let board = board_from("size 9x9\nB C3\ncoordinates on");
        let svg = render(&board, &params(200.0, 200.0, 20.0), &Palette::default()).to_svg_string();

        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200""#
        ));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<line ").count(), 18);
        assert_eq!(svg.matches(r#"class="stone black""#).count(), 1);
        assert_eq!(svg.matches("<text ").count(), 36);
    }

    #[test]
    fn explicit_board_renders_without_star_points() {
        let mut points = vec![vec![Point::default(); 3]; 2];
        points[1][2].content = PointContent::White;
        let board = Board::from_points(points, CoordinateSides::NONE, None).unwrap();
        let doc = render(&board, &params(100.0, 100.0, 10.0), &Palette::default());

        assert_eq!(board.size(), BoardSize::new(3, 2));
        assert_eq!(count(&doc, vertical), 3);
        assert_eq!(count(&doc, horizontal), 2);
        assert_eq!(centers(&doc, CircleKind::Stone(Color::White)), vec![(90.0, 90.0)]);
        assert!(board.boundaries().contains(Coord::new(2, 1)));
    }

    #[test]
    fn number_formatting_trims_zeros() {
        assert_eq!(num(20.0), "20");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
    }
}
