//! SVG renderer for play diagrams
//! Renders the field, players and assignment paths as standalone SVG markup
//! Features:
//! - Line of scrimmage and yard lines
//! - Arrowheads on routes, end bars on blocks
//! - Selection ring and live drawing buffer for the authoring view
//! - Partial path reveal and caption for playback frames
//!
//! Rendering is a pure function of its inputs, so exports and tests never
//! depend on a live surface.

use std::fmt::Write as _;

use playkit_core::constants::{LINE_OF_SCRIMMAGE_Y, PLAYER_RADIUS};
use playkit_settings::Theme;

use crate::canvas::PlayerRef;
use crate::designer_state::DesignerState;
use crate::model::{AssignmentType, PathStyle, PlayDiagram, PlayerPosition, Point, Side};
use crate::playback::PlaybackFrame;
use crate::viewport::FieldTransform;

const YARD_LINE_SPACING: f64 = 5.0;
const PATH_WIDTH: f64 = 3.0;
const LABEL_FONT_SIZE: f64 = 12.0;

/// View flags that affect rendering but never the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub flipped: bool,
    pub show_defense: bool,
    pub theme: Theme,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            flipped: false,
            show_defense: true,
            theme: Theme::Field,
        }
    }
}

struct Palette {
    background: &'static str,
    markings: &'static str,
    scrimmage: &'static str,
    offense: &'static str,
    defense: &'static str,
    marker_text: &'static str,
    path: &'static str,
    selection: &'static str,
    drawing: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Field => Palette {
            background: "#2e7d32",
            markings: "#ffffff",
            scrimmage: "#90caf9",
            offense: "#1565c0",
            defense: "#c62828",
            marker_text: "#ffffff",
            path: "#fff176",
            selection: "#ffd600",
            drawing: "#ffffff",
        },
        Theme::Whiteboard => Palette {
            background: "#ffffff",
            markings: "#cfd8dc",
            scrimmage: "#1e88e5",
            offense: "#0d47a1",
            defense: "#b71c1c",
            marker_text: "#ffffff",
            path: "#212121",
            selection: "#ff6f00",
            drawing: "#546e7a",
        },
    }
}

/// Path geometry plus the decorations to draw it with.
struct PathSpec<'a> {
    side: Side,
    player_id: &'a str,
    kind: AssignmentType,
    style: PathStyle,
    points: &'a [Point],
    show_end_marker: bool,
}

/// Renders diagrams, sessions and playback frames to SVG.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    transform: FieldTransform,
    options: RenderOptions,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(FieldTransform::new(), RenderOptions::default())
    }
}

impl SvgRenderer {
    pub fn new(transform: FieldTransform, options: RenderOptions) -> Self {
        Self { transform, options }
    }

    /// A renderer matching a session's current view flags.
    pub fn for_session(state: &DesignerState, theme: Theme) -> Self {
        Self::new(
            *state.transform(),
            RenderOptions {
                flipped: state.is_flipped(),
                show_defense: state.show_defense(),
                theme,
            },
        )
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Renders a complete diagram with every path fully drawn.
    pub fn render_diagram(&self, diagram: &PlayDiagram) -> String {
        let paths = self.diagram_paths(diagram);
        let mut svg = self.open(&diagram.name);
        self.write_paths(&mut svg, &paths);
        self.write_players(&mut svg, &diagram.players.offense, Side::Offense);
        if self.options.show_defense {
            self.write_players(&mut svg, &diagram.players.defense, Side::Defense);
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Renders the authoring view: the diagram plus selection and the
    /// in-progress drawing buffer.
    pub fn render_session(&self, state: &DesignerState) -> String {
        let diagram = state.diagram();
        let paths = self.diagram_paths(diagram);
        let mut svg = self.open(&diagram.name);
        self.write_paths(&mut svg, &paths);
        self.write_players(&mut svg, &diagram.players.offense, Side::Offense);
        if self.options.show_defense {
            self.write_players(&mut svg, &diagram.players.defense, Side::Defense);
        }
        if let Some(selected) = state.selected_player() {
            self.write_selection(&mut svg, diagram, selected);
        }
        let drawing = state.display_drawing_path();
        if drawing.len() >= 2 {
            self.write_drawing(&mut svg, &drawing);
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Renders one playback frame with its caption.
    pub fn render_frame(&self, frame: &PlaybackFrame) -> String {
        let paths: Vec<PathSpec<'_>> = frame
            .paths
            .iter()
            .filter(|p| self.options.show_defense || p.side == Side::Offense)
            .map(|p| PathSpec {
                side: p.side,
                player_id: &p.player_id,
                kind: p.kind,
                style: p.style,
                points: &p.points,
                show_end_marker: p.show_arrow,
            })
            .collect();

        let mut svg = self.open(&frame.caption);
        self.write_paths(&mut svg, &paths);
        self.write_players(&mut svg, &frame.offense, Side::Offense);
        if self.options.show_defense {
            self.write_players(&mut svg, &frame.defense, Side::Defense);
        }
        self.write_caption(&mut svg, &frame.caption, frame.step, frame.total_steps);
        svg.push_str("</svg>\n");
        svg
    }

    fn diagram_paths<'a>(&self, diagram: &'a PlayDiagram) -> Vec<PathSpec<'a>> {
        let mut sides = vec![Side::Offense];
        if self.options.show_defense {
            sides.push(Side::Defense);
        }
        sides
            .into_iter()
            .flat_map(|side| {
                diagram
                    .assignments
                    .get(side)
                    .iter()
                    .filter(|a| a.is_drawable())
                    .map(move |a| PathSpec {
                        side,
                        player_id: &a.player_id,
                        kind: a.kind,
                        style: a.effective_style(),
                        points: &a.path,
                        show_end_marker: true,
                    })
            })
            .collect()
    }

    fn open(&self, title: &str) -> String {
        let (width, height) = self.transform.display_size();
        let colors = palette(self.options.theme);
        let mut svg = String::with_capacity(8 * 1024);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" aria-label="Play diagram">"#,
            w = fmt_num(width),
            h = fmt_num(height)
        );
        let _ = writeln!(svg, "<title>{}</title>", escape_xml(title));

        svg.push_str("<defs>\n");
        let _ = writeln!(
            svg,
            r#"<marker id="arrow" viewBox="0 0 10 10" refX="8" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/></marker>"#,
            colors.path
        );
        let _ = writeln!(
            svg,
            r#"<marker id="block-end" viewBox="0 0 10 10" refX="5" refY="5" markerWidth="6" markerHeight="6" orient="auto"><path d="M 5 0 L 5 10" stroke="{}" stroke-width="3"/></marker>"#,
            colors.path
        );
        svg.push_str("</defs>\n");

        let _ = writeln!(
            svg,
            r#"<rect class="field" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            fmt_num(width),
            fmt_num(height),
            colors.background
        );

        let (_, field_height) = self.transform.field_size();
        let mut yard = YARD_LINE_SPACING;
        while yard < field_height {
            let (_, y) = self.transform.to_display(0.0, yard, self.options.flipped);
            let _ = writeln!(
                svg,
                r#"<line class="yard-line" x1="0" y1="{y}" x2="{w}" y2="{y}" stroke="{}" stroke-width="1" stroke-opacity="0.35"/>"#,
                colors.markings,
                y = fmt_num(y),
                w = fmt_num(width)
            );
            yard += YARD_LINE_SPACING;
        }

        let (_, los) = self
            .transform
            .to_display(0.0, LINE_OF_SCRIMMAGE_Y, self.options.flipped);
        let _ = writeln!(
            svg,
            r#"<line class="line-of-scrimmage" x1="0" y1="{y}" x2="{w}" y2="{y}" stroke="{}" stroke-width="3"/>"#,
            colors.scrimmage,
            y = fmt_num(los),
            w = fmt_num(width)
        );
        svg
    }

    fn path_data(&self, points: &[Point]) -> String {
        let mut d = String::new();
        for (i, point) in points.iter().enumerate() {
            let (x, y) = self.transform.point_to_display(point, self.options.flipped);
            let command = if i == 0 { "M" } else { " L" };
            let _ = write!(d, "{} {} {}", command, fmt_num(x), fmt_num(y));
        }
        d
    }

    fn write_paths(&self, svg: &mut String, paths: &[PathSpec<'_>]) {
        let colors = palette(self.options.theme);
        for path in paths {
            let dash = path
                .style
                .dash_array()
                .map(|d| format!(r#" stroke-dasharray="{}""#, d))
                .unwrap_or_default();
            let marker = match (path.show_end_marker, path.kind) {
                (false, _) => "",
                (true, AssignmentType::Block) => r#" marker-end="url(#block-end)""#,
                (true, _) => r#" marker-end="url(#arrow)""#,
            };
            let _ = writeln!(
                svg,
                r#"<path class="assignment {side} {kind}" data-player="{id}" d="{d}" fill="none" stroke="{color}" stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round"{dash}{marker}/>"#,
                side = path.side,
                kind = path.kind,
                id = escape_xml(path.player_id),
                d = self.path_data(path.points),
                color = colors.path,
                width = fmt_num(PATH_WIDTH),
            );
        }
    }

    fn write_players(&self, svg: &mut String, players: &[PlayerPosition], side: Side) {
        let colors = palette(self.options.theme);
        let fill = match side {
            Side::Offense => colors.offense,
            Side::Defense => colors.defense,
        };
        let radius = PLAYER_RADIUS * self.transform.scale();

        for player in players {
            let (cx, cy) = self.transform.to_display(player.x, player.y, self.options.flipped);
            let _ = writeln!(
                svg,
                r#"<g class="player {side}" data-id="{id}"><circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}" stroke="{stroke}" stroke-width="2"/><text x="{cx}" y="{cy}" dy="0.35em" text-anchor="middle" font-family="sans-serif" font-size="{fs}" font-weight="bold" fill="{text}">{label}</text></g>"#,
                side = side,
                id = escape_xml(&player.id),
                cx = fmt_num(cx),
                cy = fmt_num(cy),
                r = fmt_num(radius),
                fill = fill,
                stroke = colors.markings,
                fs = fmt_num(LABEL_FONT_SIZE),
                text = colors.marker_text,
                label = escape_xml(&player.label),
            );
        }
    }

    fn write_selection(&self, svg: &mut String, diagram: &PlayDiagram, selected: &PlayerRef) {
        if selected.side == Side::Defense && !self.options.show_defense {
            return;
        }
        let Some(player) = diagram.player(selected.side, &selected.id) else {
            return;
        };
        let colors = palette(self.options.theme);
        let (cx, cy) = self.transform.to_display(player.x, player.y, self.options.flipped);
        let radius = PLAYER_RADIUS * self.transform.scale() + 4.0;
        let _ = writeln!(
            svg,
            r#"<circle class="selection" cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="3"/>"#,
            fmt_num(cx),
            fmt_num(cy),
            fmt_num(radius),
            colors.selection
        );
    }

    fn write_drawing(&self, svg: &mut String, points: &[Point]) {
        let colors = palette(self.options.theme);
        let _ = writeln!(
            svg,
            r#"<path class="drawing" d="{}" fill="none" stroke="{}" stroke-width="2" stroke-dasharray="6 4"/>"#,
            self.path_data(points),
            colors.drawing
        );
    }

    fn write_caption(&self, svg: &mut String, caption: &str, step: usize, total: usize) {
        let colors = palette(self.options.theme);
        let (_, height) = self.transform.display_size();
        let _ = writeln!(
            svg,
            r#"<text class="caption" x="12" y="{}" font-family="sans-serif" font-size="16" fill="{}">{} ({}/{})</text>"#,
            fmt_num(height - 12.0),
            colors.markings,
            escape_xml(caption),
            step,
            total
        );
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
