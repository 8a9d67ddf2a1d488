//! Per-variant mark parameters and their [`MarkShape`] implementations.
//!
//! Angles are in degrees, measured clockwise from the +x axis (screen space
//! has y pointing down).

#[cfg(test)]
#[path = "variants_test.rs"]
mod variants_test;

use serde::{Deserialize, Serialize};

use crate::config::{SizeLimits, bounded};
use crate::hit::{ControlHandle, Edge, HandleMetrics};
use crate::mark::{Bounds, ControlDrag, DragError, MarkShape};
use crate::mirror::MirrorDirection;
use crate::viewport::Point;

const MIN_FONT_SIZE: f64 = 1.0;
const MIN_DOT_PITCH: f64 = 0.5;
const MAX_DOT_PITCH: f64 = 50.0;
const MIN_DOT_DIAMETER: f64 = 0.1;
const MATRIX_COLUMNS: (u32, u32) = (3, 16);
const MATRIX_ROWS: (u32, u32) = (5, 24);

// =============================================================================
// HELPERS
// =============================================================================

fn direction(deg: f64) -> Point {
    let rad = deg.to_radians();
    Point::new(rad.cos(), rad.sin())
}

fn at_angle(center: Point, radius: f64, deg: f64) -> Point {
    let dir = direction(deg);
    Point::new(center.x + dir.x * radius, center.y + dir.y * radius)
}

fn angle_to(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}

/// Normalize into `[0, 360)`.
fn normalize_deg(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 { 0.0 } else { d }
}

fn reverse_chars(text: &mut String) {
    *text = text.chars().rev().collect();
}

fn char_count(text: &str) -> f64 {
    f64::from(u32::try_from(text.chars().count()).unwrap_or(u32::MAX).max(1))
}

fn edge_controls(bounds: &Bounds) -> impl Iterator<Item = (ControlHandle, Point)> + '_ {
    Edge::ALL.into_iter().map(move |edge| (ControlHandle::Edge(edge), edge.anchor(bounds)))
}

/// Drag one side or corner of `bounds` to `p`, keeping the opposite side fixed.
fn drag_edge(bounds: &mut Bounds, edge: Edge, p: Point, limits: &SizeLimits) {
    let (right, bottom) = (bounds.right(), bounds.bottom());
    if edge.moves_left() {
        let width = limits.clamp(right - p.x);
        bounds.x = right - width;
        bounds.width = width;
    }
    if edge.moves_right() {
        bounds.width = limits.clamp(p.x - bounds.x);
    }
    if edge.moves_top() {
        let height = limits.clamp(bottom - p.y);
        bounds.y = bottom - height;
        bounds.height = height;
    }
    if edge.moves_bottom() {
        bounds.height = limits.clamp(p.y - bounds.y);
    }
}

/// Distance from `p` to the segment `a`–`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b.minus(a);
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + ab.x * t, a.y + ab.y * t))
}

// =============================================================================
// TEXT
// =============================================================================

/// Plain single-line text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMark {
    pub text: String,
    pub font: String,
    pub font_size: f64,
    pub char_spacing: f64,
    /// Rendered upside down (vertical mirror).
    pub flipped_vertical: bool,
}

impl TextMark {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), font: "Standard".to_owned(), font_size: 24.0, char_spacing: 0.0, flipped_vertical: false }
    }
}

impl MarkShape for TextMark {
    fn label(&self) -> &'static str {
        "text"
    }

    fn controls(&self, bounds: &Bounds, _metrics: &HandleMetrics) -> Vec<(ControlHandle, Point)> {
        edge_controls(bounds).collect()
    }

    fn apply_control(
        &mut self,
        bounds: &mut Bounds,
        handle: ControlHandle,
        drag: &mut ControlDrag,
        limits: &SizeLimits,
    ) -> Result<(), DragError> {
        let ControlHandle::Edge(edge) = handle else {
            return Err(DragError::UnsupportedHandle { variant: self.label(), handle });
        };
        let old_height = bounds.height;
        drag_edge(bounds, edge, drag.pointer, limits);
        if old_height > 0.0 {
            self.font_size = (self.font_size * bounds.height / old_height).max(MIN_FONT_SIZE);
        }
        Ok(())
    }

    fn is_text_bearing(&self) -> bool {
        true
    }

    fn default_mirror(&self, _bounds: &Bounds) -> MirrorDirection {
        MirrorDirection::Horizontal
    }

    fn mirror_content(&mut self, direction: MirrorDirection) {
        match direction {
            MirrorDirection::Horizontal => reverse_chars(&mut self.text),
            MirrorDirection::Vertical => self.flipped_vertical = !self.flipped_vertical,
        }
    }
}

// =============================================================================
// ARC LETTERS
// =============================================================================

/// Text laid out along a circular arc centered on the mark's bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcLetters {
    pub text: String,
    /// Glyph band height, measured inward from the rim.
    pub text_size: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub rotation: f64,
}

impl ArcLetters {
    #[must_use]
    pub fn new(text: impl Into<String>, radius: f64) -> Self {
        Self { text: text.into(), text_size: radius * 0.25, radius, start_angle: 180.0, end_angle: 360.0, rotation: 0.0 }
    }

    /// Angular midpoint of the arc, following it clockwise from start to end.
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        let mut end = self.end_angle;
        if end < self.start_angle {
            end += 360.0;
        }
        (self.start_angle + end) * 0.5
    }
}

impl MarkShape for ArcLetters {
    fn label(&self) -> &'static str {
        "arc letters"
    }

    fn controls(&self, bounds: &Bounds, metrics: &HandleMetrics) -> Vec<(ControlHandle, Point)> {
        let c = bounds.center();
        let mid = self.mid_angle() + self.rotation;
        vec![
            (ControlHandle::Rotation, at_angle(c, self.radius + metrics.rotate_offset, self.rotation - 90.0)),
            (ControlHandle::StartAngle, at_angle(c, self.radius, self.start_angle + self.rotation)),
            (ControlHandle::EndAngle, at_angle(c, self.radius, self.end_angle + self.rotation)),
            (ControlHandle::Radius, at_angle(c, self.radius, mid)),
            (ControlHandle::TextSize, at_angle(c, self.radius - self.text_size, mid)),
        ]
    }

    fn contains(&self, bounds: &Bounds, p: Point, tolerance: f64) -> bool {
        bounds.center().distance(p) <= self.radius + tolerance
    }

    fn apply_control(
        &mut self,
        bounds: &mut Bounds,
        handle: ControlHandle,
        drag: &mut ControlDrag,
        limits: &SizeLimits,
    ) -> Result<(), DragError> {
        let c = bounds.center();
        let p = drag.pointer;
        match handle {
            ControlHandle::Rotation => self.rotation = normalize_deg(angle_to(c, p) + 90.0),
            ControlHandle::StartAngle => self.start_angle = normalize_deg(angle_to(c, p) - self.rotation),
            ControlHandle::EndAngle => self.end_angle = normalize_deg(angle_to(c, p) - self.rotation),
            ControlHandle::Radius => {
                let r = bounded(c.distance(p), limits.min_size * 0.5, limits.max_size * 0.5);
                self.radius = r;
                self.text_size = self.text_size.min(r);
                *bounds = Bounds::new(c.x - r, c.y - r, r * 2.0, r * 2.0);
            }
            ControlHandle::TextSize => {
                self.text_size = (self.radius - c.distance(p)).clamp(MIN_FONT_SIZE, self.radius.max(MIN_FONT_SIZE));
            }
            _ => return Err(DragError::UnsupportedHandle { variant: self.label(), handle }),
        }
        Ok(())
    }

    fn on_resized(&mut self, bounds: &mut Bounds, _limits: &SizeLimits) {
        self.radius = bounds.width.min(bounds.height) * 0.5;
        self.text_size = self.text_size.min(self.radius);
    }

    fn is_text_bearing(&self) -> bool {
        true
    }

    fn default_mirror(&self, _bounds: &Bounds) -> MirrorDirection {
        MirrorDirection::Horizontal
    }

    fn mirror_content(&mut self, direction: MirrorDirection) {
        let (start, end) = (self.start_angle, self.end_angle);
        match direction {
            MirrorDirection::Horizontal => {
                reverse_chars(&mut self.text);
                self.start_angle = normalize_deg(180.0 - end);
                self.end_angle = normalize_deg(180.0 - start);
            }
            MirrorDirection::Vertical => {
                self.start_angle = normalize_deg(-end);
                self.end_angle = normalize_deg(-start);
            }
        }
        self.rotation = normalize_deg(-self.rotation);
    }
}

// =============================================================================
// BOW TEXT
// =============================================================================

/// Text bent along a shallow bow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowText {
    pub text: String,
    pub font_size: f64,
    /// Bow depth in world units; positive bulges upward.
    pub bow: f64,
    /// Bow opens downward instead of upward (vertical mirror).
    pub inverted: bool,
}

impl BowText {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), font_size: 24.0, bow: 10.0, inverted: false }
    }
}

impl MarkShape for BowText {
    fn label(&self) -> &'static str {
        "bow text"
    }

    fn controls(&self, bounds: &Bounds, metrics: &HandleMetrics) -> Vec<(ControlHandle, Point)> {
        let mut controls: Vec<_> = edge_controls(bounds).collect();
        let top = bounds.y - metrics.rotate_offset - self.bow;
        controls.push((ControlHandle::Curvature, Point::new(bounds.center().x, top)));
        controls
    }

    fn apply_control(
        &mut self,
        bounds: &mut Bounds,
        handle: ControlHandle,
        drag: &mut ControlDrag,
        limits: &SizeLimits,
    ) -> Result<(), DragError> {
        match handle {
            ControlHandle::Edge(edge) => drag_edge(bounds, edge, drag.pointer, limits),
            ControlHandle::Curvature => {
                // Dragging up deepens the bow.
                let delta = drag.anchor.y - drag.pointer.y;
                self.bow = bounded(self.bow + delta, -bounds.height, bounds.height);
                drag.anchor = drag.pointer;
            }
            _ => return Err(DragError::UnsupportedHandle { variant: self.label(), handle }),
        }
        Ok(())
    }

    fn on_resized(&mut self, bounds: &mut Bounds, _limits: &SizeLimits) {
        self.bow = bounded(self.bow, -bounds.height, bounds.height);
    }

    fn is_text_bearing(&self) -> bool {
        true
    }

    fn default_mirror(&self, _bounds: &Bounds) -> MirrorDirection {
        MirrorDirection::Horizontal
    }

    fn mirror_content(&mut self, direction: MirrorDirection) {
        match direction {
            MirrorDirection::Horizontal => reverse_chars(&mut self.text),
            MirrorDirection::Vertical => self.inverted = !self.inverted,
        }
    }
}

// =============================================================================
// RULER
// =============================================================================

/// Graduated scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    /// Value range covered by the ruler's length.
    pub span: f64,
    pub divisions: u32,
    /// Height of the major ticks, from the top edge.
    pub scale_size: f64,
    /// Vertical offset of the numbers, from the top edge.
    pub number_offset: f64,
}

impl Default for Ruler {
    fn default() -> Self {
        Self { span: 10.0, divisions: 10, scale_size: 10.0, number_offset: 20.0 }
    }
}

impl MarkShape for Ruler {
    fn label(&self) -> &'static str {
        "ruler"
    }

    fn controls(&self, bounds: &Bounds, _metrics: &HandleMetrics) -> Vec<(ControlHandle, Point)> {
        let (cx, cy) = (bounds.center().x, bounds.center().y);
        vec![
            (ControlHandle::Position, Point::new(bounds.x, bounds.y)),
            (ControlHandle::Length, Point::new(bounds.right(), cy)),
            (ControlHandle::Height, Point::new(cx, bounds.bottom())),
            (ControlHandle::ScaleSize, Point::new(bounds.x + bounds.width * 0.25, bounds.y + self.scale_size)),
            (ControlHandle::NumberOffset, Point::new(bounds.x + bounds.width * 0.75, bounds.y + self.number_offset)),
        ]
    }

    fn apply_control(
        &mut self,
        bounds: &mut Bounds,
        handle: ControlHandle,
        drag: &mut ControlDrag,
        limits: &SizeLimits,
    ) -> Result<(), DragError> {
        let p = drag.pointer;
        match handle {
            ControlHandle::Position => {
                bounds.x += p.x - drag.anchor.x;
                bounds.y += p.y - drag.anchor.y;
                drag.anchor = p;
            }
            ControlHandle::Length => bounds.width = limits.clamp(p.x - bounds.x),
            ControlHandle::Height => {
                bounds.height = limits.clamp(p.y - bounds.y);
                self.on_resized(bounds, limits);
            }
            ControlHandle::ScaleSize => self.scale_size = bounded(p.y - bounds.y, MIN_FONT_SIZE, bounds.height),
            ControlHandle::NumberOffset => self.number_offset = bounded(p.y - bounds.y, 0.0, bounds.height),
            _ => return Err(DragError::UnsupportedHandle { variant: self.label(), handle }),
        }
        Ok(())
    }

    fn on_resized(&mut self, bounds: &mut Bounds, _limits: &SizeLimits) {
        self.scale_size = self.scale_size.min(bounds.height);
        self.number_offset = self.number_offset.min(bounds.height);
    }

    fn supports_mirror(&self) -> bool {
        false
    }
}

// =============================================================================
// DOT MATRIX
// =============================================================================

/// Text rendered as a grid of dots, one `columns` x `rows` cell per character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotMatrix {
    pub text: String,
    pub dot_pitch: f64,
    pub dot_diameter: f64,
    pub columns: u32,
    pub rows: u32,
}

impl DotMatrix {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), dot_pitch: 4.0, dot_diameter: 3.0, columns: 5, rows: 7 }
    }

    /// Bounds implied by the text length, matrix size, and pitch, anchored at `bounds`' origin.
    ///
    /// The pitch is pulled in first so that both sides land inside the size
    /// limits; when the limits cannot hold both, the maximum wins.
    pub fn fit_bounds(&mut self, bounds: &mut Bounds, limits: &SizeLimits) {
        let across = char_count(&self.text) * f64::from(self.columns + 1);
        let down = f64::from(self.rows.max(1));
        let lo = MIN_DOT_PITCH.max(limits.min_size / across.min(down));
        let hi = MAX_DOT_PITCH.min(limits.max_size / across.max(down));
        self.dot_pitch = bounded(self.dot_pitch, lo, hi);
        self.dot_diameter = self.dot_diameter.min(self.dot_pitch);
        bounds.width = across * self.dot_pitch;
        bounds.height = down * self.dot_pitch;
    }

    fn step_pitch(&mut self, step: f64) {
        self.dot_pitch = (self.dot_pitch + step).clamp(MIN_DOT_PITCH, MAX_DOT_PITCH);
        self.dot_diameter = self.dot_diameter.min(self.dot_pitch);
    }
}

/// Consume whole dead-zone steps from `accum`, returning the signed step count.
fn take_steps(accum: &mut f64, dead_zone: f64) -> i32 {
    if dead_zone <= 0.0 || !dead_zone.is_finite() {
        return 0;
    }
    let mut steps = 0;
    while accum.abs() > dead_zone {
        let sign = accum.signum();
        *accum -= sign * dead_zone;
        steps += if sign > 0.0 { 1 } else { -1 };
    }
    steps
}

fn step_count(value: u32, steps: i32, (lo, hi): (u32, u32)) -> u32 {
    let stepped = i64::from(value) + i64::from(steps);
    u32::try_from(stepped.clamp(i64::from(lo), i64::from(hi))).unwrap_or(lo)
}

impl MarkShape for DotMatrix {
    fn label(&self) -> &'static str {
        "dot matrix"
    }

    fn controls(&self, bounds: &Bounds, _metrics: &HandleMetrics) -> Vec<(ControlHandle, Point)> {
        let c = bounds.center();
        vec![
            (ControlHandle::MatrixSize, Point::new(bounds.right(), bounds.y)),
            (ControlHandle::DotPitch, Point::new(bounds.right(), c.y)),
            (ControlHandle::DotDiameter, Point::new(c.x, bounds.bottom())),
        ]
    }

    fn apply_control(
        &mut self,
        bounds: &mut Bounds,
        handle: ControlHandle,
        drag: &mut ControlDrag,
        limits: &SizeLimits,
    ) -> Result<(), DragError> {
        let delta = drag.pointer.minus(drag.anchor);
        match handle {
            ControlHandle::DotPitch => {
                self.step_pitch(delta.x / limits.step_divisor);
                self.fit_bounds(bounds, limits);
            }
            ControlHandle::DotDiameter => {
                self.dot_diameter =
                    bounded(self.dot_diameter + delta.y / limits.step_divisor, MIN_DOT_DIAMETER, self.dot_pitch);
            }
            ControlHandle::MatrixSize => {
                drag.accum = drag.accum.plus(delta);
                let dx = take_steps(&mut drag.accum.x, limits.matrix_dead_zone);
                let dy = take_steps(&mut drag.accum.y, limits.matrix_dead_zone);
                self.columns = step_count(self.columns, dx, MATRIX_COLUMNS);
                self.rows = step_count(self.rows, dy, MATRIX_ROWS);
                self.fit_bounds(bounds, limits);
            }
            _ => return Err(DragError::UnsupportedHandle { variant: self.label(), handle }),
        }
        drag.anchor = drag.pointer;
        Ok(())
    }

    fn on_resized(&mut self, bounds: &mut Bounds, limits: &SizeLimits) {
        let per_width = bounds.width / (char_count(&self.text) * f64::from(self.columns + 1));
        let per_height = bounds.height / f64::from(self.rows.max(1));
        self.dot_pitch = per_width.min(per_height).clamp(MIN_DOT_PITCH, MAX_DOT_PITCH);
        self.fit_bounds(bounds, limits);
    }

    fn is_text_bearing(&self) -> bool {
        true
    }

    fn default_mirror(&self, _bounds: &Bounds) -> MirrorDirection {
        MirrorDirection::Horizontal
    }

    fn mirror_content(&mut self, direction: MirrorDirection) {
        if direction == MirrorDirection::Horizontal {
            reverse_chars(&mut self.text);
        }
    }
}

// =============================================================================
// SIMPLE SHAPES
// =============================================================================

/// Grid chart frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub columns: u32,
    pub rows: u32,
    pub line_width: f64,
}

impl Default for Graph {
    fn default() -> Self {
        Self { columns: 4, rows: 4, line_width: 1.0 }
    }
}

impl MarkShape for Graph {
    fn label(&self) -> &'static str {
        "graph"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleMark {
    pub line_width: f64,
    pub filled: bool,
    pub corner_radius: f64,
}

impl Default for RectangleMark {
    fn default() -> Self {
        Self { line_width: 1.0, filled: false, corner_radius: 0.0 }
    }
}

impl MarkShape for RectangleMark {
    fn label(&self) -> &'static str {
        "rectangle"
    }

    fn on_resized(&mut self, bounds: &mut Bounds, _limits: &SizeLimits) {
        self.corner_radius = self.corner_radius.min(bounds.width.min(bounds.height) * 0.5);
    }
}

/// Straight line across the diagonal of its bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMark {
    pub line_width: f64,
    /// Runs bottom-left to top-right instead of top-left to bottom-right.
    pub rising: bool,
}

impl Default for LineMark {
    fn default() -> Self {
        Self { line_width: 1.0, rising: false }
    }
}

impl LineMark {
    /// World-space endpoints of the line within `bounds`.
    #[must_use]
    pub fn endpoints(&self, bounds: &Bounds) -> (Point, Point) {
        if self.rising {
            (Point::new(bounds.x, bounds.bottom()), Point::new(bounds.right(), bounds.y))
        } else {
            (Point::new(bounds.x, bounds.y), Point::new(bounds.right(), bounds.bottom()))
        }
    }
}

impl MarkShape for LineMark {
    fn label(&self) -> &'static str {
        "line"
    }

    fn contains(&self, bounds: &Bounds, p: Point, tolerance: f64) -> bool {
        let (a, b) = self.endpoints(bounds);
        distance_to_segment(p, a, b) <= tolerance + self.line_width * 0.5
    }

    fn mirror_content(&mut self, _direction: MirrorDirection) {
        self.rising = !self.rising;
    }
}

/// Placeholder mark reserving space for content supplied at print time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Farzi {
    pub label: String,
}

impl MarkShape for Farzi {
    fn label(&self) -> &'static str {
        "farzi"
    }

    fn supports_mirror(&self) -> bool {
        false
    }
}

/// Keep-out point the marking head must not strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvoidPoint {
    pub radius: f64,
}

impl Default for AvoidPoint {
    fn default() -> Self {
        Self { radius: 5.0 }
    }
}

impl MarkShape for AvoidPoint {
    fn label(&self) -> &'static str {
        "avoid point"
    }

    fn contains(&self, bounds: &Bounds, p: Point, tolerance: f64) -> bool {
        bounds.center().distance(p) <= self.radius + tolerance
    }

    fn on_resized(&mut self, bounds: &mut Bounds, _limits: &SizeLimits) {
        self.radius = bounds.width.min(bounds.height) * 0.5;
    }

    fn supports_mirror(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    #[default]
    Code128,
    Code39,
    QrCode,
    DataMatrix,
}

/// Barcode placeholder; encoding and rendering happen outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    pub data: String,
    pub symbology: Symbology,
    pub module_width: f64,
    pub show_text: bool,
}

impl Barcode {
    #[must_use]
    pub fn new(data: impl Into<String>, symbology: Symbology) -> Self {
        Self { data: data.into(), symbology, module_width: 1.0, show_text: true }
    }
}

impl MarkShape for Barcode {
    fn label(&self) -> &'static str {
        "barcode"
    }

    // Encoded data never mirrors; only the render flag flips.
    fn default_mirror(&self, _bounds: &Bounds) -> MirrorDirection {
        MirrorDirection::Horizontal
    }
}
