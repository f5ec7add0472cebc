//! Camera over the simulation space: zoom-to-fit, pointer zoom, pan and
//! eased transitions between transforms.

pub mod interaction;

use std::ops::RangeInclusive;

use eframe::egui::{Pos2, Vec2, pos2, vec2};

#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Extra room around each node when measuring the layout.
    pub node_margin: f32,
    pub fit_padding: f32,
    pub fit_scale: RangeInclusive<f32>,
    pub zoom_bounds: RangeInclusive<f32>,
    pub wheel_sensitivity: f32,
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
    pub zoom_button_seconds: f64,
    pub fit_seconds: f64,
    /// Pause between the layout settling and the fit animation starting.
    pub fit_delay_seconds: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            node_margin: 10.0,
            fit_padding: 80.0,
            fit_scale: 0.1..=4.0,
            zoom_bounds: 0.3..=4.0,
            wheel_sensitivity: 0.002,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
            zoom_button_seconds: 0.3,
            fit_seconds: 0.6,
            fit_delay_seconds: 0.05,
        }
    }
}

/// Maps simulation space onto surface-local screen space:
/// `screen = world * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    pub scale: f32,
    pub translate: Vec2,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    pub fn apply(self, world: Vec2) -> Pos2 {
        (world * self.scale + self.translate).to_pos2()
    }

    pub fn invert(self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translate) / self.scale
    }

    /// Rescales while keeping the world point under `pointer` fixed.
    pub fn scale_about(self, pointer: Pos2, factor: f32, bounds: &RangeInclusive<f32>) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }

        let anchor = self.invert(pointer);
        let scale = (self.scale * factor).clamp(*bounds.start(), *bounds.end());
        Self {
            scale,
            translate: pointer.to_vec2() - anchor * scale,
        }
    }

    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            scale: self.scale,
            translate: self.translate + delta,
        }
    }

    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            scale: self.scale + (to.scale - self.scale) * t,
            translate: self.translate + (to.translate - self.translate) * t,
        }
    }

    pub fn is_finite(self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.translate.is_finite()
    }
}

pub fn sanitize_position(position: Vec2, center: Vec2) -> Vec2 {
    vec2(
        if position.x.is_finite() { position.x } else { center.x },
        if position.y.is_finite() { position.y } else { center.y },
    )
}

/// Transform that centers every node, each padded by its radius plus the
/// node margin, inside `view_size`.
pub fn zoom_to_fit(
    nodes: &[(Vec2, f32)],
    view_size: Vec2,
    center: Vec2,
    config: &ViewConfig,
) -> CameraTransform {
    if nodes.is_empty() {
        return CameraTransform::IDENTITY;
    }

    let mut min = pos2(f32::INFINITY, f32::INFINITY);
    let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for &(position, radius) in nodes {
        let position = sanitize_position(position, center).to_pos2();
        let reach = if radius.is_finite() { radius.max(0.0) } else { 0.0 } + config.node_margin;
        min = min.min(position - Vec2::splat(reach));
        max = max.max(position + Vec2::splat(reach));
    }

    let mut extent = max - min;
    if extent.x <= 0.0 {
        extent.x = view_size.x;
    }
    if extent.y <= 0.0 {
        extent.y = view_size.y;
    }

    let scale = (view_size.x / (extent.x + config.fit_padding))
        .min(view_size.y / (extent.y + config.fit_padding));
    let scale = if scale.is_finite() {
        scale.clamp(*config.fit_scale.start(), *config.fit_scale.end())
    } else {
        1.0
    };

    let middle = min.lerp(max, 0.5).to_vec2();
    CameraTransform {
        scale,
        translate: view_size * 0.5 - middle * scale,
    }
}

pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct CameraAnimation {
    from: CameraTransform,
    to: CameraTransform,
    started: f64,
    duration: f64,
}

impl CameraAnimation {
    fn sample(&self, now: f64) -> (CameraTransform, bool) {
        let progress = ((now - self.started) / self.duration).clamp(0.0, 1.0) as f32;
        if progress >= 1.0 {
            (self.to, true)
        } else {
            (self.from.lerp(self.to, ease_cubic_in_out(progress)), false)
        }
    }
}

/// Current transform plus an optional transition in flight. Any direct user
/// gesture cancels the transition and starts from where it got to.
#[derive(Clone, Debug, Default)]
pub struct Camera {
    current: CameraTransform,
    animation: Option<CameraAnimation>,
}

impl Camera {
    pub fn transform(&self) -> CameraTransform {
        self.current
    }

    /// Where the camera ends up once any transition completes.
    pub fn target(&self) -> CameraTransform {
        self.animation.map_or(self.current, |animation| animation.to)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn set(&mut self, transform: CameraTransform) {
        self.animation = None;
        if transform.is_finite() {
            self.current = transform;
        }
    }

    pub fn animate_to(&mut self, transform: CameraTransform, duration: f64, now: f64) {
        if !transform.is_finite() {
            return;
        }
        if duration <= 0.0 {
            self.set(transform);
            return;
        }
        self.animation = Some(CameraAnimation {
            from: self.current,
            to: transform,
            started: now,
            duration,
        });
    }

    /// Steps the transition; returns true while it is still running.
    pub fn update(&mut self, now: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        let (transform, finished) = animation.sample(now);
        self.current = transform;
        if finished {
            self.animation = None;
        }
        !finished
    }

    pub fn zoom_wheel(&mut self, pointer: Pos2, scroll: f32, config: &ViewConfig) {
        if !scroll.is_finite() || scroll == 0.0 {
            return;
        }
        let factor = 2.0_f32.powf(scroll * config.wheel_sensitivity);
        self.set(self.current.scale_about(pointer, factor, &config.zoom_bounds));
    }

    pub fn zoom_pinch(&mut self, pointer: Pos2, factor: f32, config: &ViewConfig) {
        self.set(self.current.scale_about(pointer, factor, &config.zoom_bounds));
    }

    /// Animated zoom about `anchor`, stacking on top of any transition in
    /// flight so repeated presses compound.
    pub fn zoom_by(&mut self, anchor: Pos2, factor: f32, now: f64, config: &ViewConfig) {
        let target = self.target().scale_about(anchor, factor, &config.zoom_bounds);
        self.animate_to(target, config.zoom_button_seconds, now);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.set(self.current.translated(delta));
        }
    }
}
