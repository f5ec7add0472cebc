//! Force-directed layout: a cooling particle simulation advanced one tick at
//! a time by the host's frame clock.

mod forces;
mod quadtree;

use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::graph::KnowledgeGraph;
use forces::{ChargeParams, accumulate_charge, accumulate_collisions};
use quadtree::Cell;

pub const TICK_SECONDS: f32 = 1.0 / 60.0;
const MAX_TICKS_PER_ADVANCE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    pub charge: f32,
    pub theta: f32,
    pub charge_distance_min: f32,
    pub collision_padding: f32,
    pub positional_strength: f32,
    pub link_base_strength: f32,
    pub link_strength_scale: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    /// Radius of the starting circle relative to the shorter viewport side.
    pub initial_spread: f32,
    pub drag_alpha_target: f32,
    pub resize_alpha: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            charge: -550.0,
            theta: 0.9,
            charge_distance_min: 1.0,
            collision_padding: 32.0,
            positional_strength: 0.04,
            link_base_strength: 0.3,
            link_strength_scale: 0.15,
            velocity_decay: 0.4,
            alpha_min,
            // reaches alpha_min from 1.0 in roughly 300 ticks
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            initial_spread: 0.3,
            drag_alpha_target: 0.3,
            resize_alpha: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutNode {
    pub position: Vec2,
    pub velocity: Vec2,
    /// While set, the node sits here and ignores every force.
    pub pinned: Option<Vec2>,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub distance: f32,
    pub strength: f32,
    /// Share of the correction applied to the target end.
    pub bias: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Temperature dropped below the floor on this tick. Reported once per
    /// cooling cycle.
    Settled,
    Idle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub ticks: usize,
    pub settled: bool,
}

pub struct ForceSimulation {
    nodes: Vec<LayoutNode>,
    links: Vec<Link>,
    config: ForceConfig,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    accumulator: f32,
    scratch: Scratch,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    velocities: Vec<Vec2>,
}

impl ForceSimulation {
    pub fn new(graph: &KnowledgeGraph, center: Vec2, view_size: Vec2, config: ForceConfig) -> Self {
        let count = graph.node_count();
        let spread = view_size.min_elem().max(0.0) * config.initial_spread;
        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let angle = index as f32 / count.max(1) as f32 * TAU;
                // a lone node has no circle to sit on
                let offset = if count < 2 {
                    Vec2::ZERO
                } else {
                    vec2(angle.cos(), angle.sin()) * spread
                };
                LayoutNode {
                    position: center + offset,
                    velocity: Vec2::ZERO,
                    pinned: None,
                    radius: node.radius,
                }
            })
            .collect::<Vec<_>>();

        let links = graph
            .edges
            .iter()
            .filter(|edge| edge.source < count && edge.target < count && edge.source != edge.target)
            .map(|edge| {
                let source_degree = graph.degree(edge.source) as f32;
                let target_degree = graph.degree(edge.target) as f32;
                Link {
                    source: edge.source,
                    target: edge.target,
                    distance: edge.band().link_distance(),
                    strength: config.link_base_strength
                        + edge.visual_strength * config.link_strength_scale,
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect::<Vec<_>>();

        // nothing to balance with fewer than two bodies
        let alpha = if count < 2 { 0.0 } else { 1.0 };

        Self {
            nodes,
            links,
            config,
            center,
            alpha,
            alpha_target: 0.0,
            running: true,
            accumulator: 0.0,
            scratch: Scratch::default(),
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.nodes.iter().map(|node| node.position)
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.nodes.get(index).map(|node| node.position)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_settled(&self) -> bool {
        !self.running
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes
            .iter()
            .map(|node| node.velocity.length_sq() * 0.5)
            .sum()
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    /// Resumes ticking without touching the temperature.
    pub fn restart(&mut self) {
        self.running = true;
    }

    /// Raises the temperature to at least `alpha` and resumes ticking.
    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
        self.running = true;
    }

    pub fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(index)
            && position.is_finite()
        {
            node.pinned = Some(position);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = None;
        }
    }

    /// Moves the centering and positional forces to a new viewport center.
    pub fn recenter(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.apply_forces();
        self.integrate();

        if self.alpha < self.config.alpha_min {
            self.running = false;
            debug!(
                nodes = self.nodes.len(),
                energy = self.kinetic_energy(),
                "layout settled"
            );
            TickOutcome::Settled
        } else {
            TickOutcome::Running
        }
    }

    /// Runs as many fixed-rate ticks as `dt_seconds` covers, capped so a
    /// long frame cannot stall the caller.
    pub fn advance(&mut self, dt_seconds: f32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if !self.running {
            self.accumulator = 0.0;
            return report;
        }

        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.accumulator += dt_seconds;
        }

        while self.accumulator >= TICK_SECONDS && report.ticks < MAX_TICKS_PER_ADVANCE {
            self.accumulator -= TICK_SECONDS;
            report.ticks += 1;
            match self.tick() {
                TickOutcome::Settled => {
                    report.settled = true;
                    break;
                }
                TickOutcome::Idle => break,
                TickOutcome::Running => {}
            }
        }

        self.accumulator = self.accumulator.min(TICK_SECONDS);
        report
    }

    fn apply_forces(&mut self) {
        let alpha = self.alpha;
        forces::apply_links(&mut self.nodes, &self.links, alpha);
        self.apply_charge(alpha);
        forces::apply_centering(&mut self.nodes, self.center);
        self.apply_collisions();
        forces::apply_positional(
            &mut self.nodes,
            self.center,
            self.config.positional_strength,
            alpha,
        );
    }

    fn apply_charge(&mut self, alpha: f32) {
        if self.nodes.len() < 2 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch
            .positions
            .extend(self.nodes.iter().map(|node| node.position));

        let Some(root) = Cell::build(&scratch.positions) else {
            return;
        };

        let params = ChargeParams {
            scaled_strength: self.config.charge * alpha,
            theta_sq: self.config.theta * self.config.theta,
            distance_min_sq: self.config.charge_distance_min * self.config.charge_distance_min,
        };

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if scratch.positions[index].is_finite() {
                accumulate_charge(&root, index, &scratch.positions, params, &mut node.velocity);
            }
        }
    }

    fn apply_collisions(&mut self) {
        if self.nodes.len() < 2 {
            return;
        }

        let padding = self.config.collision_padding;
        let scratch = &mut self.scratch;
        scratch.predicted.clear();
        scratch.radii.clear();
        scratch.velocities.clear();
        let mut max_radius = 0.0_f32;
        for node in &self.nodes {
            scratch.predicted.push(node.position + node.velocity);
            scratch.radii.push(node.radius + padding);
            scratch.velocities.push(node.velocity);
            max_radius = max_radius.max(node.radius + padding);
        }

        let Some(root) = Cell::build(&scratch.predicted) else {
            return;
        };

        let max_reach = max_radius * 2.0;
        accumulate_collisions(
            &root,
            &root,
            true,
            &scratch.predicted,
            &scratch.radii,
            max_reach * max_reach,
            &mut scratch.velocities,
        );

        for (node, velocity) in self.nodes.iter_mut().zip(&scratch.velocities) {
            node.velocity = *velocity;
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            if let Some(pinned) = node.pinned {
                node.position = pinned;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= keep;
            node.position += node.velocity;

            if !node.position.is_finite() || !node.velocity.is_finite() {
                node.position = self.center;
                node.velocity = Vec2::ZERO;
            }
        }
    }
}
