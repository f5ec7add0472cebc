use eframe::egui::{Vec2, vec2};

use super::quadtree::Cell;
use super::{Link, LayoutNode};

/// Deterministic nudge for coincident points so they separate along a
/// pair-specific direction instead of dividing by zero.
pub(super) fn jiggle(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-6
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    /// Strength times the current temperature.
    pub(super) scaled_strength: f32,
    pub(super) theta_sq: f32,
    pub(super) distance_min_sq: f32,
}

fn charge_from(delta: Vec2, members: f32, params: ChargeParams) -> Vec2 {
    let mut distance_sq = delta.length_sq();
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    delta * (params.scaled_strength * members / distance_sq)
}

/// Barnes-Hut approximation of the all-pairs charge on node `index`. A cell
/// far enough away (its width over distance below theta) acts as a single
/// body at its centroid.
pub(super) fn accumulate_charge(
    cell: &Cell,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if cell.count == 0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.members {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta == Vec2::ZERO {
                delta = jiggle(index, other);
            }
            *velocity += charge_from(delta, 1.0, params);
        }
        return;
    }

    let delta = cell.centroid - point;
    let width = cell.square.width();
    let far_enough = !cell.square.contains(point)
        && width * width / params.theta_sq < delta.length_sq()
        && cell.count > 1;

    if far_enough {
        *velocity += charge_from(delta, cell.count as f32, params);
        return;
    }

    for child in cell.children() {
        accumulate_charge(child, index, positions, params, velocity);
    }
}

fn resolve_overlap(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    velocities: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut delta = predicted[from] - predicted[to];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }

    if distance_sq == 0.0 {
        delta = jiggle(from, to);
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((reach - distance) / distance);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    // the lighter (smaller) circle moves more
    let share = to_sq / (from_sq + to_sq);

    velocities[from] += push * share;
    velocities[to] -= push * (1.0 - share);
}

/// Pushes apart every pair of circles whose predicted positions overlap.
/// Pairs of cells further apart than the largest possible reach are pruned.
pub(super) fn accumulate_collisions(
    cell_a: &Cell,
    cell_b: &Cell,
    same_cell: bool,
    predicted: &[Vec2],
    radii: &[f32],
    max_reach_sq: f32,
    velocities: &mut [Vec2],
) {
    if cell_a.square.gap_sq(cell_b.square) > max_reach_sq {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &from) in cell_a.members.iter().enumerate() {
                for &to in &cell_a.members[offset + 1..] {
                    resolve_overlap(from, to, predicted, radii, velocities);
                }
            }
        } else {
            for &from in &cell_a.members {
                for &to in &cell_b.members {
                    resolve_overlap(from, to, predicted, radii, velocities);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            accumulate_collisions(child, child, true, predicted, radii, max_reach_sq, velocities);
            for other in &children[offset + 1..] {
                accumulate_collisions(
                    child,
                    other,
                    false,
                    predicted,
                    radii,
                    max_reach_sq,
                    velocities,
                );
            }
        }
        return;
    }

    let split_a = if cell_a.is_leaf() {
        false
    } else if cell_b.is_leaf() {
        true
    } else {
        cell_a.square.half_extent >= cell_b.square.half_extent
    };

    if split_a {
        for child in cell_a.children() {
            accumulate_collisions(
                child,
                cell_b,
                false,
                predicted,
                radii,
                max_reach_sq,
                velocities,
            );
        }
    } else {
        for child in cell_b.children() {
            accumulate_collisions(
                cell_a,
                child,
                false,
                predicted,
                radii,
                max_reach_sq,
                velocities,
            );
        }
    }
}

/// Spring toward each link's rest length, split between the two ends by
/// degree so hubs move less than leaves.
pub(super) fn apply_links(nodes: &mut [LayoutNode], links: &[Link], alpha: f32) {
    for link in links {
        let (source, target) = (link.source, link.target);
        if source >= nodes.len() || target >= nodes.len() || source == target {
            continue;
        }

        let mut delta = (nodes[target].position + nodes[target].velocity)
            - (nodes[source].position + nodes[source].velocity);
        if delta == Vec2::ZERO {
            delta = jiggle(source, target);
        }
        let distance = delta.length();
        let correction = delta * ((distance - link.distance) / distance * alpha * link.strength);

        nodes[target].velocity -= correction * link.bias;
        nodes[source].velocity += correction * (1.0 - link.bias);
    }
}

/// Translates the whole layout so its mean sits on `center`.
pub(super) fn apply_centering(nodes: &mut [LayoutNode], center: Vec2) {
    let finite = nodes
        .iter()
        .filter(|node| node.position.is_finite())
        .collect::<Vec<_>>();
    if finite.is_empty() {
        return;
    }

    let mean = finite
        .iter()
        .fold(Vec2::ZERO, |sum, node| sum + node.position)
        / finite.len() as f32;
    let shift = mean - center;
    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}

/// Weak per-axis spring pulling every node toward `center`.
pub(super) fn apply_positional(nodes: &mut [LayoutNode], center: Vec2, strength: f32, alpha: f32) {
    for node in nodes.iter_mut() {
        node.velocity += (center - node.position) * (strength * alpha);
    }
}
