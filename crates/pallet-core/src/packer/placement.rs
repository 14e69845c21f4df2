use super::Unit;
use crate::types::{PalletSpec, Placement};

const EPS: f64 = 1e-9;

/// Candidate origin for the next unit. Anchors start at the pallet
/// origin and are spawned at the far corners of placed boxes.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    x: f64,
    y: f64,
    z: f64,
}

impl Anchor {
    /// Sort key: low anchors first so stacking only starts once the
    /// floor around a box is exhausted.
    fn key(&self) -> (f64, f64, f64) {
        (self.y, self.z, self.x)
    }
}

/// Fills a single pallet. Owns the anchor set and the placements made
/// so far; the allocation loop creates a fresh one per pallet.
pub(super) struct PalletFill {
    pallet: PalletSpec,
    anchors: Vec<Anchor>,
    placements: Vec<Placement>,
    placed_weight: f64,
}

impl PalletFill {
    pub(super) fn new(pallet: PalletSpec) -> Self {
        Self {
            pallet,
            anchors: vec![Anchor {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            }],
            placements: Vec::new(),
            placed_weight: 0.0,
        }
    }

    pub(super) fn placed_weight(&self) -> f64 {
        self.placed_weight
    }

    pub(super) fn into_placements(self) -> Vec<Placement> {
        self.placements
    }

    /// Tries every anchor/orientation combination in deterministic order
    /// and commits the first admissible one. Returns false when the unit
    /// fits nowhere on this pallet; already placed units are never moved.
    pub(super) fn try_place(&mut self, unit_idx: usize, unit: &Unit) -> bool {
        if self.placed_weight + unit.weight > self.pallet.max_weight {
            return false;
        }

        for anchor_idx in 0..self.anchors.len() {
            let anchor = self.anchors[anchor_idx];
            for &rotation in unit.rotations() {
                let [w, h, d] = rotation.oriented(unit.width, unit.height, unit.depth);
                if !self.inside_pallet(anchor, w, h, d) {
                    continue;
                }
                if self.collides(anchor, w, h, d) {
                    continue;
                }

                self.placements.push(Placement {
                    item_name: unit.name.clone(),
                    unit: unit_idx,
                    x: anchor.x,
                    y: anchor.y,
                    z: anchor.z,
                    width: w,
                    height: h,
                    depth: d,
                    rotation,
                    weight: unit.weight,
                });
                self.placed_weight += unit.weight;
                self.anchors.remove(anchor_idx);
                self.spawn_anchors(anchor, w, h, d);
                return true;
            }
        }

        false
    }

    fn inside_pallet(&self, anchor: Anchor, w: f64, h: f64, d: f64) -> bool {
        anchor.x + w <= self.pallet.width + EPS
            && anchor.y + h <= self.pallet.height + EPS
            && anchor.z + d <= self.pallet.depth + EPS
    }

    /// Axis-aligned box intersection against every placed unit. Touching
    /// faces do not count as overlap.
    fn collides(&self, anchor: Anchor, w: f64, h: f64, d: f64) -> bool {
        self.placements.iter().any(|p| {
            anchor.x < p.x + p.width - EPS
                && p.x < anchor.x + w - EPS
                && anchor.y < p.y + p.height - EPS
                && p.y < anchor.y + h - EPS
                && anchor.z < p.z + p.depth - EPS
                && p.z < anchor.z + d - EPS
        })
    }

    /// Spawns anchors at the three far corners of the box just placed,
    /// then re-sorts so the lowest anchor is always tried first.
    fn spawn_anchors(&mut self, origin: Anchor, w: f64, h: f64, d: f64) {
        let corners = [
            Anchor {
                x: origin.x + w,
                y: origin.y,
                z: origin.z,
            },
            Anchor {
                x: origin.x,
                y: origin.y + h,
                z: origin.z,
            },
            Anchor {
                x: origin.x,
                y: origin.y,
                z: origin.z + d,
            },
        ];
        for corner in corners {
            self.push_anchor(corner);
        }
        self.anchors.sort_by(|a, b| {
            a.key()
                .partial_cmp(&b.key())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    fn push_anchor(&mut self, anchor: Anchor) {
        // Anchors on or beyond the far pallet faces can never seat a box.
        if anchor.x >= self.pallet.width - EPS
            || anchor.y >= self.pallet.height - EPS
            || anchor.z >= self.pallet.depth - EPS
        {
            return;
        }

        // An anchor buried in a placed box (or on one of its near faces)
        // would collide immediately.
        let swallowed = self.placements.iter().any(|p| {
            anchor.x > p.x - EPS
                && anchor.x < p.x + p.width - EPS
                && anchor.y > p.y - EPS
                && anchor.y < p.y + p.height - EPS
                && anchor.z > p.z - EPS
                && anchor.z < p.z + p.depth - EPS
        });
        if swallowed {
            return;
        }

        let duplicate = self.anchors.iter().any(|a| {
            (a.x - anchor.x).abs() < EPS
                && (a.y - anchor.y).abs() < EPS
                && (a.z - anchor.z).abs() < EPS
        });
        if duplicate {
            return;
        }

        self.anchors.push(anchor);
    }
}
