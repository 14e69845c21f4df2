use crate::types::*;
use std::cmp::Ordering;

mod placement;
mod summary;
#[cfg(test)]
mod tests;

use placement::PalletFill;

/// One physical unit to place, produced by expanding an item's quantity.
#[derive(Debug, Clone)]
pub(crate) struct Unit {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub weight: f64,
    pub can_rotate: bool,
}

impl Unit {
    fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    fn rotations(&self) -> &'static [Rotation] {
        const UPRIGHT: [Rotation; 1] = [Rotation::Whd];
        if self.can_rotate {
            &Rotation::ALL
        } else {
            &UPRIGHT
        }
    }

    /// True when at least one allowed orientation fits inside an empty pallet.
    fn fits_pallet(&self, pallet: &PalletSpec) -> bool {
        self.rotations().iter().any(|r| {
            let [w, h, d] = r.oriented(self.width, self.height, self.depth);
            w <= pallet.width && h <= pallet.height && d <= pallet.depth
        })
    }
}

/// Packs an order onto identical pallets using a first-fit anchor-point
/// heuristic, one pallet at a time.
pub struct Packer {
    request: PackRequest,
}

impl Packer {
    /// Validates the request and builds a new packer instance.
    pub fn new(request: PackRequest) -> Result<Self> {
        if request.items.is_empty() {
            return Err(PackError::EmptyOrder);
        }

        let pallet = &request.pallet;
        if pallet.width <= 0.0 || pallet.height <= 0.0 || pallet.depth <= 0.0 {
            return Err(PackError::InvalidInput(
                "Pallet dimensions must be positive".to_string(),
            ));
        }
        if pallet.max_weight <= 0.0 {
            return Err(PackError::InvalidInput(
                "Pallet weight limit must be positive".to_string(),
            ));
        }

        Ok(Self { request })
    }

    /// Runs the full allocation loop: fills fresh pallets with the
    /// remaining units until every placeable unit is assigned.
    pub fn pack(&self) -> Result<PackResult> {
        let units = self.expand_units();
        if units.is_empty() {
            return Err(PackError::EmptyOrder);
        }

        // Units that can never be placed are siphoned off up front so the
        // loop below always makes progress on what is left.
        let mut rejected = Vec::new();
        let mut remaining: Vec<usize> = Vec::new();
        for (idx, unit) in units.iter().enumerate() {
            match self.screen_unit(unit) {
                Some(reason) => rejected.push(RejectedItem {
                    item_name: unit.name.clone(),
                    unit: idx,
                    reason,
                }),
                None => remaining.push(idx),
            }
        }

        // Bigger units first; the sort is stable so equal volumes keep
        // catalog order and the result stays deterministic.
        remaining.sort_by(|&a, &b| {
            units[b]
                .volume()
                .partial_cmp(&units[a].volume())
                .unwrap_or(Ordering::Equal)
        });

        let mut layouts: Vec<PalletLayout> = Vec::new();
        while !remaining.is_empty() {
            // Every iteration places at least one unit, so the pallet count
            // is bounded by the unit count. Exceeding it means the progress
            // guard itself is broken.
            if layouts.len() >= units.len() {
                return Err(self.no_progress(&units, &remaining));
            }

            let mut fill = PalletFill::new(self.request.pallet.clone());
            let mut unplaced = Vec::new();
            for &idx in &remaining {
                if !fill.try_place(idx, &units[idx]) {
                    unplaced.push(idx);
                }
            }

            let placed_weight = fill.placed_weight();
            let placements = fill.into_placements();
            if placements.is_empty() {
                return Err(self.no_progress(&units, &remaining));
            }

            layouts.push(PalletLayout {
                pallet_number: layouts.len() as u32 + 1,
                placements,
                placed_weight,
            });
            remaining = unplaced;
        }

        let summary = self.calculate_summary(&layouts, &rejected, units.len());

        Ok(PackResult {
            pallet: self.request.pallet.clone(),
            layouts,
            rejected,
            summary,
        })
    }

    /// Duplicates items according to their requested quantity.
    fn expand_units(&self) -> Vec<Unit> {
        let mut units = Vec::new();
        for item in &self.request.items {
            for _ in 0..item.quantity {
                units.push(Unit {
                    name: item.name.clone(),
                    width: item.width,
                    height: item.height,
                    depth: item.depth,
                    weight: item.weight,
                    can_rotate: item.can_rotate,
                });
            }
        }
        units
    }

    /// Checks whether a unit can ever be placed; returns the reason if not.
    fn screen_unit(&self, unit: &Unit) -> Option<RejectReason> {
        if unit.width <= 0.0 || unit.height <= 0.0 || unit.depth <= 0.0 {
            return Some(RejectReason::NonPositiveDimension);
        }
        if unit.weight <= 0.0 {
            return Some(RejectReason::NonPositiveWeight);
        }
        if unit.weight > self.request.pallet.max_weight {
            return Some(RejectReason::Overweight);
        }
        if !unit.fits_pallet(&self.request.pallet) {
            return Some(RejectReason::Oversized);
        }
        None
    }

    fn no_progress(&self, units: &[Unit], remaining: &[usize]) -> PackError {
        PackError::NoProgress {
            remaining: remaining.len(),
            items: remaining.iter().map(|&i| units[i].name.clone()).collect(),
        }
    }
}
