use super::*;

impl Packer {
    /// Computes pallet counts, weight, and volume utilization.
    pub(super) fn calculate_summary(
        &self,
        layouts: &[PalletLayout],
        rejected: &[RejectedItem],
        total_units: usize,
    ) -> PackSummary {
        let total_pallets = layouts.len() as u32;
        let placed_units: usize = layouts.iter().map(|l| l.placements.len()).sum();
        let placed_weight: f64 = layouts.iter().map(|l| l.placed_weight).sum();
        let placed_volume: f64 = layouts
            .iter()
            .flat_map(|l| &l.placements)
            .map(|p| p.width * p.height * p.depth)
            .sum();

        let total_volume = self.request.pallet.volume() * total_pallets as f64;
        let volume_utilization_percentage = if total_volume > 0.0 {
            (placed_volume / total_volume) * 100.0
        } else {
            0.0
        };

        PackSummary {
            total_pallets,
            total_units,
            placed_units,
            rejected_units: rejected.len(),
            placed_weight,
            placed_volume,
            total_volume,
            volume_utilization_percentage,
        }
    }
}
