use serde::{Deserialize, Serialize};

/// One catalog line: a product with dimensions in centimeters and unit
/// weight in kilograms. `quantity` is expanded into that many discrete
/// units before packing; units are tracked by index, never by value,
/// so identical products stay distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub weight: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_can_rotate")]
    pub can_rotate: bool,
}

fn default_quantity() -> u32 {
    1
}

fn default_can_rotate() -> bool {
    true
}

/// Pallet geometry and weight limit, fixed for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletSpec {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub max_weight: f64,
}

impl Default for PalletSpec {
    /// Standard transport pallet: 100x120x180 cm, 1100 kg.
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 120.0,
            depth: 180.0,
            max_weight: 1100.0,
        }
    }
}

impl PalletSpec {
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }
}

/// Input: What user provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    #[serde(default)]
    pub pallet: PalletSpec,
    pub items: Vec<Item>,
}

/// Axis-aligned orientation: which item edge runs along each pallet axis
/// (x = width, y = height, z = depth). The variant name spells out the
/// item edges in pallet-axis order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Whd,
    Hwd,
    Hdw,
    Dhw,
    Dwh,
    Wdh,
}

impl Rotation {
    pub const ALL: [Rotation; 6] = [
        Rotation::Whd,
        Rotation::Hwd,
        Rotation::Hdw,
        Rotation::Dhw,
        Rotation::Dwh,
        Rotation::Wdh,
    ];

    /// Item dimensions as seen along the pallet axes under this orientation.
    pub fn oriented(self, width: f64, height: f64, depth: f64) -> [f64; 3] {
        match self {
            Rotation::Whd => [width, height, depth],
            Rotation::Hwd => [height, width, depth],
            Rotation::Hdw => [height, depth, width],
            Rotation::Dhw => [depth, height, width],
            Rotation::Dwh => [depth, width, height],
            Rotation::Wdh => [width, depth, height],
        }
    }
}

/// Accepted assignment of one unit inside a pallet. Position is the
/// min corner, dimensions are already oriented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub item_name: String,
    /// Index of this unit in the expanded unit list.
    pub unit: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub rotation: Rotation,
    pub weight: f64,
}

/// Contents of a single packed pallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletLayout {
    pub pallet_number: u32,
    pub placements: Vec<Placement>,
    pub placed_weight: f64,
}

/// Why a unit was excluded from every pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A dimension is zero or negative.
    NonPositiveDimension,
    /// The unit weight is zero or negative.
    NonPositiveWeight,
    /// The unit alone exceeds the pallet weight limit.
    Overweight,
    /// The unit exceeds the pallet in every allowed orientation.
    Oversized,
}

/// A unit excluded from packing, reported alongside the successful
/// layouts rather than aborting the whole order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedItem {
    pub item_name: String,
    pub unit: usize,
    pub reason: RejectReason,
}

/// Summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackSummary {
    pub total_pallets: u32,
    pub total_units: usize,
    pub placed_units: usize,
    pub rejected_units: usize,
    pub placed_weight: f64,
    pub placed_volume: f64,
    pub total_volume: f64,
    pub volume_utilization_percentage: f64,
}

/// Output: What the packer returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResult {
    /// The pallet spec every layout was packed against.
    pub pallet: PalletSpec,
    /// One layout per pallet, in packing order.
    pub layouts: Vec<PalletLayout>,
    /// Units that could never be placed (invalid or oversized).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub rejected: Vec<RejectedItem>,
    /// Overall statistics
    pub summary: PackSummary,
}

/// Error type for packing
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("No items to pack - the order is empty")]
    EmptyOrder,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Packing made no progress: {remaining} placeable units could not be placed")]
    NoProgress { remaining: usize, items: Vec<String> },
}

pub type Result<T> = std::result::Result<T, PackError>;
