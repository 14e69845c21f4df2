use super::*;
use std::collections::BTreeSet;

fn item(name: &str, w: f64, h: f64, d: f64, weight: f64, quantity: u32) -> Item {
    Item {
        name: name.to_string(),
        width: w,
        height: h,
        depth: d,
        weight,
        quantity,
        can_rotate: true,
    }
}

fn request(items: Vec<Item>) -> PackRequest {
    PackRequest {
        pallet: PalletSpec::default(),
        items,
    }
}

#[test]
fn test_single_item_placed_at_origin() {
    let packer = Packer::new(request(vec![item("crate", 50.0, 50.0, 50.0, 10.0, 1)])).unwrap();
    let result = packer.pack().unwrap();

    assert_eq!(result.summary.total_pallets, 1);
    assert_eq!(result.layouts.len(), 1);
    assert!(result.rejected.is_empty());

    let placement = &result.layouts[0].placements[0];
    assert_eq!(placement.x, 0.0);
    assert_eq!(placement.y, 0.0);
    assert_eq!(placement.z, 0.0);
    assert_eq!(placement.item_name, "crate");
}

#[test]
fn test_oversized_items_reported_not_looped() {
    // 200 cm exceeds every pallet axis, so no orientation helps.
    let packer = Packer::new(request(vec![item("beam", 200.0, 50.0, 50.0, 30.0, 2)])).unwrap();
    let result = packer.pack().unwrap();

    assert_eq!(result.summary.total_pallets, 0);
    assert!(result.layouts.is_empty());
    assert_eq!(result.rejected.len(), 2);
    assert!(result
        .rejected
        .iter()
        .all(|r| r.reason == RejectReason::Oversized));
}

#[test]
fn test_volume_overflow_spills_to_second_pallet() {
    // Each unit fills half a pallet exactly; three of them need two pallets.
    let packer = Packer::new(request(vec![item("half", 100.0, 120.0, 90.0, 200.0, 3)])).unwrap();
    let result = packer.pack().unwrap();

    assert_eq!(result.summary.total_pallets, 2);
    assert_eq!(result.summary.placed_units, 3);
    assert!(result.rejected.is_empty());
    assert_eq!(result.layouts[0].placements.len(), 2);
    assert_eq!(result.layouts[1].placements.len(), 1);
}

#[test]
fn test_weight_limit_drives_pallet_count() {
    // Tiny volume, heavy units: 20 x 60 kg against an 1100 kg limit.
    let packer = Packer::new(request(vec![item("ingot", 10.0, 10.0, 10.0, 60.0, 20)])).unwrap();
    let result = packer.pack().unwrap();

    assert_eq!(result.layouts.len(), 2);
    assert_eq!(result.layouts[0].placements.len(), 18);
    assert_eq!(result.layouts[1].placements.len(), 2);
    for layout in &result.layouts {
        assert!(layout.placed_weight <= 1100.0);
    }
}

#[test]
fn test_empty_order_rejected() {
    let err = Packer::new(request(vec![])).err().unwrap();
    assert!(matches!(err, PackError::EmptyOrder));
}

#[test]
fn test_zero_quantity_is_empty_order() {
    let packer = Packer::new(request(vec![item("ghost", 10.0, 10.0, 10.0, 1.0, 0)])).unwrap();
    let err = packer.pack().err().unwrap();
    assert!(matches!(err, PackError::EmptyOrder));
}

#[test]
fn test_invalid_pallet_spec_rejected() {
    let req = PackRequest {
        pallet: PalletSpec {
            width: 100.0,
            height: 120.0,
            depth: 180.0,
            max_weight: 0.0,
        },
        items: vec![item("crate", 10.0, 10.0, 10.0, 1.0, 1)],
    };
    let err = Packer::new(req).err().unwrap();
    assert!(matches!(err, PackError::InvalidInput(_)));
}

#[test]
fn test_invalid_item_excluded_not_fatal() {
    let packer = Packer::new(request(vec![
        item("flat", 0.0, 40.0, 40.0, 5.0, 1),
        item("good", 40.0, 40.0, 40.0, 5.0, 1),
    ]))
    .unwrap();
    let result = packer.pack().unwrap();

    assert_eq!(result.summary.total_pallets, 1);
    assert_eq!(result.summary.placed_units, 1);
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.rejected[0].item_name, "flat");
    assert_eq!(result.rejected[0].reason, RejectReason::NonPositiveDimension);
}

#[test]
fn test_overweight_unit_rejected() {
    let packer = Packer::new(request(vec![item("anvil", 10.0, 10.0, 10.0, 1200.0, 1)])).unwrap();
    let result = packer.pack().unwrap();

    assert!(result.layouts.is_empty());
    assert_eq!(result.rejected[0].reason, RejectReason::Overweight);
}

#[test]
fn test_rotation_used_when_needed() {
    // 150 cm only fits along the 180 cm depth axis.
    let packer = Packer::new(request(vec![item("pipe", 150.0, 50.0, 50.0, 20.0, 1)])).unwrap();
    let result = packer.pack().unwrap();

    let placement = &result.layouts[0].placements[0];
    assert_ne!(placement.rotation, Rotation::Whd);
    assert_eq!(placement.depth, 150.0);
    assert!(placement.width <= 100.0 && placement.height <= 120.0);
}

#[test]
fn test_rotation_disabled_marks_oversized() {
    let mut long = item("pipe", 150.0, 50.0, 50.0, 20.0, 1);
    long.can_rotate = false;

    let packer = Packer::new(request(vec![long])).unwrap();
    let result = packer.pack().unwrap();

    assert!(result.layouts.is_empty());
    assert_eq!(result.rejected[0].reason, RejectReason::Oversized);
}

#[test]
fn test_conservation_across_pallets() {
    let packer = Packer::new(request(vec![
        item("half", 100.0, 120.0, 90.0, 150.0, 5),
        item("box", 40.0, 40.0, 40.0, 12.0, 6),
        item("bad", -1.0, 40.0, 40.0, 5.0, 1),
        item("beam", 200.0, 50.0, 50.0, 30.0, 2),
    ]))
    .unwrap();
    let result = packer.pack().unwrap();

    let total_units = result.summary.total_units;
    assert_eq!(total_units, 14);

    // Every expanded unit shows up exactly once, placed or rejected.
    let mut seen = BTreeSet::new();
    for layout in &result.layouts {
        for placement in &layout.placements {
            assert!(seen.insert(placement.unit));
        }
    }
    for rejected in &result.rejected {
        assert!(seen.insert(rejected.unit));
    }
    assert_eq!(seen, (0..total_units).collect());
}

#[test]
fn test_no_overlap_and_bounds() {
    let packer = Packer::new(request(vec![
        item("cube", 40.0, 40.0, 40.0, 8.0, 10),
        item("slab", 30.0, 20.0, 50.0, 6.0, 7),
        item("small", 10.0, 10.0, 10.0, 1.0, 9),
    ]))
    .unwrap();
    let result = packer.pack().unwrap();

    assert!(result.rejected.is_empty());
    let eps = 1e-9;
    for layout in &result.layouts {
        for p in &layout.placements {
            assert!(p.x >= -eps && p.x + p.width <= 100.0 + eps);
            assert!(p.y >= -eps && p.y + p.height <= 120.0 + eps);
            assert!(p.z >= -eps && p.z + p.depth <= 180.0 + eps);
        }
        for (i, a) in layout.placements.iter().enumerate() {
            for b in &layout.placements[i + 1..] {
                let disjoint = a.x + a.width <= b.x + eps
                    || b.x + b.width <= a.x + eps
                    || a.y + a.height <= b.y + eps
                    || b.y + b.height <= a.y + eps
                    || a.z + a.depth <= b.z + eps
                    || b.z + b.depth <= a.z + eps;
                assert!(disjoint, "units {} and {} overlap", a.unit, b.unit);
            }
        }
    }
}

#[test]
fn test_deterministic_output() {
    let items = vec![
        item("cube", 40.0, 40.0, 40.0, 8.0, 10),
        item("slab", 30.0, 20.0, 50.0, 6.0, 7),
        item("half", 100.0, 120.0, 90.0, 150.0, 2),
    ];

    let first = Packer::new(request(items.clone())).unwrap().pack().unwrap();
    let second = Packer::new(request(items)).unwrap().pack().unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_duplicate_products_stay_distinct() {
    let packer = Packer::new(request(vec![item("sack", 30.0, 30.0, 30.0, 25.0, 3)])).unwrap();
    let result = packer.pack().unwrap();

    let placements = &result.layouts[0].placements;
    assert_eq!(placements.len(), 3);

    let units: BTreeSet<usize> = placements.iter().map(|p| p.unit).collect();
    assert_eq!(units.len(), 3);
    assert!(placements.iter().all(|p| p.item_name == "sack"));
}
