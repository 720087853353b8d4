//! Deterministic inventory generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rentdesk_core::Record;

const SURNAMES: &[&str] = &[
    "Abbott", "Bauer", "Castillo", "Dawson", "Ellis", "Fischer", "Garner", "Hayes", "Ingram",
    "Jensen", "Keller", "Lambert", "Moreno", "Nguyen", "Ortega", "Porter", "Quinn", "Reyes",
    "Sandoval", "Thornton", "Underwood", "Vaughn", "Whitaker", "Xiong", "Yates", "Zimmerman",
];

/// Generate nested inventory records.
///
/// `lens[0]` top-level rows are built; each of them gets `lens[1]` sub rows,
/// and so on. Ids are unique and assigned depth first starting at 1. The
/// same seed always yields the same inventory.
pub fn generate_inventory(seed: u64, lens: &[usize]) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut next_id = 1;
    level(&mut rng, &mut next_id, lens)
}

fn level(rng: &mut StdRng, next_id: &mut i64, lens: &[usize]) -> Vec<Record> {
    let Some((&len, deeper)) = lens.split_first() else {
        return Vec::new();
    };

    (0..len)
        .map(|_| {
            let mut record = product(rng, *next_id);
            *next_id += 1;
            record.sub_rows = level(rng, next_id, deeper);
            record
        })
        .collect()
}

fn product(rng: &mut StdRng, id: i64) -> Record {
    let name = SURNAMES[rng.gen_range(0..SURNAMES.len())];
    let mut record = Record::new(id, name).with_price(f64::from(rng.gen_range(5u32..=50)));
    record.code = Some(rng.gen_range(0..=40));
    record.availability = rng.gen_bool(0.5);
    record.needing_repair = rng.gen_bool(0.5);
    record.durability = f64::from(rng.gen_range(0u32..=100));
    record.mileage = f64::from(rng.gen_range(0u32..=100));
    record
}
