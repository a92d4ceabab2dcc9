//! Weighted loot rolls keyed by rarity ceiling.

use rand::Rng;

use super::defs::{DropRule, Rarity};

/// Anything that can appear in a drop table.
pub trait LootEntry {
    fn loot_id(&self) -> u32;
    fn loot_rarity(&self) -> Rarity;
    fn loot_weight(&self) -> u32;
}

/// Pick one id from `table` among entries at or below `ceiling`, weighted
/// by drop weight. Walks the table in order, so a seeded `rng` gives a
/// deterministic result. Returns `None` when nothing eligible carries any
/// weight.
pub fn roll_drop<T, R>(table: &[T], ceiling: Rarity, rng: &mut R) -> Option<u32>
where
    T: LootEntry,
    R: Rng + ?Sized,
{
    let max_grade = ceiling.grade();
    let eligible = || {
        table
            .iter()
            .filter(move |e| e.loot_rarity().grade() <= max_grade)
    };

    let total: u64 = eligible().map(|e| e.loot_weight() as u64).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.gen::<f64>() * total as f64;
    for entry in eligible().filter(|e| e.loot_weight() > 0) {
        roll -= entry.loot_weight() as f64;
        if roll <= 0.0 {
            return Some(entry.loot_id());
        }
    }
    // Float drift on the last entry.
    eligible()
        .filter(|e| e.loot_weight() > 0)
        .last()
        .map(|e| e.loot_id())
}

/// One independent loot category: a Bernoulli gate, then a weighted roll.
pub fn roll_category<T, R>(rule: &DropRule, table: &[T], rng: &mut R) -> Option<u32>
where
    T: LootEntry,
    R: Rng + ?Sized,
{
    if rng.gen::<f64>() >= rule.chance {
        return None;
    }
    roll_drop(table, rule.max_rarity, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Entry(u32, Rarity, u32);

    impl LootEntry for Entry {
        fn loot_id(&self) -> u32 {
            self.0
        }
        fn loot_rarity(&self) -> Rarity {
            self.1
        }
        fn loot_weight(&self) -> u32 {
            self.2
        }
    }

    #[test]
    fn empty_table_yields_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let table: Vec<Entry> = Vec::new();
        assert_eq!(roll_drop(&table, Rarity::Su, &mut rng), None);
    }

    #[test]
    fn zero_total_weight_yields_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let table = vec![Entry(1, Rarity::D, 0), Entry(2, Rarity::C, 0)];
        assert_eq!(roll_drop(&table, Rarity::Su, &mut rng), None);
    }

    #[test]
    fn ceiling_admits_that_grade_and_worse() {
        let table = vec![
            Entry(1, Rarity::D, 10),
            Entry(2, Rarity::C, 10),
            Entry(3, Rarity::B, 10),
            Entry(4, Rarity::S, 10),
        ];
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let id = roll_drop(&table, Rarity::C, &mut rng).unwrap();
            assert!(id == 1 || id == 2, "rolled {id} above ceiling C");
        }
    }

    #[test]
    fn ceiling_below_every_entry_yields_nothing() {
        let table = vec![Entry(1, Rarity::A, 10)];
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(roll_drop(&table, Rarity::D, &mut rng), None);
    }

    #[test]
    fn zero_weight_entries_never_win() {
        let table = vec![Entry(1, Rarity::D, 0), Entry(2, Rarity::D, 5)];
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1_000 {
            assert_eq!(roll_drop(&table, Rarity::D, &mut rng), Some(2));
        }
    }

    #[test]
    fn weights_converge_to_ratio() {
        let table = vec![Entry(1, Rarity::D, 1), Entry(2, Rarity::D, 3)];
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let n = 100_000;
        let mut first = 0u32;
        for _ in 0..n {
            if roll_drop(&table, Rarity::D, &mut rng) == Some(1) {
                first += 1;
            }
        }
        let share = first as f64 / n as f64;
        // Expected 0.25, sigma ≈ 0.00137.
        assert!((share - 0.25).abs() < 0.01, "share of weight-1 entry: {share}");
    }

    #[test]
    fn same_seed_same_sequence() {
        let table = vec![
            Entry(1, Rarity::D, 3),
            Entry(2, Rarity::C, 5),
            Entry(3, Rarity::B, 2),
        ];
        let mut a = SmallRng::seed_from_u64(99);
        let mut b = SmallRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(
                roll_drop(&table, Rarity::B, &mut a),
                roll_drop(&table, Rarity::B, &mut b)
            );
        }
    }

    #[test]
    fn certain_gate_always_rolls() {
        let table = vec![Entry(42, Rarity::D, 100)];
        let rule = DropRule { chance: 1.0, max_rarity: Rarity::D };
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..1_000 {
            assert_eq!(roll_category(&rule, &table, &mut rng), Some(42));
        }
    }

    #[test]
    fn closed_gate_never_rolls() {
        let table = vec![Entry(42, Rarity::D, 100)];
        let rule = DropRule { chance: 0.0, max_rarity: Rarity::D };
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..1_000 {
            assert_eq!(roll_category(&rule, &table, &mut rng), None);
        }
    }
}
