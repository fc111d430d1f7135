use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use motifs::mining::{mine_all, ItemId, Pattern, TransactionDb};

/// Generate synthetic transaction data
///
/// Parameters:
/// - num_transactions: Number of transactions
/// - num_items: Total number of possible items
/// - avg_transaction_size: Average items per transaction
/// - density: How dense the data is (0.0-1.0)
fn generate_transactions(
    num_transactions: usize,
    num_items: usize,
    avg_transaction_size: usize,
    density: f64,
) -> TransactionDb {
    let mut rng = rand::thread_rng();
    let mut transactions = Vec::with_capacity(num_transactions);

    for _ in 0..num_transactions {
        let random_factor: f64 = rng.r#gen();
        let num_items_in_tx = (avg_transaction_size as f64 * (0.5 + random_factor)).round() as usize;
        let num_items_in_tx = num_items_in_tx.min(num_items);

        let mut tx: Vec<ItemId> = Vec::with_capacity(num_items_in_tx);
        for _ in 0..num_items_in_tx {
            let density_check: f64 = rng.r#gen();
            if density_check < density {
                tx.push(rng.gen_range(1..=num_items as ItemId));
            }
        }
        transactions.push(tx);
    }
    // Make sure every item exists so the universe has a fixed width
    transactions.push((1..=num_items as ItemId).collect());

    TransactionDb::new(transactions).unwrap()
}

fn min_support(db: &TransactionDb, ratio: f64) -> u32 {
    ((ratio * db.nb_transactions() as f64).ceil() as u32).max(1)
}

/// Every family on one medium-sized dataset
fn bench_families(c: &mut Criterion) {
    let mut group = c.benchmark_group("families");
    let db = generate_transactions(1000, 40, 8, 0.7);
    let support = min_support(&db, 0.05);

    let patterns = vec![
        ("frequent", Pattern::Frequent { min_support: support }),
        ("closed", Pattern::Closed { min_support: support }),
        ("maximal", Pattern::Maximal { min_support: support }),
        ("generators", Pattern::Generator { min_support: support }),
        ("minimal", Pattern::MinimalRare { max_support: support }),
        (
            "size_between",
            Pattern::SizeBetween {
                min_support: support,
                min_size: 2,
                max_size: 3,
            },
        ),
        (
            "absence",
            Pattern::Absence {
                min_support: support,
                forbidden: vec![0, 1, 2],
            },
        ),
    ];

    for (name, pattern) in &patterns {
        group.bench_with_input(BenchmarkId::from_parameter(name), pattern, |b, pattern| {
            b.iter(|| mine_all(black_box(&db), black_box(pattern)));
        });
    }

    group.finish();
}

/// Frequent itemsets with different dataset sizes
fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    let configs = vec![
        ("small_100tx", 100, 20, 5),
        ("medium_500tx", 500, 50, 10),
        ("large_1000tx", 1000, 100, 15),
        ("xlarge_5000tx", 5000, 100, 20),
    ];

    for (name, num_tx, num_items, avg_size) in configs {
        let db = generate_transactions(num_tx, num_items, avg_size, 0.7);
        let pattern = Pattern::Frequent {
            min_support: min_support(&db, 0.1),
        };

        group.bench_with_input(BenchmarkId::from_parameter(name), &db, |b, db| {
            b.iter(|| mine_all(black_box(db), black_box(&pattern)));
        });
    }

    group.finish();
}

/// Closed itemsets with different min_support thresholds
fn bench_min_support(c: &mut Criterion) {
    let mut group = c.benchmark_group("closed_min_support");

    let db = generate_transactions(1000, 50, 10, 0.7);

    for ratio in [0.05, 0.1, 0.2, 0.3, 0.5] {
        let pattern = Pattern::Closed {
            min_support: min_support(&db, ratio),
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.2}", ratio)),
            &pattern,
            |b, pattern| {
                b.iter(|| mine_all(black_box(&db), black_box(pattern)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_families, bench_scaling, bench_min_support);
criterion_main!(benches);
