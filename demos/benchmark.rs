use std::time::Instant;
use vecstore::{Store, Vector};

fn random_vector(dim: usize, seed: u64) -> Vector {
    let mut state = seed;
    let values = (0..dim)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
        })
        .collect::<Vec<f64>>();
    Vector::from(values)
}

fn run_benchmark(num_vectors: usize, dim: usize, num_keyspaces: usize) {
    println!("Vectors: {}, Dimensions: {}, Keyspaces: {}\n", num_vectors, dim, num_keyspaces);

    // Phase 1: Create store and keyspaces
    let start = Instant::now();
    let store = Store::new("benchmark_store");
    let keyspaces: Vec<_> = (0..num_keyspaces)
        .map(|i| store.create_keyspace(dim, format!("keyspace_{}", i)))
        .collect();
    println!("Phase 1 - Create store + {} keyspaces: {:.3}ms",
        num_keyspaces, start.elapsed().as_secs_f64() * 1000.0);

    // Phase 2: Insert, spread round-robin over the keyspaces
    let vectors: Vec<Vector> = (0..num_vectors)
        .map(|i| random_vector(dim, i as u64))
        .collect();
    let start = Instant::now();
    for (i, vec) in vectors.into_iter().enumerate() {
        keyspaces[i % num_keyspaces].add_vector(vec).unwrap();
    }
    let insert_time = start.elapsed();
    println!("Phase 2 - Insert {} vectors: {:.3}s ({:.0} inserts/s)",
        num_vectors, insert_time.as_secs_f64(),
        num_vectors as f64 / insert_time.as_secs_f64());

    // Phase 3: 100 nearest + threshold searches on the first keyspace
    let num_searches = 100;
    let start = Instant::now();
    let mut matched = 0;
    for i in 0..num_searches {
        let query = random_vector(dim, (num_vectors + i) as u64);
        keyspaces[0].find_nearest_neighbor(&query).unwrap();
        matched += keyspaces[0].find_neighbors_above_threshold(&query, 0.5).unwrap().len();
    }
    let search_time = start.elapsed();
    println!("Phase 3 - {} searches: {:.3}s (avg {:.3}ms/search, {} threshold matches)",
        num_searches, search_time.as_secs_f64(),
        search_time.as_secs_f64() / num_searches as f64 * 1000.0, matched);

    // Phase 4: Remove everything, always from the front
    let start = Instant::now();
    for i in 0..num_vectors {
        let ks = &keyspaces[i % num_keyspaces];
        if !ks.is_empty() {
            ks.remove_vector(0).unwrap();
        }
    }
    let remove_time = start.elapsed();
    println!("Phase 4 - Remove {} vectors: {:.3}s ({:.3}us/vector)\n",
        num_vectors, remove_time.as_secs_f64(),
        remove_time.as_secs_f64() / num_vectors as f64 * 1_000_000.0);
}

fn main() {
    println!("=== Small Scale Benchmark ===");
    run_benchmark(1_000, 128, 5);

    println!("=== Medium Scale Benchmark ===");
    run_benchmark(10_000, 256, 10);

    println!("=== Large Scale Benchmark ===");
    run_benchmark(100_000, 512, 20);
}
