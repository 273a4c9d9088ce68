use data_loader::Dataset;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data");

    println!("Loading WhyWatch dataset...\n");

    let start = Instant::now();
    let dataset = Dataset::load_from_files(data_dir)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (items, matrix_size) = dataset.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Items: {}", items);
    println!("Similarity matrix: {}x{}", matrix_size, matrix_size);
    println!("\nPerformance: {:.0} scores/second",
             (matrix_size * matrix_size) as f64 / elapsed.as_secs_f64());
}
