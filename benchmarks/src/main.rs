// Entry point listing the available benchmarks

fn main() {
    println!("kc-house-price benchmark suite");
    println!();
    println!("Usage:");
    println!("  cargo bench --package benchmarks");
    println!("  cargo bench --package benchmarks --bench <benchmark_name>");
    println!("  cargo run --release --package benchmarks --bin evaluate -- --help");
    println!();
    println!("Available benchmarks:");
    println!("  - build: model fitting for growing training sets and both CV strategies");
    println!("  - predict: single and batched price estimates, feature assembly");
    println!("  - metrics: holdout metric computation");
}
