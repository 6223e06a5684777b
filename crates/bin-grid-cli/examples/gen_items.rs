use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;

// Generate item lists for trying out the packer.
// Usage: cargo run -p bin-grid-cli --example gen_items -- [out_dir] [count]
// Default out_dir: assets/generated
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let out_root = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/generated"));
    let count: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(40);
    fs::create_dir_all(&out_root)?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(0xDEADBEEF);

    // mostly small tiles with the odd banner, like a dashboard
    let mixed: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let (cols, rows) = if rng.gen_bool(0.1) {
                (rng.gen_range(3..=4), 1)
            } else {
                (rng.gen_range(1..=2), rng.gen_range(1..=2))
            };
            serde_json::json!({"key": format!("tile_{}", i), "cols": cols, "rows": rows})
        })
        .collect();
    fs::write(
        out_root.join("mixed.json"),
        serde_json::to_string_pretty(&mixed)?,
    )?;

    // tall columns that leave gaps for fillers
    let tall: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let rows = rng.gen_range(1..=4);
            serde_json::json!({
                "key": format!("bar_{}", i),
                "cols": 1,
                "rows": rows,
                "hidden": i % 13 == 12,
            })
        })
        .collect();
    fs::write(
        out_root.join("tall.json"),
        serde_json::to_string_pretty(&tall)?,
    )?;

    println!("Generated item lists under {}", out_root.display());
    Ok(())
}
