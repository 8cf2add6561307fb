//! World generator binary: generates a grid of surface chunks and writes
//! height and biome maps.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --size <CHUNKS>   Grid width in chunks (default: 16)
//!   --chunk <CELLS>   Chunk width in cells (default: 16)
//!   --seed <SEED>     World seed (default: 12345, ignored with --config)
//!   --config <PATH>   Generation config JSON (default: built-in)
//!   --name <NAME>     World name / output directory (default: "valleys")
//!   --jobs <N>        Max parallel chunk builds (default: 4)
//!
//! Output structure:
//!   assets/worlds/<name>/
//!     manifest.json     # Config, chunk list, stage timings
//!     config.json       # Generation config used
//!     heightmap.png     # Ground height, grayscale
//!     biomes.png        # One color per biome

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use glam::IVec3;
use image::{GrayImage, Luma, Rgb, RgbImage};
use rayon::prelude::*;
use serde_json::json;

use vale::core::{logging, StageTimings};
use vale::generation::{ChunkGenerator, GenerationConfig, ValleysGenerator};
use vale::terrain::BiomeTable;
use vale::voxel::{MaterialRegistry, Palette};

const BIOME_COLORS: [[u8; 3]; 10] = [
    [96, 160, 64],
    [214, 200, 140],
    [60, 110, 190],
    [230, 170, 90],
    [200, 120, 80],
    [180, 180, 170],
    [40, 100, 70],
    [235, 245, 255],
    [150, 160, 140],
    [120, 80, 160],
];

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let size = parse_i32_arg(&args, "--size").unwrap_or(16).max(1);
    let chunk = parse_i32_arg(&args, "--chunk").unwrap_or(16).max(1);
    let seed = parse_u32_arg(&args, "--seed").unwrap_or(12345);
    let name = parse_str_arg(&args, "--name").unwrap_or_else(|| "valleys".to_string());
    let jobs = parse_usize_arg(&args, "--jobs").unwrap_or(4);

    let config = match parse_str_arg(&args, "--config") {
        Some(path) => GenerationConfig::load(&path).expect("Failed to load config"),
        None => GenerationConfig::with_seed(seed),
    };

    // Limit rayon's thread pool to cap peak memory usage
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .expect("Failed to configure thread pool");

    let output_dir = PathBuf::from(format!("assets/worlds/{}", name));

    println!("=== Vale World Generator ===");
    println!("World: {}", name);
    println!("Grid:  {} x {} chunks of {} cells", size, size, chunk);
    println!("Seed:  {}", config.seed);
    println!("Caves: {:?}", config.caves);
    println!("Jobs:  {} parallel", jobs);
    println!("Output: {}", output_dir.display());
    println!();

    let registry = MaterialRegistry::with_defaults();
    let palette = Palette::resolve(&registry).expect("Failed to resolve materials");
    let table = Arc::new(BiomeTable::with_defaults(&registry, &palette));
    let generator = ValleysGenerator::new(config.clone(), Arc::new(registry), table.clone())
        .expect("Failed to create generator");

    // Phase 1: one chunk per grid column, at the height of its center
    let mut extents = Vec::new();
    for cz in 0..size {
        for cx in 0..size {
            let h = generator.height_at(cx * chunk + chunk / 2, cz * chunk + chunk / 2);
            let pos = IVec3::new(cx, h.div_euclid(chunk), cz);
            extents.push(generator.chunk_extent(pos, chunk).expect("Invalid chunk extent"));
        }
    }
    let total = extents.len();

    // Phase 2: generate in parallel
    let start = Instant::now();
    let generated = AtomicUsize::new(0);
    let results: Vec<_> = extents
        .par_iter()
        .map(|extent| {
            let dense = generator.generate_dense(extent).expect("Chunk generation failed");
            let done = generated.fetch_add(1, Ordering::Relaxed) + 1;
            if done % 64 == 0 || done == total {
                let elapsed = start.elapsed().as_secs_f64();
                let rate = done as f64 / elapsed;
                let remaining = (total - done) as f64 / rate;
                eprintln!("  [{}/{}] {:.0} chunks/sec, ~{:.0}s remaining", done, total, rate, remaining);
            }
            (dense.chunk, dense.timings)
        })
        .collect();

    let elapsed = start.elapsed();
    println!();
    println!(
        "Generated {} chunks in {:.1}s ({:.0} chunks/sec)",
        total,
        elapsed.as_secs_f64(),
        total as f64 / elapsed.as_secs_f64()
    );

    // Phase 3: stitch maps into images
    let pixels = (size * chunk) as u32;
    let (lo, hi) = results
        .iter()
        .flat_map(|(c, _)| c.maps.heights.iter().copied())
        .fold((i32::MAX, i32::MIN), |(lo, hi), h| (lo.min(h), hi.max(h)));
    let range = (hi - lo).max(1) as f32;

    let mut heightmap = GrayImage::new(pixels, pixels);
    let mut biomes = RgbImage::new(pixels, pixels);
    let mut timings = StageTimings::new(total.max(1));
    let mut stone_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut chunks = Vec::with_capacity(total);

    for (generated, chunk_timings) in &results {
        timings.merge(chunk_timings);
        *stone_types.entry(format!("{:?}", generated.stone_type)).or_insert(0) += 1;

        let maps = &generated.maps;
        for (x, z) in maps.footprint.columns() {
            let i = maps.index(x, z);
            let v = ((maps.heights[i] - lo) as f32 / range * 255.0) as u8;
            heightmap.put_pixel(x as u32, z as u32, Luma([v]));
            let color = BIOME_COLORS[maps.biomes[i].0 as usize % BIOME_COLORS.len()];
            biomes.put_pixel(x as u32, z as u32, Rgb(color));
        }

        let min = generated.extent.min();
        chunks.push(json!({
            "x": min.x, "y": min.y, "z": min.z,
            "surface_max": generated.surface_max,
            "stone_type": format!("{:?}", generated.stone_type),
        }));
    }

    std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    heightmap.save(output_dir.join("heightmap.png")).expect("Failed to write height map");
    biomes.save(output_dir.join("biomes.png")).expect("Failed to write biome map");
    config.save(output_dir.join("config.json")).expect("Failed to write config");

    // Phase 4: manifest
    let biome_names: Vec<_> = table
        .iter()
        .map(|(id, def)| json!({"id": id.0, "name": def.name}))
        .collect();

    let manifest = json!({
        "name": name,
        "seed": config.seed,
        "grid": size,
        "chunk_size": chunk,
        "height_range": [lo, hi],
        "biomes": biome_names,
        "stone_types": stone_types,
        "stage_timings": timings.summaries(),
        "chunks": chunks,
    });

    let manifest_path = output_dir.join("manifest.json");
    let manifest_json = serde_json::to_string_pretty(&manifest).expect("Failed to serialize manifest");
    std::fs::write(&manifest_path, manifest_json).expect("Failed to write manifest");

    println!();
    println!("=== Generation Complete ===");
    println!("Heights: {} .. {}", lo, hi);
    for (stage, summary) in timings.summaries() {
        println!("  {:<10} avg {:>7.2} ms  max {:>7.2} ms", stage, summary.avg_ms, summary.max_ms);
    }
    println!("Output: {}", output_dir.display());
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
