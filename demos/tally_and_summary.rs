use voxdens_pipeline::{bin_file, summarize_file, tally_file, BinnerConfig};

fn main() {
    let dir = std::env::temp_dir().join("voxdens_demo");
    std::fs::create_dir_all(&dir).expect("create demo dir");
    let input = dir.join("results.txt");
    let output = dir.join("densities_result.txt");

    // Two frames; the second has a particle on the upper face of the box.
    std::fs::write(&input, "10,10,10,20,20,20\n10,10,10,100,50,50,-3,4,4\n")
        .expect("write demo input");

    let config = BinnerConfig::default();
    let run = bin_file(&input, &output, &config).expect("binning succeeds");
    println!(
        "Binned {} frames: {} particles, {} discarded",
        run.frames,
        run.particles,
        run.discarded()
    );

    let tally = tally_file(&input, 2, config.domain_side_length).expect("tally succeeds");
    println!(
        "Frame {}: {} of {} particles inside the closed box",
        tally.frame, tally.in_bounds, tally.particles
    );

    let summary = summarize_file(&output, config.grid_resolution).expect("summary succeeds");
    println!("Max region density: {}", summary.max_region_density);
    if let Some(peak) = summary.peak {
        println!(
            "Peak at frame {} voxel ({}, {}, {})",
            peak.frame, peak.voxel.ix, peak.voxel.iy, peak.voxel.iz
        );
    }

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
    let _ = std::fs::remove_dir(&dir);
}
