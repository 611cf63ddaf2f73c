use std::io::Cursor;
use voxdens_core::Grid;
use voxdens_filters::bin_frame;
use voxdens_io::{format_histogram, parse_frame};
use voxdens_pipeline::bin_stream;

fn main() {
    // Three particles in a 100-unit box split into 10 voxels per axis.
    let grid = Grid::cube(100.0, 10).expect("valid grid");
    let frame = parse_frame("5,5,5,95,95,95,150,50,50").expect("valid frame");
    println!("Frame: {} particles", frame.len());

    let hist = bin_frame(&frame, &grid);
    println!(
        "Binned {} of {} particles into {} voxels",
        hist.total(),
        frame.len(),
        hist.len()
    );
    for (voxel, count) in hist.iter_voxels().filter(|&(_, c)| c > 0) {
        println!(
            "  voxel ({}, {}, {}) centre {:?}: {}",
            voxel.ix,
            voxel.iy,
            voxel.iz,
            grid.voxel_center(voxel),
            count
        );
    }

    let line = format_histogram(&hist);
    println!("Serialized line: {} chars, starts {:?}", line.len(), &line[..20]);

    // Whole-stream version over an in-memory buffer.
    let input = "1,1,1\n50,50,50,51,51,51\n";
    let mut out = Vec::new();
    let summary = bin_stream(Cursor::new(input), &mut out, &grid).expect("binning succeeds");
    println!(
        "Stream: {} frames, {} bytes of output",
        summary.frames,
        out.len()
    );
}
