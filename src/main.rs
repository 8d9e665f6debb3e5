use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use sudoku_scan::cells::segment;
use sudoku_scan::image::io::{load_color_image, save_color};
use sudoku_scan::rectify::rectify;
use sudoku_scan::{solve, ExtractParams, SudokuGrid};

const USAGE: &str = "usage:
  sudoku-scan scan <photo> [rectified.png]   locate the puzzle and report filled cells
  sudoku-scan solve [grid.json]              solve a 9x9 grid (built-in demo puzzle by default)";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("scan") => match args.get(1) {
            Some(photo) => scan(photo, args.get(2).map(String::as_str)),
            None => Err(USAGE.to_string()),
        },
        Some("solve") => solve_cmd(args.get(1).map(String::as_str)),
        None => solve_cmd(None),
        Some(_) => Err(USAGE.to_string()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Rectify a photographed puzzle and report which cells look filled. Digit
/// recognition needs an external classifier, so the demo stops at the fill
/// map.
fn scan(photo_path: &str, rectified_out: Option<&str>) -> Result<(), String> {
    let params = ExtractParams::default();
    let photo = load_color_image(Path::new(photo_path))?;
    let rectified = rectify(photo.as_view(), &params.rectify).map_err(|e| e.to_string())?;
    println!("rectified {}x{}", rectified.w, rectified.h);

    let cells = segment(&rectified, &params.segment, &params.fill);
    let filled: Vec<usize> = cells.iter().filter(|c| c.filled).map(|c| c.index).collect();
    println!("{} of 81 cells look filled: {filled:?}", filled.len());

    if let Some(out) = rectified_out {
        save_color(&rectified, Path::new(out))?;
        println!("rectified view written to {out}");
    }
    Ok(())
}

fn solve_cmd(grid_path: Option<&str>) -> Result<(), String> {
    let grid = match grid_path {
        Some(path) => load_grid(path)?,
        None => demo_puzzle(),
    };
    println!("puzzle:\n{grid}");
    let mut solved = grid;
    if solve(&mut solved) {
        println!("solution:\n{solved}");
        Ok(())
    } else {
        Err("no solution exists".to_string())
    }
}

fn load_grid(path: &str) -> Result<SudokuGrid, String> {
    let data = fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse {path}: {e}"))
}

fn demo_puzzle() -> SudokuGrid {
    SudokuGrid([
        [5, 3, 0, 0, 7, 0, 0, 0, 0],
        [6, 0, 0, 1, 9, 5, 0, 0, 0],
        [0, 9, 8, 0, 0, 0, 0, 6, 0],
        [8, 0, 0, 0, 6, 0, 0, 0, 3],
        [4, 0, 0, 8, 0, 3, 0, 0, 1],
        [7, 0, 0, 0, 2, 0, 0, 0, 6],
        [0, 6, 0, 0, 0, 0, 2, 8, 0],
        [0, 0, 0, 4, 1, 9, 0, 0, 5],
        [0, 0, 0, 0, 8, 0, 0, 7, 9],
    ])
}
