#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Crop clusters inside the accepted input ranges: N, P, K, temperature, humidity, ph, rainfall
pub const CENTERS: [(&str, [f64; 7]); 3] = [
    ("rice", [80.0, 45.0, 40.0, 23.0, 82.0, 6.4, 230.0]),
    ("maize", [78.0, 48.0, 20.0, 22.0, 65.0, 6.2, 85.0]),
    ("chickpea", [40.0, 68.0, 80.0, 18.0, 17.0, 7.3, 80.0]),
];

const SPREAD: [f64; 7] = [4.0, 4.0, 3.0, 1.0, 2.0, 0.2, 8.0];

pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a labeled CSV; columns are deliberately not in canonical order
pub fn write_dataset(dir: &Path, label_column: &str, per_class: usize) -> PathBuf {
    let mut rng = StdRng::seed_from_u64(11);
    let mut csv = format!("{label_column},rainfall,ph,humidity,temperature,K,P,N\n");

    for _ in 0..per_class {
        for (label, center) in &CENTERS {
            let v: Vec<f64> = center
                .iter()
                .zip(SPREAD)
                .map(|(c, s)| c + rng.gen_range(-s..s))
                .collect();
            csv.push_str(&format!(
                "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}\n",
                label, v[6], v[5], v[4], v[3], v[2], v[1], v[0]
            ));
        }
    }

    let path = dir.join("crops.csv");
    std::fs::write(&path, csv).unwrap();
    path
}
