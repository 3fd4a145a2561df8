use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform noise in [-amplitude, amplitude]
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// Cover shares for one year: water shrinking, built-up growing, vegetation the rest.
fn cover(year: i32, start: i32, water0: f64, water_loss: f64, builtup0: f64, builtup_gain: f64, rng: &mut SimpleRng) -> (f64, f64, f64) {
    let t = (year - start) as f64;
    let water = (water0 - water_loss * t + rng.jitter(1.5)).clamp(0.0, 100.0);
    let builtup = (builtup0 + builtup_gain * t + rng.jitter(1.0)).clamp(0.0, 100.0 - water);
    let vegetation = 100.0 - water - builtup;
    (water, builtup, vegetation)
}

fn write_series(path: &Path, headers: [&str; 4], rows: &[(i32, f64, f64, f64)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers)?;
    for (year, water, builtup, vegetation) in rows {
        writer.write_record([
            year.to_string(),
            format!("{water:.2}"),
            format!("{builtup:.2}"),
            format!("{vegetation:.2}"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

const CONFIG: &str = r#"(
    fetch_timeout_secs: 15,
    probe_timeout_secs: 3,
    comparison: Some(("waterBody1", "waterBody2")),
    series: [
        (
            id: "waterBody1",
            label: Some("Kolleru Lake"),
            source: "data/waterBody1.csv",
            gallery_dir: Some("images/waterBody1"),
        ),
        (
            id: "waterBody2",
            label: Some("College Canal"),
            source: "data/waterBody2.csv",
            gallery_dir: Some("images/waterBody2"),
        ),
    ],
)
"#;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    fs::create_dir_all("data").context("creating data directory")?;
    for dir in ["images/waterBody1", "images/waterBody2"] {
        fs::create_dir_all(dir).with_context(|| format!("creating {dir}"))?;
    }

    // Lake: every year 2000..=2024, canonical headers
    let lake: Vec<_> = (2000..=2024)
        .map(|year| {
            let (w, b, v) = cover(year, 2000, 62.0, 0.9, 6.0, 0.4, &mut rng);
            (year, w, b, v)
        })
        .collect();
    write_series(
        Path::new("data/waterBody1.csv"),
        ["Year", "Water (%)", "Built-up (%)", "Vegetation (%)"],
        &lake,
    )?;

    // Canal: every other year from 2016, lowercase alias headers
    let canal: Vec<_> = (2016..=2024)
        .step_by(2)
        .map(|year| {
            let (w, b, v) = cover(year, 2016, 18.0, 0.7, 35.0, 1.6, &mut rng);
            (year, w, b, v)
        })
        .collect();
    write_series(
        Path::new("data/waterBody2.csv"),
        ["year", "water", "builtup", "vegetation"],
        &canal,
    )?;

    fs::write("dashboard.ron", CONFIG).context("writing dashboard.ron")?;

    println!(
        "Wrote {} + {} yearly records to data/ and dashboard.ron; put <year>.jpg|jpeg|png|webp composites into images/<id>/",
        lake.len(),
        canal.len()
    );
    Ok(())
}
