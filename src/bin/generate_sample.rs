//! Writes a synthetic gene expression matrix for trying out the viewer.
//!
//! Usage: `generate_sample [output.csv]` (default `sample_matrix.csv`).

use anyhow::{Context, Result};

const N_GENES: usize = 40;
const CONDITIONS: [&str; 3] = ["control", "treated", "knockout"];
const REPLICATES: usize = 4;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// log2 fold change of `gene` in condition `cond` relative to control.
/// The first quarter of genes goes up under treatment, the second quarter
/// goes down in the knockout, the rest stays flat.
fn fold_change(gene: usize, cond: usize) -> f64 {
    match (gene * 4 / N_GENES, cond) {
        (0, 1) => 2.0,
        (0, 2) => 1.0,
        (1, 2) => -2.5,
        _ => 0.0,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args().nth(1).unwrap_or_else(|| "sample_matrix.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut header = vec!["gene".to_string()];
    for cond in CONDITIONS {
        for rep in 1..=REPLICATES {
            header.push(format!("{cond}_{rep}"));
        }
    }
    writer.write_record(&header)?;

    for gene in 0..N_GENES {
        // baseline expression between 2^4 and 2^12
        let base_log2 = 4.0 + 8.0 * rng.next_f64();
        let mut record = vec![format!("GENE{:03}", gene + 1)];
        for cond in 0..CONDITIONS.len() {
            for _ in 0..REPLICATES {
                let log2_expr = rng.gauss(base_log2 + fold_change(gene, cond), 0.3);
                record.push(format!("{:.2}", 2f64.powf(log2_expr)));
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {N_GENES} genes x {} samples to {output_path}",
        CONDITIONS.len() * REPLICATES
    );
    println!("Wrote {N_GENES} genes x {} samples to {output_path}", CONDITIONS.len() * REPLICATES);
    Ok(())
}
