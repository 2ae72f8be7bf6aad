use std::path::PathBuf;

use anyhow::{Context, Result};
use data_sweeper::data::{encode, CellValue, Column, ExportFormat, Table};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Sales records with blanks and repeated rows, for trying out cleaning.
fn sample_table(rng: &mut SimpleRng, rows: usize) -> Table {
    let regions = ["North", "South", "East", "West"];
    let products = ["Widget", "Gadget", "Doohickey"];

    let mut region = Vec::new();
    let mut product = Vec::new();
    let mut units = Vec::new();
    let mut price = Vec::new();
    let mut returned = Vec::new();

    for _ in 0..rows {
        region.push(CellValue::Text(rng.pick(&regions).to_string()));
        product.push(CellValue::Text(rng.pick(&products).to_string()));
        units.push(if rng.chance(0.15) {
            CellValue::Missing
        } else {
            CellValue::Integer(rng.gauss(40.0, 12.0).round().max(0.0) as i64)
        });
        price.push(if rng.chance(0.1) {
            CellValue::Missing
        } else {
            CellValue::Float((rng.gauss(19.99, 4.0).max(1.0) * 100.0).round() / 100.0)
        });
        returned.push(CellValue::Bool(rng.chance(0.05)));
    }

    let mut columns = vec![
        Column::new("region", region),
        Column::new("product", product),
        Column::new("units", units),
        Column::new("price", price),
        Column::new("returned", returned),
    ];

    // Repeat a handful of earlier rows verbatim.
    let duplicates: Vec<usize> = (0..rows / 10)
        .map(|_| (rng.next_u64() % rows as u64) as usize)
        .collect();
    for column in &mut columns {
        let repeated: Vec<CellValue> = duplicates.iter().map(|&i| column.cells[i].clone()).collect();
        column.cells.extend(repeated);
    }

    Table::from_columns(columns)
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let table = sample_table(&mut rng, 200);

    for format in ExportFormat::ALL {
        let exported = encode(&table, "sales", format)?;
        let path = out_dir.join(&exported.file_name);
        std::fs::write(&path, &exported.content)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {} rows to {}", table.n_rows(), path.display());
    }
    Ok(())
}
