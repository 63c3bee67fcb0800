use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Booster generations in flight order: (category, version prefix, max payload kg, success rate).
const GENERATIONS: [(&str, &str, f64, f64); 5] = [
    ("v1.0", "F9 v1.0  B", 700.0, 0.2),
    ("v1.1", "F9 v1.1  B", 4500.0, 0.3),
    ("FT", "F9 FT B", 6800.0, 0.65),
    ("B4", "F9 B4 B", 9600.0, 0.55),
    ("B5", "F9 B5 B", 9600.0, 0.9),
];

const SITES: [&str; 4] = ["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"];

struct Launch {
    flight_number: i64,
    site: String,
    class: i64,
    /// `None` leaves the cell empty, like the real dataset's unknown payloads.
    payload: Option<f64>,
    booster_version: String,
    category: String,
}

fn generate(n_per_generation: usize, rng: &mut SimpleRng) -> Vec<Launch> {
    let mut launches = Vec::new();
    let mut flight_number = 1;
    for (category, prefix, max_payload, success_rate) in GENERATIONS {
        for _ in 0..n_per_generation {
            let payload = if rng.next_f64() < 0.05 {
                None
            } else {
                Some((rng.next_f64() * max_payload).round())
            };
            launches.push(Launch {
                flight_number,
                site: rng.pick(&SITES).to_string(),
                class: i64::from(rng.next_f64() < success_rate),
                payload,
                booster_version: format!("{prefix}{}", 1000 + flight_number),
                category: category.to_string(),
            });
            flight_number += 1;
        }
    }
    launches
}

fn write_csv(path: &Path, launches: &[Launch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "",
        "Flight Number",
        "Launch Site",
        "class",
        "Payload Mass (kg)",
        "Booster Version",
        "Booster Version Category",
    ])?;
    for (i, l) in launches.iter().enumerate() {
        writer.write_record([
            i.to_string(),
            l.flight_number.to_string(),
            l.site.clone(),
            l.class.to_string(),
            l.payload.map(|p| format!("{p:.1}")).unwrap_or_default(),
            l.booster_version.clone(),
            l.category.clone(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, launches: &[Launch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, true),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| &l.site))),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter(launches.iter().map(|l| l.payload))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| &l.booster_version))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| &l.category))),
        ],
    )
    .context("building record batch")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])?);

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "spacex_launch_dash.csv".to_string());
    let output_path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let launches = generate(12, &mut rng);

    match output_path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(output_path, &launches)?,
        Some("parquet") | Some("pq") => write_parquet(output_path, &launches)?,
        _ => bail!("output must end in .csv or .parquet: {output}"),
    }

    println!("Wrote {} launches to {output}", launches.len());
    Ok(())
}
