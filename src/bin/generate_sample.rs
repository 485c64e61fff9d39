//! Writes a deterministic synthetic salary survey for offline use:
//!
//! ```text
//! cargo run --bin generate_sample
//! SALARY_DASH_SOURCE=sample_salaries.csv cargo run
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One survey row, serialized under the source column names.
#[derive(Debug, Serialize)]
struct SurveyRow {
    #[serde(rename = "ano")]
    year: i64,
    #[serde(rename = "senioridade")]
    seniority: &'static str,
    #[serde(rename = "contrato")]
    contract: &'static str,
    #[serde(rename = "tamanho_empresa")]
    company_size: &'static str,
    #[serde(rename = "cargo")]
    role: &'static str,
    #[serde(rename = "remoto")]
    remote: &'static str,
    #[serde(rename = "residencia_iso3")]
    residence_iso3: &'static str,
    #[serde(rename = "usd")]
    usd: f64,
}

/// Minimal deterministic PRNG (splitmix64).
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const YEARS: [i64; 5] = [2020, 2021, 2022, 2023, 2024];
const SENIORITY: [(&str, f64); 4] = [("junior", 0.6), ("pleno", 0.85), ("senior", 1.1), ("executivo", 1.5)];
const CONTRACTS: [&str; 4] = ["integral", "contrato", "parcial", "freelancer"];
const SIZES: [(&str, f64); 3] = [("pequena", 0.85), ("media", 1.0), ("grande", 1.1)];
const ROLES: [(&str, f64); 8] = [
    ("Data Scientist", 140_000.0),
    ("Data Engineer", 135_000.0),
    ("Data Analyst", 95_000.0),
    ("Machine Learning Engineer", 160_000.0),
    ("Research Scientist", 170_000.0),
    ("Analytics Engineer", 120_000.0),
    ("Data Architect", 155_000.0),
    ("BI Developer", 90_000.0),
];
const REMOTE: [&str; 3] = ["remoto", "hibrido", "presencial"];
const COUNTRIES: [(&str, f64); 8] = [
    ("USA", 1.0),
    ("CAN", 0.8),
    ("GBR", 0.7),
    ("DEU", 0.7),
    ("BRA", 0.35),
    ("IND", 0.25),
    ("ESP", 0.5),
    ("AUS", 0.75),
];

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<SurveyRow> {
    (0..n)
        .map(|_| {
            let year = rng.pick(&YEARS);
            let (seniority, s_mult) = rng.pick(&SENIORITY);
            let (company_size, c_mult) = rng.pick(&SIZES);
            let (role, base) = rng.pick(&ROLES);
            let (residence_iso3, geo_mult) = rng.pick(&COUNTRIES);
            let growth = 1.0 + 0.04 * (year - YEARS[0]) as f64;
            let mean = base * s_mult * c_mult * geo_mult * growth;
            let usd = rng.gauss(mean, mean * 0.15).max(5_000.0).round();

            SurveyRow {
                year,
                seniority,
                contract: rng.pick(&CONTRACTS),
                company_size,
                role,
                remote: rng.pick(&REMOTE),
                residence_iso3,
                usd,
            }
        })
        .collect()
}

fn write_csv(rows: &[SurveyRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[SurveyRow], path: &str) -> Result<()> {
    fn strings(rows: &[SurveyRow], f: impl Fn(&SurveyRow) -> &str) -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("ano", DataType::Int64, false),
        Field::new("senioridade", DataType::Utf8, false),
        Field::new("contrato", DataType::Utf8, false),
        Field::new("tamanho_empresa", DataType::Utf8, false),
        Field::new("cargo", DataType::Utf8, false),
        Field::new("remoto", DataType::Utf8, false),
        Field::new("residencia_iso3", DataType::Utf8, false),
        Field::new("usd", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            strings(rows, |r| r.seniority),
            strings(rows, |r| r.contract),
            strings(rows, |r| r.company_size),
            strings(rows, |r| r.role),
            strings(rows, |r| r.remote),
            strings(rows, |r| r.residence_iso3),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.usd).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(2_000, &mut rng);

    write_csv(&rows, "sample_salaries.csv")?;
    write_parquet(&rows, "sample_salaries.parquet")?;

    println!(
        "Wrote {} survey rows to sample_salaries.csv and sample_salaries.parquet",
        rows.len()
    );
    Ok(())
}
