use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_ROWS: usize = 100;

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
}

/// Hourly ISO-8601 timestamps starting 2021-01-01T00:00:00.
fn hourly_index(n: usize) -> Vec<String> {
    (0..n)
        .map(|h| format!("2021-01-{:02}T{:02}:00:00", 1 + h / 24, h % 24))
        .collect()
}

fn uniform_series(rng: &mut SimpleRng) -> Vec<f64> {
    (0..N_ROWS).map(|_| rng.next_f64()).collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();

    for (scope, cluster) in [("aws_us-east1", "cluster1"), ("aws_us-west2", "cluster2")] {
        for pod in 1..=3 {
            columns.push((
                format!("site.scope_{scope}.cpustats{{clustertag={cluster},podtag=pod{pod}}}"),
                uniform_series(&mut rng),
            ));
            columns.push((
                format!("site.scope_{scope}.memstats{{clustertag={cluster},podtag=pod{pod}}}"),
                uniform_series(&mut rng),
            ));
        }
    }

    // Spikes: one strong, one mild.
    columns[0].1[40] = 6.0;
    columns[6].1[75] = 2.5;

    // A producer using the legacy alias key.
    columns.push((
        "site.scope_gcp_eu1.cpustats{clustertagtag=cluster3,podtag=pod1}".to_string(),
        uniform_series(&mut rng),
    ));

    // A column with gaps, removed when incomplete columns are dropped.
    let mut gappy = uniform_series(&mut rng);
    for row in [10, 11, 12] {
        gappy[row] = f64::NAN;
    }
    columns.push((
        "site.scope_aws_us-east1.cpustats{clustertag=cluster1,podtag=pod4}".to_string(),
        gappy,
    ));

    // Unstructured name, skipped by the cleaner.
    columns.push(("cpu_total".to_string(), uniform_series(&mut rng)));

    let index = hourly_index(N_ROWS);
    log::info!("generated {} columns over {} rows", columns.len(), index.len());
    write_parquet("sample_metrics.parquet", &index, &columns)?;
    write_csv("sample_metrics.csv", &index, &columns)?;

    println!(
        "Wrote {} columns ({N_ROWS} rows each) to sample_metrics.parquet and sample_metrics.csv",
        columns.len()
    );
    Ok(())
}

fn write_parquet(path: &str, index: &[String], columns: &[(String, Vec<f64>)]) -> Result<()> {
    let mut fields = vec![Field::new("timestamp", DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(index.to_vec()))];

    for (name, values) in columns {
        fields.push(Field::new(name, DataType::Float64, true));
        let nullable: Float64Array = values
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(*v) })
            .collect();
        arrays.push(Arc::new(nullable));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(path: &str, index: &[String], columns: &[(String, Vec<f64>)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec!["timestamp".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    writer.write_record(&header).context("writing CSV header")?;

    for (row, ts) in index.iter().enumerate() {
        let mut record = vec![ts.clone()];
        record.extend(columns.iter().map(|(_, values)| {
            let v = values[row];
            if v.is_nan() { String::new() } else { v.to_string() }
        }));
        writer.write_record(&record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}
