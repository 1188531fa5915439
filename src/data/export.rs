//! Per-batch DPS samples as CSV, one row per batch in batch order.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::combat::DamageSamples;

#[derive(Debug, Serialize)]
struct SampleRow {
    batch: usize,
    dps: f64,
}

pub fn write_samples<W: io::Write>(writer: W, samples: &DamageSamples) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for (batch, &dps) in samples.as_slice().iter().enumerate() {
        writer.serialize(SampleRow { batch, dps })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_samples_csv(path: impl AsRef<Path>, samples: &DamageSamples) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path.as_ref())?;
    write_samples(file, samples)?;
    tracing::debug!(path = %path.as_ref().display(), rows = samples.len(), "wrote samples");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_one_row_per_batch() {
        let samples = DamageSamples::new(vec![812.5, 790.25]);
        let mut out = Vec::new();
        write_samples(&mut out, &samples).expect("csv should write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "batch,dps\n0,812.5\n1,790.25\n");
    }
}
