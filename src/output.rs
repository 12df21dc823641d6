use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::SummaryRecord;
use crate::error::Result;

#[derive(Debug, Serialize, Deserialize)]
struct LossRow {
    loss: f64,
}

/// Single `loss` column, one row per simulated year, no index.
pub fn write_losses_csv(path: &Path, losses: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for &loss in losses {
        writer.serialize(LossRow { loss })?;
    }
    writer.flush()?;
    info!("wrote {} simulated losses to {}", losses.len(), path.display());
    Ok(())
}

pub fn read_losses_csv(path: &Path) -> Result<Vec<f64>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut losses = Vec::new();
    for row in reader.deserialize() {
        let row: LossRow = row?;
        losses.push(row.loss);
    }
    Ok(losses)
}

pub fn write_summary_json(path: &Path, summary: &SummaryRecord) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    writer.flush()?;
    info!("wrote summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("aggloss-output-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn losses_csv_has_single_loss_column() {
        let dir = scratch_dir("csv");
        let path = dir.join("simulated_losses.csv");
        write_losses_csv(&path, &[0.0, 1234.5, 0.0]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["loss", "0.0", "1234.5", "0.0"]);
        assert_eq!(read_losses_csv(&path).unwrap(), vec![0.0, 1234.5, 0.0]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn summary_json_is_readable() {
        let dir = scratch_dir("json");
        let path = dir.join("summary.json");
        let summary = SummaryRecord::from_losses(&[0.0, 10.0, 20.0], "Poisson", "gamma");
        write_summary_json(&path, &summary).unwrap();

        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["sims"], 3);
        assert_eq!(v["severity_model"], "gamma");
        assert_eq!(v["mean"], 10.0);

        fs::remove_dir_all(dir).unwrap();
    }
}
