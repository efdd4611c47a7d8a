//! Per-sheet correction pipeline.
//!
//! Sheets are processed strictly one at a time, each with one round-trip to
//! the correction oracle; any oracle or parse failure aborts the whole run
//! with no partial output. Alignment between submitted and corrected values
//! is positional only, so the row-count and column-count checks are the only
//! guard against a misbehaving oracle reshaping the data.

use crate::error::{CorrectorError, Result};
use crate::normalize::normalize;
use crate::oracle::CorrectionOracle;
use crate::prompt::PromptBuilder;
use crate::registry::BrandRegistry;
use crate::transfer;
use crate::workbook::{Sheet, Workbook};
use tracing::info;

/// Correction granularity for a run.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionMode {
    /// Submit every cell of every sheet.
    WholeSheet,
    /// Submit only the named column; sheets without it pass through.
    Column(String),
}

/// What happened to one sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetOutcome {
    Corrected,
    Skipped,
}

pub struct Pipeline<'a> {
    oracle: &'a dyn CorrectionOracle,
    prompt_builder: &'a PromptBuilder,
    registry: &'a BrandRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        oracle: &'a dyn CorrectionOracle,
        prompt_builder: &'a PromptBuilder,
        registry: &'a BrandRegistry,
    ) -> Self {
        Self {
            oracle,
            prompt_builder,
            registry,
        }
    }

    /// Corrects every sheet in place, in order. In column mode, a workbook
    /// where no sheet has the target column is a terminal error; individual
    /// sheets without it are skipped.
    pub async fn run(&self, workbook: &mut Workbook, mode: &CorrectionMode) -> Result<()> {
        let mut corrected = 0usize;
        for (name, sheet) in workbook.iter_mut() {
            match self.process_sheet(name, sheet, mode).await? {
                SheetOutcome::Corrected => {
                    corrected += 1;
                    info!("Corrected sheet '{}'", name);
                }
                SheetOutcome::Skipped => {
                    info!("Skipped sheet '{}': no target column", name);
                }
            }
        }

        if corrected == 0 {
            if let CorrectionMode::Column(target) = mode {
                return Err(CorrectorError::NoTargetColumn(target.clone()));
            }
        }
        Ok(())
    }

    pub async fn process_sheet(
        &self,
        name: &str,
        sheet: &mut Sheet,
        mode: &CorrectionMode,
    ) -> Result<SheetOutcome> {
        match mode {
            CorrectionMode::WholeSheet => {
                if sheet.column_count() == 0 {
                    return Ok(SheetOutcome::Skipped);
                }
                self.correct_whole_sheet(name, sheet).await?;
                Ok(SheetOutcome::Corrected)
            }
            CorrectionMode::Column(target) => match sheet.find_column(target) {
                Some(index) => {
                    self.correct_column(name, sheet, index).await?;
                    Ok(SheetOutcome::Corrected)
                }
                None => Ok(SheetOutcome::Skipped),
            },
        }
    }

    async fn correct_whole_sheet(&self, name: &str, sheet: &mut Sheet) -> Result<()> {
        let payload = transfer::sheet_to_csv(sheet)?;
        let corrected = self.ask_oracle(name, &payload).await?;
        let parsed = transfer::parse_sheet(&corrected)?;

        if parsed.row_count() != sheet.row_count() {
            return Err(shape_mismatch(
                format!(
                    "sheet '{}': expected {} rows, got {}",
                    name,
                    sheet.row_count(),
                    parsed.row_count()
                ),
                &corrected,
            ));
        }
        if parsed.column_count() != sheet.column_count() {
            return Err(shape_mismatch(
                format!(
                    "sheet '{}': expected {} columns, got {}",
                    name,
                    sheet.column_count(),
                    parsed.column_count()
                ),
                &corrected,
            ));
        }

        *sheet = parsed;
        Ok(())
    }

    async fn correct_column(&self, name: &str, sheet: &mut Sheet, index: usize) -> Result<()> {
        let header = sheet.headers[index].clone();
        let values = sheet.column_values(index);
        let payload = transfer::column_to_csv(&header, &values)?;

        let corrected = self.ask_oracle(name, &payload).await?;
        let (_, corrected_values) = transfer::parse_column(&corrected)?;

        if corrected_values.len() != values.len() {
            return Err(shape_mismatch(
                format!(
                    "sheet '{}' column '{}': expected {} values, got {}",
                    name,
                    header,
                    values.len(),
                    corrected_values.len()
                ),
                &corrected,
            ));
        }

        sheet.replace_column(index, corrected_values);
        Ok(())
    }

    async fn ask_oracle(&self, name: &str, payload: &str) -> Result<String> {
        info!(
            "Submitting {} bytes from sheet '{}' to the oracle",
            payload.len(),
            name
        );
        let prompt = self.prompt_builder.build(self.registry, payload);
        let raw = self.oracle.correct(&prompt).await?;
        Ok(normalize(&raw))
    }
}

fn shape_mismatch(reason: String, text: &str) -> CorrectorError {
    CorrectorError::ResponseParse {
        reason,
        text: text.to_string(),
    }
}
