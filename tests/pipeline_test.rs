use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

use brandfix::error::CorrectorError;
use brandfix::oracle::CorrectionOracle;
use brandfix::pipeline::{CorrectionMode, Pipeline, SheetOutcome};
use brandfix::prompt::PromptBuilder;
use brandfix::registry::BrandRegistry;
use brandfix::workbook::{Sheet, Workbook};
use brandfix::xlsx;

/// Echoes the CSV payload back, wrapped in Markdown fences the way real
/// oracles tend to, counting how many calls it receives.
struct EchoOracle {
    calls: AtomicUsize,
}

impl EchoOracle {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CorrectionOracle for EchoOracle {
    async fn correct(&self, prompt: &str) -> brandfix::error::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("```csv\n{}\n```", extract_payload(prompt)))
    }
}

/// Applies fixed misspelling -> canonical replacements to the payload.
struct MappingOracle {
    replacements: Vec<(&'static str, &'static str)>,
}

#[async_trait::async_trait]
impl CorrectionOracle for MappingOracle {
    async fn correct(&self, prompt: &str) -> brandfix::error::Result<String> {
        let mut text = extract_payload(prompt);
        for (from, to) in &self.replacements {
            text = text.replace(from, to);
        }
        Ok(format!("```\n{}\n```", text))
    }
}

/// Drops the payload's last line, simulating an oracle that loses a row.
struct TruncatingOracle;

#[async_trait::async_trait]
impl CorrectionOracle for TruncatingOracle {
    async fn correct(&self, prompt: &str) -> brandfix::error::Result<String> {
        let payload = extract_payload(prompt);
        let kept: Vec<&str> = payload.lines().collect();
        Ok(kept[..kept.len() - 1].join("\n"))
    }
}

/// Pulls the fenced CSV block back out of the built prompt.
fn extract_payload(prompt: &str) -> String {
    let start = prompt.find("```").expect("prompt has an opening fence") + 3;
    let end = prompt.rfind("```").expect("prompt has a closing fence");
    prompt[start..end].trim().to_string()
}

fn registry() -> BrandRegistry {
    BrandRegistry::build(
        &["Maybelline".to_string(), "L'Oréal".to_string()],
        &[],
    )
}

fn briefing_workbook() -> Workbook {
    let mut workbook = Workbook::new();
    workbook.push(
        "Q1",
        Sheet::new(
            vec!["brand".into(), "spend".into()],
            vec![
                vec!["Maybelin".into(), "100".into()],
                vec!["Loreal".into(), "250".into()],
            ],
        ),
    );
    workbook.push(
        "Agencies",
        Sheet::new(
            vec!["agency".into()],
            vec![vec!["Mediacom".into()]],
        ),
    );
    workbook
}

#[tokio::test]
async fn column_mode_corrects_target_column_and_skips_the_rest() -> Result<()> {
    let oracle = MappingOracle {
        replacements: vec![("Maybelin", "Maybelline"), ("Loreal", "L'Oréal")],
    };
    let prompt_builder = PromptBuilder::default();
    let registry = registry();
    let pipeline = Pipeline::new(&oracle, &prompt_builder, &registry);

    let mut workbook = briefing_workbook();
    pipeline
        .run(&mut workbook, &CorrectionMode::Column("brand".to_string()))
        .await?;

    let q1 = workbook.sheet("Q1").unwrap();
    assert_eq!(q1.rows[0], vec!["Maybelline", "100"]);
    assert_eq!(q1.rows[1], vec!["L'Oréal", "250"]);

    // The sheet without a brand column is untouched
    let agencies = workbook.sheet("Agencies").unwrap();
    assert_eq!(agencies.rows[0], vec!["Mediacom"]);
    Ok(())
}

#[tokio::test]
async fn skipped_sheet_issues_no_oracle_call() -> Result<()> {
    let oracle = EchoOracle::new();
    let prompt_builder = PromptBuilder::default();
    let registry = registry();
    let pipeline = Pipeline::new(&oracle, &prompt_builder, &registry);

    let mut sheet = Sheet::new(vec!["agency".into()], vec![vec!["Mediacom".into()]]);
    let outcome = pipeline
        .process_sheet("Agencies", &mut sheet, &CorrectionMode::Column("brand".to_string()))
        .await?;

    assert_eq!(outcome, SheetOutcome::Skipped);
    assert_eq!(oracle.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn whole_sheet_echo_round_trip_preserves_content() -> Result<()> {
    let oracle = EchoOracle::new();
    let prompt_builder = PromptBuilder::default();
    let registry = registry();
    let pipeline = Pipeline::new(&oracle, &prompt_builder, &registry);

    let mut workbook = briefing_workbook();
    let before = workbook.sheet("Q1").unwrap().clone();
    pipeline.run(&mut workbook, &CorrectionMode::WholeSheet).await?;

    assert_eq!(workbook.sheet("Q1").unwrap(), &before);
    assert_eq!(oracle.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn row_count_mismatch_is_a_response_parse_error() -> Result<()> {
    let oracle = TruncatingOracle;
    let prompt_builder = PromptBuilder::default();
    let registry = registry();
    let pipeline = Pipeline::new(&oracle, &prompt_builder, &registry);

    let mut workbook = briefing_workbook();
    let err = pipeline
        .run(&mut workbook, &CorrectionMode::Column("brand".to_string()))
        .await
        .unwrap_err();

    match err {
        CorrectorError::ResponseParse { reason, text } => {
            assert!(reason.contains("expected 2 values, got 1"), "reason: {}", reason);
            // The offending normalized text is surfaced for diagnosis
            assert!(text.contains("Maybelin"));
        }
        other => panic!("expected ResponseParse, got {}", other),
    }
    Ok(())
}

#[tokio::test]
async fn workbook_without_target_column_anywhere_is_fatal() -> Result<()> {
    let oracle = EchoOracle::new();
    let prompt_builder = PromptBuilder::default();
    let registry = registry();
    let pipeline = Pipeline::new(&oracle, &prompt_builder, &registry);

    let mut workbook = Workbook::new();
    workbook.push(
        "Agencies",
        Sheet::new(vec!["agency".into()], vec![vec!["Mediacom".into()]]),
    );

    let err = pipeline
        .run(&mut workbook, &CorrectionMode::Column("brand".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CorrectorError::NoTargetColumn(column) if column == "brand"));
    Ok(())
}

#[tokio::test]
async fn end_to_end_corrected_workbook_survives_export() -> Result<()> {
    let oracle = MappingOracle {
        replacements: vec![("Maybelin", "Maybelline"), ("Loreal", "L'Oréal")],
    };
    let prompt_builder = PromptBuilder::default();
    let registry = registry();
    let pipeline = Pipeline::new(&oracle, &prompt_builder, &registry);

    let mut workbook = briefing_workbook();
    pipeline
        .run(&mut workbook, &CorrectionMode::Column("brand".to_string()))
        .await?;

    // Export to disk and read the file back the way a user would
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("corrected.xlsx");
    let buffer = xlsx::write_workbook(&workbook, true)?;
    std::fs::write(&path, buffer)?;

    let reread = xlsx::read_workbook(&path)?;
    let q1 = reread.sheet("Q1").unwrap();
    assert_eq!(q1.headers, vec!["brand", "spend"]);
    assert_eq!(q1.column_values(0), vec!["Maybelline", "L'Oréal"]);
    assert_eq!(q1.column_values(1), vec!["100", "250"]);
    assert!(reread.sheet("Agencies").is_some());
    Ok(())
}
