use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use rowpipe_ingest::extract_csv;
use rowpipe_model::{RecordSet, fields_of};
use rowpipe_sink::{load, write_duplicates};
use rowpipe_transform::{DedupStep, RemapStep, TransformPipeline, TrimStep};

use crate::cli::RunArgs;
use crate::entities::{TaxiTrip, trip_dedup_key};
use crate::summary::apply_table_style;

/// Outcome of one pipeline run, for the end-of-run summary.
pub struct RunSummary {
    pub source: PathBuf,
    pub table: String,
    pub duplicates_file: PathBuf,
    pub extracted: usize,
    pub duplicates: usize,
    pub survivors: usize,
    /// `None` on a dry run.
    pub loaded: Option<usize>,
}

/// Value-mapping document accepted via `--mapping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSpec {
    pub field: String,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl Default for MappingSpec {
    fn default() -> Self {
        Self {
            field: "store_and_fwd_flag".to_string(),
            values: BTreeMap::from([
                ("N".to_string(), "No".to_string()),
                ("Y".to_string(), "Yes".to_string()),
            ]),
        }
    }
}

fn load_mapping(path: Option<&Path>) -> Result<MappingSpec> {
    let Some(path) = path else {
        return Ok(MappingSpec::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read mapping file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parse mapping file {}", path.display()))
}

pub fn run_pipeline(args: &RunArgs) -> Result<RunSummary> {
    let span = info_span!("run", source = %args.source.display());
    let _guard = span.enter();

    let mut records: RecordSet<TaxiTrip> = extract_csv(&args.source)
        .with_context(|| format!("extract {}", args.source.display()))?;
    let extracted = records.len();
    info!(records = extracted, "extraction complete");

    let mapping = load_mapping(args.mapping.as_deref())?;
    let pipeline = TransformPipeline::new()
        .add_step(Box::new(DedupStep::new(trip_dedup_key)))
        .add_step(Box::new(RemapStep::new(mapping.field, mapping.values)))
        .add_step(Box::new(TrimStep));
    let state = pipeline.execute(&mut records).context("transform passes")?;
    info!(
        survivors = records.len(),
        duplicates = state.duplicates.len(),
        "transform passes complete"
    );

    write_duplicates(&args.duplicates_file, &state.duplicates)
        .with_context(|| format!("append audit {}", args.duplicates_file.display()))?;

    let loaded = if args.dry_run {
        info!("dry run; skipping load");
        None
    } else {
        let rows = load(&records, &args.database, &args.table)
            .with_context(|| format!("load table {}", args.table))?;
        Some(rows)
    };

    Ok(RunSummary {
        source: args.source.clone(),
        table: args.table.clone(),
        duplicates_file: args.duplicates_file.clone(),
        extracted,
        duplicates: state.duplicates.len(),
        survivors: records.len(),
        loaded,
    })
}

pub fn run_schema() {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Type"]);
    apply_table_style(&mut table);
    for descriptor in fields_of::<TaxiTrip>() {
        table.add_row(vec![
            descriptor.name.clone(),
            descriptor.semantic_type.to_string(),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_trips_table(database: &Path) {
        let connection = rusqlite::Connection::open(database).expect("open database");
        connection
            .execute_batch(
                "CREATE TABLE taxi_trips (
                    vendor_id INTEGER,
                    tpep_pickup_datetime TEXT,
                    tpep_dropoff_datetime TEXT,
                    passenger_count INTEGER,
                    trip_distance REAL,
                    store_and_fwd_flag TEXT,
                    payment_type TEXT,
                    total_amount REAL
                )",
            )
            .expect("create table");
    }

    const SOURCE: &str = "\
vendor_id,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,trip_distance,store_and_fwd_flag,payment_type,total_amount
2,2024-03-01 09:00:00,2024-03-01 09:20:00,1,3.2,N,card,18.5
2,2024-03-01 09:00:00,2024-03-01 09:20:00,1,3.2,N,card,18.5
1,2024-03-01 10:00:00,2024-03-01 10:05:00,2,0.9, Y ,cash,7.0
,not-a-time,2024-03-01 11:00:00,1,1.0,N,card,5.0
";

    #[test]
    fn end_to_end_run_extracts_transforms_and_loads() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let source = dir.path().join("trips.csv");
        std::fs::write(&source, SOURCE).expect("write source");
        let database = dir.path().join("trips.db");
        create_trips_table(&database);

        let args = RunArgs {
            source,
            database: database.clone(),
            table: "taxi_trips".to_string(),
            mapping: None,
            duplicates_file: dir.path().join("duplicates.csv"),
            dry_run: false,
        };
        let summary = run_pipeline(&args).expect("pipeline run");

        // The malformed row is dropped at extraction; one exact duplicate is
        // removed; two survivors are loaded.
        assert_eq!(summary.extracted, 3);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.survivors, 2);
        assert_eq!(summary.loaded, Some(2));

        let connection = rusqlite::Connection::open(&database).expect("reopen database");
        let remapped: String = connection
            .query_row(
                "SELECT store_and_fwd_flag FROM taxi_trips WHERE vendor_id = 2",
                [],
                |row| row.get(0),
            )
            .expect("query remapped flag");
        assert_eq!(remapped, "No");
        // " Y " missed the mapping and was trimmed afterwards.
        let trimmed: String = connection
            .query_row(
                "SELECT store_and_fwd_flag FROM taxi_trips WHERE vendor_id = 1",
                [],
                |row| row.get(0),
            )
            .expect("query trimmed flag");
        assert_eq!(trimmed, "Y");

        let audit = std::fs::read_to_string(&args.duplicates_file).expect("read audit");
        assert!(audit.starts_with("vendor_id,tpep_pickup_datetime"));
        assert_eq!(audit.lines().count(), 2);
    }

    #[test]
    fn dry_run_skips_the_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let source = dir.path().join("trips.csv");
        std::fs::write(&source, SOURCE).expect("write source");

        let args = RunArgs {
            source,
            database: dir.path().join("never-created.db"),
            table: "taxi_trips".to_string(),
            mapping: None,
            duplicates_file: dir.path().join("duplicates.csv"),
            dry_run: true,
        };
        let summary = run_pipeline(&args).expect("dry run");
        assert_eq!(summary.loaded, None);
        assert!(!args.database.exists());
    }

    #[test]
    fn mapping_file_overrides_the_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("mapping.json");
        std::fs::write(
            &path,
            r#"{"field": "payment_type", "values": {"card": "CREDIT"}}"#,
        )
        .expect("write mapping");
        let mapping = load_mapping(Some(&path)).expect("load mapping");
        assert_eq!(mapping.field, "payment_type");
        assert_eq!(mapping.values["card"], "CREDIT");
    }

    #[test]
    fn default_mapping_expands_the_forwarding_flag() {
        let mapping = load_mapping(None).expect("default mapping");
        assert_eq!(mapping.field, "store_and_fwd_flag");
        assert_eq!(mapping.values["N"], "No");
        assert_eq!(mapping.values["Y"], "Yes");
    }
}
