use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Int8Array, Int16Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{AppointmentDataset, Attendance, Gender, RawAppointment};

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Structural problems with the input file itself. Everything else (IO,
/// malformed rows) is reported through `anyhow` with row context.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("input is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("input contains no appointment rows")]
    EmptyDataset,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an appointment dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the source export (header row with the original column names)
/// * `.json`    – records-oriented array of row objects
/// * `.parquet` – flat columnar schema with the same column names
///
/// Any malformed row is a load error: the dataset is either fully enriched
/// or not produced at all.
pub fn load_file(path: &Path) -> Result<AppointmentDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raws = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    let dataset = AppointmentDataset::from_raw(raws);
    if dataset.is_empty() {
        return Err(LoadError::EmptyDataset.into());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the source's column names (`ScheduledDay`,
/// `AppointmentDay`, `Age`, `Gender`, `Neighbourhood`, `Hipertension`,
/// `Diabetes`, `Alcoholism`, `Handcap`, `No-show`). Extra columns are
/// ignored by the serde mapping on [`RawAppointment`].
fn load_csv(path: &Path) -> Result<Vec<RawAppointment>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let mut raws = Vec::new();
    for (row_no, result) in reader.deserialize::<RawAppointment>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        raws.push(raw);
    }
    Ok(raws)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "ScheduledDay": "2016-04-29T18:38:08Z",
///     "AppointmentDay": "2016-04-29T00:00:00Z",
///     "Age": 62,
///     "Gender": "F",
///     "Neighbourhood": "JARDIM DA PENHA",
///     "Hipertension": 1,
///     "Diabetes": 0,
///     "Alcoholism": 0,
///     "Handcap": 0,
///     "No-show": "No"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawAppointment>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let raws: Vec<RawAppointment> = serde_json::from_str(&text).context("parsing JSON")?;
    Ok(raws)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a parquet file with a flat columnar schema. Timestamps are Utf8
/// columns holding RFC 3339 strings; the chronic indicators are integer
/// columns (Int8 through Int64 accepted).
fn load_parquet(path: &Path) -> Result<Vec<RawAppointment>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut raws = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let scheduled = column(&batch, "ScheduledDay")?;
        let appointment = column(&batch, "AppointmentDay")?;
        let age = column(&batch, "Age")?;
        let gender = column(&batch, "Gender")?;
        let neighborhood = column(&batch, "Neighbourhood")?;
        let hypertension = column(&batch, "Hipertension")?;
        let diabetes = column(&batch, "Diabetes")?;
        let alcoholism = column(&batch, "Alcoholism")?;
        let handicap = column(&batch, "Handcap")?;
        let attendance = column(&batch, "No-show")?;

        for row in 0..batch.num_rows() {
            let raw = RawAppointment {
                scheduled_at: parse_timestamp(utf8_value(scheduled, row)?)
                    .with_context(|| format!("row {row}: 'ScheduledDay'"))?,
                appointment_at: parse_timestamp(utf8_value(appointment, row)?)
                    .with_context(|| format!("row {row}: 'AppointmentDay'"))?,
                age: int_value(age, row).with_context(|| format!("row {row}: 'Age'"))? as i32,
                gender: parse_gender(utf8_value(gender, row)?)
                    .with_context(|| format!("row {row}: 'Gender'"))?,
                neighborhood: utf8_value(neighborhood, row)?.to_string(),
                hypertension: flag_value(hypertension, row)
                    .with_context(|| format!("row {row}: 'Hipertension'"))?,
                diabetes: flag_value(diabetes, row)
                    .with_context(|| format!("row {row}: 'Diabetes'"))?,
                alcoholism: flag_value(alcoholism, row)
                    .with_context(|| format!("row {row}: 'Alcoholism'"))?,
                handicap: flag_value(handicap, row)
                    .with_context(|| format!("row {row}: 'Handcap'"))?,
                attendance: parse_attendance(utf8_value(attendance, row)?)
                    .with_context(|| format!("row {row}: 'No-show'"))?,
            };
            raws.push(raw);
        }
    }

    Ok(raws)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a Arc<dyn Array>> {
    batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name).into())
}

/// Extract a `&str` from a Utf8 or LargeUtf8 column at the given row.
fn utf8_value(col: &Arc<dyn Array>, row: usize) -> Result<&str> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row))
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row)),
        other => bail!("expected string column, got {other:?}"),
    }
}

/// Extract an `i64` from any signed integer column at the given row.
fn int_value(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    macro_rules! downcast {
        ($ty:ty) => {
            col.as_any()
                .downcast_ref::<$ty>()
                .context(concat!("expected ", stringify!($ty)))?
                .value(row) as i64
        };
    }
    Ok(match col.data_type() {
        DataType::Int8 => downcast!(Int8Array),
        DataType::Int16 => downcast!(Int16Array),
        DataType::Int32 => downcast!(Int32Array),
        DataType::Int64 => downcast!(Int64Array),
        other => bail!("expected integer column, got {other:?}"),
    })
}

/// A chronic-condition indicator: a small non-negative integer.
fn flag_value(col: &Arc<dyn Array>, row: usize) -> Result<u8> {
    let v = int_value(col, row)?;
    u8::try_from(v).map_err(|_| anyhow::anyhow!("indicator value {v} out of range"))
}

// -- Categorical / timestamp parsing (parquet path; CSV and JSON go
//    through the serde renames on RawAppointment) --

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .with_context(|| format!("'{s}' is not an RFC 3339 timestamp"))
}

fn parse_gender(s: &str) -> Result<Gender> {
    match s {
        "F" | "Female" => Ok(Gender::Female),
        "M" | "Male" => Ok(Gender::Male),
        other => bail!("unknown gender code '{other}'"),
    }
}

fn parse_attendance(s: &str) -> Result<Attendance> {
    match s {
        "No" => Ok(Attendance::ShowedUp),
        "Yes" => Ok(Attendance::NoShow),
        other => bail!("unknown no-show code '{other}'"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::WaitingGroup;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use std::io::Write;

    const CSV_HEADER: &str = "PatientId,AppointmentID,Gender,ScheduledDay,AppointmentDay,Age,Neighbourhood,Scholarship,Hipertension,Diabetes,Alcoholism,Handcap,SMS_received,No-show";

    fn write_csv(dir: &tempfile::TempDir, name: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{CSV_HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        path
    }

    #[test]
    fn csv_loads_and_enriches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "appointments.csv",
            &[
                "29872499824296,5642903,F,2016-04-29T18:38:08Z,2016-04-29T00:00:00Z,62,JARDIM DA PENHA,0,1,0,0,0,0,No",
                "558997776694438,5642503,M,2016-04-27T08:36:51Z,2016-05-03T00:00:00Z,56,REPUBLICA,0,0,0,0,0,1,Yes",
            ],
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records[0];
        assert_eq!(first.gender, Gender::Female);
        assert_eq!(first.age, 62);
        assert_eq!(first.neighborhood, "JARDIM DA PENHA");
        assert_eq!(first.attendance, Attendance::ShowedUp);
        assert_eq!(first.chronic_conditions, 1);
        assert_eq!(first.waiting_days, 0);
        assert_eq!(first.waiting_group, Some(WaitingGroup::Days0To2));

        let second = &ds.records[1];
        assert_eq!(second.attendance, Attendance::NoShow);
        assert_eq!(second.waiting_days, 6);
        assert_eq!(second.waiting_group, Some(WaitingGroup::Days6To10));
    }

    #[test]
    fn malformed_timestamp_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "bad.csv",
            &["1,1,F,not-a-date,2016-04-29T00:00:00Z,30,CENTRO,0,0,0,0,0,0,No"],
        );
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn unknown_attendance_code_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "bad.csv",
            &["1,1,F,2016-04-29T08:00:00Z,2016-04-29T00:00:00Z,30,CENTRO,0,0,0,0,0,0,Maybe"],
        );
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn header_only_csv_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "empty.csv", &[]);
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("no appointment rows"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("appointments.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn json_records_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.json");
        std::fs::write(
            &path,
            r#"[{"ScheduledDay":"2016-04-29T18:38:08Z","AppointmentDay":"2016-05-09T00:00:00Z","Age":13,"Gender":"M","Neighbourhood":"CENTRO","Hipertension":0,"Diabetes":1,"Alcoholism":0,"Handcap":0,"No-show":"Yes"}]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records[0];
        assert_eq!(r.age_group, Some(crate::data::model::AgeGroup::Teen));
        assert_eq!(r.waiting_days, 10);
        assert_eq!(r.waiting_group, Some(WaitingGroup::Days11To178));
        assert_eq!(r.attendance, Attendance::NoShow);
    }

    #[test]
    fn parquet_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("ScheduledDay", DataType::Utf8, false),
            Field::new("AppointmentDay", DataType::Utf8, false),
            Field::new("Age", DataType::Int32, false),
            Field::new("Gender", DataType::Utf8, false),
            Field::new("Neighbourhood", DataType::Utf8, false),
            Field::new("Hipertension", DataType::Int32, false),
            Field::new("Diabetes", DataType::Int32, false),
            Field::new("Alcoholism", DataType::Int32, false),
            Field::new("Handcap", DataType::Int32, false),
            Field::new("No-show", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2016-04-26T10:00:00Z"])),
                Arc::new(StringArray::from(vec!["2016-04-29T00:00:00Z"])),
                Arc::new(Int32Array::from(vec![72])),
                Arc::new(StringArray::from(vec!["F"])),
                Arc::new(StringArray::from(vec!["MARIA ORTIZ"])),
                Arc::new(Int32Array::from(vec![1])),
                Arc::new(Int32Array::from(vec![1])),
                Arc::new(Int32Array::from(vec![0])),
                Arc::new(Int32Array::from(vec![0])),
                Arc::new(StringArray::from(vec!["No"])),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records[0];
        assert_eq!(r.age, 72);
        assert_eq!(r.age_group, Some(crate::data::model::AgeGroup::Senior));
        assert_eq!(r.chronic_conditions, 2);
        assert_eq!(r.waiting_days, 3);
        assert_eq!(r.attendance, Attendance::ShowedUp);
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new(
            "ScheduledDay",
            DataType::Utf8,
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec!["2016-04-26T10:00:00Z"]))],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("AppointmentDay"));
    }
}
