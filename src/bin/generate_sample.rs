use std::sync::Arc;

use arrow::array::{Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use parquet::arrow::ArrowWriter;

const CSV_PATH: &str = "appointments.csv";
const PARQUET_PATH: &str = "appointments.parquet";
const N_ROWS: usize = 2_400;

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One generated source row, in the source table's column layout.
struct Row {
    patient_id: u64,
    appointment_id: u64,
    gender: &'static str,
    scheduled_at: DateTime<Utc>,
    appointment_at: DateTime<Utc>,
    age: i32,
    neighborhood: &'static str,
    scholarship: u8,
    hypertension: u8,
    diabetes: u8,
    alcoholism: u8,
    handicap: u8,
    sms_received: u8,
    no_show: &'static str,
}

fn generate_row(rng: &mut SimpleRng, appointment_id: u64) -> Row {
    const NEIGHBORHOODS: [&str; 15] = [
        "ANDORINHAS",
        "BENTO FERREIRA",
        "CENTRO",
        "CONSOLACAO",
        "GURIGICA",
        "ILHA DO PRINCIPE",
        "JABOUR",
        "JARDIM CAMBURI",
        "JARDIM DA PENHA",
        "MARIA ORTIZ",
        "PRAIA DO SUA",
        "REPUBLICA",
        "ROMAO",
        "SANTA MARTHA",
        "SAO PEDRO",
    ];

    let gender = if rng.chance(0.65) { "F" } else { "M" };
    let age = rng.gauss(38.0, 23.0).clamp(0.0, 98.0) as i32;
    let slot = ((rng.next_f64() * NEIGHBORHOODS.len() as f64) as usize).min(NEIGHBORHOODS.len() - 1);
    let neighborhood = NEIGHBORHOODS[slot];

    let hypertension = u8::from(rng.chance(f64::from(age) / 150.0));
    let diabetes = u8::from(rng.chance(f64::from(age) / 250.0));
    let alcoholism = u8::from(rng.chance(0.03));
    let handicap = u8::from(rng.chance(0.02));

    let base = Utc.with_ymd_and_hms(2016, 4, 1, 0, 0, 0).unwrap();
    let scheduled_at = base
        + Duration::days((rng.next_f64() * 50.0) as i64)
        + Duration::seconds(7 * 3600 + (rng.next_f64() * 36_000.0) as i64);

    // Mostly short waits; a thin tail past the last bucket, and the
    // occasional booked-after-the-fact row the source is known to contain.
    let waiting_days = if rng.chance(0.01) {
        -1
    } else if rng.chance(0.02) {
        178 + (rng.next_f64() * 180.0) as i64
    } else {
        (rng.next_f64().powi(2) * 45.0) as i64
    };
    let appointment_date = scheduled_at.date_naive() + Duration::days(waiting_days);
    let appointment_at = Utc.from_utc_datetime(&appointment_date.and_hms_opt(0, 0, 0).unwrap());

    // No-show rate climbs with the wait and falls with age.
    let p_no_show = (0.12 + 0.012 * waiting_days.clamp(0, 30) as f64
        - 0.002 * f64::from(age))
    .clamp(0.02, 0.6);

    Row {
        patient_id: rng.next_u64() >> 16,
        appointment_id,
        gender,
        scheduled_at,
        appointment_at,
        age,
        neighborhood,
        scholarship: u8::from(rng.chance(0.1)),
        hypertension,
        diabetes,
        alcoholism,
        handicap,
        sms_received: u8::from(rng.chance(0.32)),
        no_show: if rng.chance(p_no_show) { "Yes" } else { "No" },
    }
}

fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn write_csv(rows: &[Row]) {
    let mut writer = csv::Writer::from_path(CSV_PATH).expect("Failed to create CSV file");
    writer
        .write_record([
            "PatientId",
            "AppointmentID",
            "Gender",
            "ScheduledDay",
            "AppointmentDay",
            "Age",
            "Neighbourhood",
            "Scholarship",
            "Hipertension",
            "Diabetes",
            "Alcoholism",
            "Handcap",
            "SMS_received",
            "No-show",
        ])
        .expect("Failed to write CSV header");

    for row in rows {
        writer
            .write_record([
                row.patient_id.to_string(),
                row.appointment_id.to_string(),
                row.gender.to_string(),
                timestamp(row.scheduled_at),
                timestamp(row.appointment_at),
                row.age.to_string(),
                row.neighborhood.to_string(),
                row.scholarship.to_string(),
                row.hypertension.to_string(),
                row.diabetes.to_string(),
                row.alcoholism.to_string(),
                row.handicap.to_string(),
                row.sms_received.to_string(),
                row.no_show.to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(rows: &[Row]) {
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

    let scheduled: Vec<String> = rows.iter().map(|r| timestamp(r.scheduled_at)).collect();
    let appointment: Vec<String> = rows.iter().map(|r| timestamp(r.appointment_at)).collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(scheduled)),
            Arc::new(StringArray::from(appointment)),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| r.age).collect::<Vec<i32>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.gender).collect::<Vec<&str>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.neighborhood).collect::<Vec<&str>>(),
            )),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| i32::from(r.hypertension)).collect::<Vec<i32>>(),
            )),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| i32::from(r.diabetes)).collect::<Vec<i32>>(),
            )),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| i32::from(r.alcoholism)).collect::<Vec<i32>>(),
            )),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| i32::from(r.handicap)).collect::<Vec<i32>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.no_show).collect::<Vec<&str>>(),
            )),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(PARQUET_PATH).expect("Failed to create parquet file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut rows: Vec<Row> = (0..N_ROWS)
        .map(|i| generate_row(&mut rng, 5_000_000 + i as u64))
        .collect();

    // One age out of every bracket, as the source data famously has.
    rows[0].age = -1;

    write_csv(&rows);
    write_parquet(&rows);

    println!(
        "Wrote {} appointments to {CSV_PATH} and {PARQUET_PATH}",
        rows.len()
    );
}
