/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → enriched AppointmentDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ AppointmentDataset │  Vec<Appointment>, unique neighborhoods
///   └────────────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │ ───▶ │ aggregate │  read-only subset → grouped counts
///   └──────────┘      └───────────┘
/// ```
///
/// The dataset is immutable after loading; a filter change selects a
/// read-only subset and re-runs the aggregations for the charts that
/// declare a dependency on that filter.
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
