mod csv_record_source;
mod sqlite_geo_repo;

pub use csv_record_source::CsvRecordSource;
pub use sqlite_geo_repo::SqliteGeoRepository;
