mod error;
mod parsing;
mod sample;
mod store;

pub use error::{IngestError, StoreError};
pub use parsing::{parse_hour_file, samples_from_triplets, RawTriplet};
pub use sample::Sample;
pub use store::{HourBucketStore, HOURS};
