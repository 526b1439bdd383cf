//! Types and traits for recording training metrics.
//!
//! * [`Record`] - a container of key-value pairs of metrics
//! * [`RecordValue`] - the values that can be stored in a [`Record`]
//! * [`Recorder`] - a sink of records, like a TensorBoard writer
//! * [`BufferedRecorder`] - keeps records in memory
//! * [`NullRecorder`] - discards all records
//!
//! ```rust
//! use arcade_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let episode = 1;
//! let reward = -21f32;
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(episode as f32));
//! record.insert("reward", RecordValue::Scalar(reward));
//! assert_eq!(record.get_scalar("reward").unwrap(), -21.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
