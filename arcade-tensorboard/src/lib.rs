//! Writes records of the arcade DQN trainer into TensorBoard event files.
use arcade_core::record::{Record, RecordValue, Recorder};
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Key of the value used as the step of records.
const STEP_KEY: &str = "episode";

/// Write records to TFRecord.
///
/// Records are placed on the x-axis by their `episode` value.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// Every value other than the step is written as a scalar tagged with its key.
    /// Records without the step key are skipped.
    fn write(&mut self, record: Record) {
        let step = match record.get(STEP_KEY) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            None => {
                warn!("Record without scalar {:?} is skipped", STEP_KEY);
                return;
            }
        };

        for (k, v) in record.iter() {
            if k == STEP_KEY {
                continue;
            }
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
            };
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}
