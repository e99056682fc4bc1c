//! Log Events
//!
//! Raw client-supplied events, canonical normalized events, and the
//! per-request batch that carries them through dispatch and the DLQ.

mod batch;
mod normalize;
mod record;

pub use batch::LogBatch;
pub use normalize::normalize;
pub use record::{NormalizedLogEvent, Platform, RawLogEvent, Severity};
