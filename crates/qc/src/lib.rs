//! Quality control for observations entering verification.
//!
//! An observation value is rejected when it is absent, not finite, equal to
//! a missing-value sentinel, or outside its variable's physically plausible
//! range. Variables without a configured range only get the first three
//! checks.
//!
//! ```
//! use vericast_qc::{QcConfig, QcRejection};
//!
//! let qc = QcConfig::default();
//! assert!(qc.accept(Some(288.15), "temperature_2m"));
//! assert_eq!(
//!     qc.check(Some(999.9), "temperature_2m"),
//!     Err(QcRejection::Sentinel { value: 999.9 })
//! );
//! ```

mod config;
mod error;
mod filter;

pub use config::{PlausibleRange, QcConfig};
pub use error::QcError;
pub use filter::QcRejection;
