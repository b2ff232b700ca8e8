//! Student records registrar
//!
//! Tracks students enrolled in academic programs: enrollment, year
//! advancement, transfers, subject enrollment, grading, graduation and
//! interruption, persisted to line-oriented text files.

pub mod core;
pub mod logger;

pub use self::core::error::{ErrorKind, RegistryError, Result};
pub use self::core::rules::{Confirmation, Registrar};
pub use self::core::session::{Outcome, Session};
pub use self::core::{config, get_version};
