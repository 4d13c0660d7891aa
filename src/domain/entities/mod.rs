//! Domain Entities - the switcher's in-memory objects
//!
//! A session owns its candidate list; the list owns every icon. Dropping the
//! session is the only way icons are released.

pub mod candidate;
pub mod session;

pub use candidate::{CandidateList, CandidateWindow};
pub use session::{Selection, SwitcherSession};
