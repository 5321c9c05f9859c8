pub mod account;
pub mod observation;
pub mod profile;

pub use account::{Account, Subject};
pub use observation::Observation;
pub use profile::{Dermatologist, Medication, NotebookEntry, Profile};
