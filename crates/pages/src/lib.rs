//! # Pages
//!
//! The two client screens of the registry as state machines, independent of
//! how they are displayed:
//!
//! - [`AddSchoolPage`]: `Idle -> Submitting -> {Success, Error}`.
//! - [`ShowSchoolsPage`]: `Loading -> {Loaded, Error}`, with a manual retry.
//!
//! Both talk to the API through [`api_client::SchoolsApi`] and render to
//! plain text for the command-line front end.

pub mod add_school;
pub mod show_schools;

pub use add_school::{AddSchoolPage, FormValues, SubmitStatus};
pub use show_schools::{ListingState, ShowSchoolsPage};

#[cfg(test)]
pub(crate) mod testing;
