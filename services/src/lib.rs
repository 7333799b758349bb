//! Data model and stage drivers of the corpus pipeline.
//!
//! The stages run in order, each consuming the previous stage's artifact:
//! [`problem_list_service`] (clean) -> [`pair_service`] -> [`error_description_service`] ->
//! [`label_service`]. A stage whose artifact already exists is skipped unless forced.

pub mod artifact;
pub mod error;
pub mod error_description_service;
pub mod error_record;
pub mod label_record;
pub mod label_service;
pub mod pair_service;
pub mod problem;
pub mod problem_list_service;
pub mod stage;
pub mod submission;
pub mod submission_pair;
