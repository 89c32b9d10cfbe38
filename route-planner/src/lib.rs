//! Timetable connection planner.
//!
//! Answers: "which services take me from A to B, directly or with changes,
//! on the days I want to travel?"

pub mod domain;
pub mod planner;
pub mod timetable;
