#![warn(clippy::all, missing_docs)]

//! Core domain logic for the subway network.
//!
//! This crate hosts the line topology model, the shortest path search over
//! every line, fare computation, and the configuration and snapshot loading
//! used by the command line front end and any future frontends.

pub mod config;
pub mod error;
pub mod fare;
pub mod models;
pub mod network;
pub mod path;
pub mod section;
pub mod snapshot;

pub use config::AppConfig;
pub use error::{ErrorKind, SubwayError};
pub use fare::{AgeBracket, DiscountPolicy, FareCalculator, FareSchedule};
pub use models::{Line, LineId, PathFare, PathRequest, SectionId, StationId};
pub use network::SubwayNetwork;
pub use path::{PathGraph, ShortestPath};
pub use section::{Insertion, Section, SectionChange, Sections};
pub use snapshot::{NetworkSnapshot, SectionRecord};
