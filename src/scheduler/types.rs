use crate::model::Role;
use chrono::NaiveDate;
use thiserror::Error;

/// Invariant d'un plan qui n'est pas respecté.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingCapability,
    OverCapacity,
    Blocked,
    OutsideWindow,
    UnitSize,
    QuotaMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub film: String,
    pub role: Role,
    pub person: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("load {load} for {person} on {date} exceeds daily capacity {capacity}")]
    OverCapacity {
        person: String,
        date: NaiveDate,
        load: u32,
        capacity: u32,
    },
}
