use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of work: fetch all trade records the reporter exchanged with one
/// partner in one year.
///
/// A task is valid only when `partner_code` differs from the reporter; the
/// grid never emits the self-pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTask {
    pub year: i32,
    pub partner_code: u32,
}

impl FetchTask {
    pub fn new(year: i32, partner_code: u32) -> Self {
        Self { year, partner_code }
    }
}

impl fmt::Display for FetchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.partner_code)
    }
}
