//! Canonical partner list and the code-to-name reference directory.

use serde::Deserialize;
use std::collections::HashMap;

/// The fixed enumeration order of partner countries (numeric M49 codes).
///
/// Resume correctness depends on this order never changing between runs: the
/// cursor comparison is positional, not numeric.
pub const CANONICAL_PARTNERS: &[u32] = &[
    4, 8, 12, 20, 24, 28, 31, 32, 36, 40, 44, 48, 50, 51, 52, 56, 60, 64, 68, 70, 72, 76, 84, 96,
    100, 104, 108, 112, 116, 120, 124, 136, 140, 144, 148, 152, 156, 170, 178, 188, 191, 192, 196,
    203, 204, 208, 212, 214, 218, 222, 226, 231, 232, 233, 242, 246, 251, 262, 266, 268, 270, 276,
    288, 300, 308, 312, 320, 324, 328, 332, 340, 344, 348, 352, 360, 364, 368, 372, 376, 381, 384,
    388, 392, 398, 400, 404, 408, 410, 414, 417, 418, 422, 426, 428, 430, 434, 440, 442, 446, 450,
    454, 458, 462, 466, 470, 478, 480, 484, 490, 496, 498, 499, 504, 508, 512, 516, 524, 528, 554,
    558, 562, 566, 579, 586, 591, 598, 600, 604, 608, 616, 620, 624, 626, 634, 642, 643, 646, 682,
    686, 688, 690, 694, 699, 702, 703, 704, 705, 706, 710, 716, 724, 740, 748, 752, 757, 760, 762,
    764, 768, 776, 780, 784, 788, 792, 795, 800, 804, 818, 826, 834, 842, 854, 858, 860, 862, 894,
    899,
];

#[derive(Debug, Deserialize)]
struct DirectoryPayload {
    results: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    id: String,
    text: String,
}

/// Code-to-display-name lookup, parsed from the reference blob the remote
/// service publishes (`{"results": [{"id": "4", "text": "Afghanistan"}, ...]}`).
///
/// Entries whose id is not purely numeric (aggregates like "all") are skipped.
#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    names: HashMap<u32, String>,
}

impl CountryDirectory {
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let payload: DirectoryPayload = serde_json::from_slice(bytes)?;
        let names = payload
            .results
            .into_iter()
            .filter_map(|entry| entry.id.parse::<u32>().ok().map(|code| (code, entry.text)))
            .collect();
        Ok(Self { names })
    }

    pub fn name_for(&self, code: u32) -> &str {
        self.names
            .get(&code)
            .map(String::as_str)
            .unwrap_or("Unknown_Country")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_list_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for &code in CANONICAL_PARTNERS {
            assert!(seen.insert(code), "duplicate partner code {code}");
        }
    }

    #[test]
    fn parses_directory_and_skips_non_numeric_ids() {
        let raw = br#"{"results":[
            {"id":"4","text":"Afghanistan"},
            {"id":"all","text":"All"},
            {"id":"842","text":"USA"}
        ]}"#;
        let dir = CountryDirectory::from_json_bytes(raw).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.name_for(4), "Afghanistan");
        assert_eq!(dir.name_for(842), "USA");
    }

    #[test]
    fn unknown_code_gets_placeholder_name() {
        let dir = CountryDirectory::default();
        assert_eq!(dir.name_for(999), "Unknown_Country");
    }
}
