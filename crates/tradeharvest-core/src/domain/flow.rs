use serde::{Deserialize, Serialize};

/// Trade direction for a whole extraction run.
///
/// The invocation input encodes it numerically (1 = imports, anything else =
/// exports); everything downstream wants either the remote flow code or the
/// label used in storage keys, so both live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeFlow {
    Imports,
    Exports,
}

impl TradeFlow {
    /// Decode the numeric trade-regime input.
    pub fn from_regime(regime: i64) -> Self {
        if regime == 1 {
            TradeFlow::Imports
        } else {
            TradeFlow::Exports
        }
    }

    /// Flow code expected by the remote query string.
    pub fn flow_code(self) -> &'static str {
        match self {
            TradeFlow::Imports => "M",
            TradeFlow::Exports => "X",
        }
    }

    /// Label rendered into result/progress storage keys.
    pub fn label(self) -> &'static str {
        match self {
            TradeFlow::Imports => "imports",
            TradeFlow::Exports => "exports",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::imports(1, TradeFlow::Imports)]
    #[case::exports(2, TradeFlow::Exports)]
    #[case::zero_is_exports(0, TradeFlow::Exports)]
    #[case::negative_is_exports(-1, TradeFlow::Exports)]
    fn regime_decoding(#[case] regime: i64, #[case] expected: TradeFlow) {
        assert_eq!(TradeFlow::from_regime(regime), expected);
    }

    #[test]
    fn codes_and_labels() {
        assert_eq!(TradeFlow::Imports.flow_code(), "M");
        assert_eq!(TradeFlow::Exports.flow_code(), "X");
        assert_eq!(TradeFlow::Imports.label(), "imports");
        assert_eq!(TradeFlow::Exports.label(), "exports");
    }
}
