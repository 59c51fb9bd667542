use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Benefits granted by the three relief programs for one tax amount.
///
/// `total` always equals `anchor + freeze + stay_nj`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliefResult {
    pub anchor: Decimal,
    pub freeze: Decimal,
    pub stay_nj: Decimal,
    pub total: Decimal,
}

impl ReliefResult {
    /// Builds a result whose total is recomputed from the components.
    pub fn from_components(
        anchor: Decimal,
        freeze: Decimal,
        stay_nj: Decimal,
    ) -> Self {
        Self {
            anchor,
            freeze,
            stay_nj,
            total: anchor + freeze + stay_nj,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero()
    }
}
