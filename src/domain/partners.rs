use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Amount;

/// Partner A's cut of the profit, in whole percent. Partner B gets the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerShare(u8);

impl PartnerShare {
    pub const DEFAULT_PERCENT: u8 = 60;

    pub fn new(partner_a_percent: u8) -> Result<Self, PartnerShareError> {
        if partner_a_percent > 100 {
            return Err(PartnerShareError::OutOfRange(partner_a_percent));
        }
        Ok(Self(partner_a_percent))
    }

    pub fn partner_a_percent(&self) -> u8 {
        self.0
    }

    pub fn partner_b_percent(&self) -> u8 {
        100 - self.0
    }

    /// Split a profit total between the two partners. Partner B receives the
    /// remainder, so the halves always add back up to `total`.
    pub fn split(&self, total: Amount) -> ProfitSplit {
        let partner_a = total * f64::from(self.0) / 100.0;
        ProfitSplit {
            partner_a,
            partner_b: total - partner_a,
        }
    }
}

impl Default for PartnerShare {
    fn default() -> Self {
        Self(Self::DEFAULT_PERCENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitSplit {
    pub partner_a: Amount,
    pub partner_b: Amount,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartnerShareError {
    #[error("partner share must be between 0 and 100 (got {0})")]
    OutOfRange(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_split_is_sixty_forty() {
        let share = PartnerShare::default();
        assert_eq!(share.partner_a_percent(), 60);
        assert_eq!(share.partner_b_percent(), 40);

        let split = share.split(13440.0);
        assert!((split.partner_a - 8064.0).abs() < 1e-9);
        assert!((split.partner_b - 5376.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_adds_back_to_total() {
        for percent in [0, 1, 33, 50, 60, 99, 100] {
            let share = PartnerShare::new(percent).unwrap();
            let split = share.split(1234.567);
            assert!((split.partner_a + split.partner_b - 1234.567).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extreme_shares() {
        let all_a = PartnerShare::new(100).unwrap().split(500.0);
        assert_eq!(all_a.partner_a, 500.0);
        assert_eq!(all_a.partner_b, 0.0);

        let all_b = PartnerShare::new(0).unwrap().split(500.0);
        assert_eq!(all_b.partner_a, 0.0);
        assert_eq!(all_b.partner_b, 500.0);
    }

    #[test]
    fn test_share_out_of_range() {
        assert_eq!(
            PartnerShare::new(101),
            Err(PartnerShareError::OutOfRange(101))
        );
    }
}
