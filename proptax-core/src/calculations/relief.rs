//! Property-tax relief benefits: Senior Freeze, ANCHOR and Stay NJ.
//!
//! # Program Order
//!
//! Programs are evaluated in a fixed order because each later program looks
//! at what the earlier ones already paid:
//!
//! | Step | Program | Benefit |
//! |------|---------|---------|
//! | 1 | Senior Freeze | Current tax − base-year tax, for eligible homeowners enrolled with a positive base |
//! | 2 | ANCHOR | Flat tier amount by income, plus an age bonus when a tier amount was granted |
//! | 3 | Stay NJ | `min(tax × percent, cap)` minus steps 1–2, limited so ANCHOR + Stay NJ ≤ combined cap |
//! | 4 | Clamp | Total never exceeds the current tax |
//!
//! When the total would exceed the current tax, the excess is taken back in
//! reverse grant order: Stay NJ first, then ANCHOR, then Senior Freeze.
//! Each component stays non-negative and `total` is always their sum.
//!
//! A profile without household income gets no relief at all.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use proptax_core::calculations::ReliefCalculator;
//! use proptax_core::rules::{
//!     AnchorRule, BenefitTier, HomeownerAnchor, ReliefPrograms, RenterAnchor, SeniorFreezeRule,
//!     StayNjRule,
//! };
//! use proptax_core::{AgeGroup, TaxpayerProfile};
//!
//! let programs = ReliefPrograms {
//!     senior_freeze: SeniorFreezeRule {
//!         age_min: 65,
//!         years_in_home_min: 3,
//!         income_limit: dec!(168798),
//!     },
//!     anchor: AnchorRule {
//!         homeowner: HomeownerAnchor {
//!             tier1: BenefitTier { limit: dec!(150000), base: dec!(1500) },
//!             tier2: BenefitTier { limit: dec!(250000), base: dec!(1000) },
//!             bonus_age: 65,
//!             bonus_amount: dec!(250),
//!         },
//!         renter: RenterAnchor {
//!             tier1: BenefitTier { limit: dec!(150000), base: dec!(450) },
//!             bonus_age: 65,
//!             bonus_amount: dec!(250),
//!         },
//!     },
//!     stay_nj: StayNjRule {
//!         age_min: 65,
//!         years_in_home_min: None,
//!         income_limit: dec!(500000),
//!         benefit_percent: dec!(0.5),
//!         benefit_cap: dec!(6500),
//!         total_relief_cap: Some(dec!(6500)),
//!     },
//! };
//!
//! let profile = TaxpayerProfile {
//!     age: AgeGroup::SixtyFivePlus,
//!     household_income: Some(dec!(70000)),
//!     years_in_home: 10,
//!     base_year_tax: dec!(11000),
//!     ..Default::default()
//! };
//!
//! let relief = ReliefCalculator::new(&programs).calculate(&profile, dec!(12505));
//!
//! assert_eq!(relief.freeze, dec!(1505));
//! assert_eq!(relief.anchor, dec!(1750));
//! // Target min(6252.50, 6500) minus 3255 already granted
//! assert_eq!(relief.stay_nj, dec!(2997.50));
//! assert_eq!(relief.total, dec!(6252.50));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{non_negative, round_half_up};
use crate::rules::ReliefPrograms;
use crate::{ReliefResult, TaxpayerProfile};

/// Calculator for the three relief programs.
#[derive(Debug, Clone)]
pub struct ReliefCalculator<'a> {
    programs: &'a ReliefPrograms,
}

impl<'a> ReliefCalculator<'a> {
    pub fn new(programs: &'a ReliefPrograms) -> Self {
        Self { programs }
    }

    /// Computes every program's benefit for `current_tax`.
    ///
    /// Negative tax amounts are treated as zero.
    pub fn calculate(
        &self,
        profile: &TaxpayerProfile,
        current_tax: Decimal,
    ) -> ReliefResult {
        let Some(income) = profile.household_income else {
            debug!("household income not provided; means-tested relief skipped");
            return ReliefResult::default();
        };

        let current_tax = non_negative(current_tax);
        let age = profile.age.representative_age();

        let freeze = self.senior_freeze(profile, age, income, current_tax);
        let anchor = self.anchor(profile, age, income);
        let stay_nj = self.stay_nj(profile, age, income, current_tax, freeze, anchor);

        let relief = self.clamp_to_tax(freeze, anchor, stay_nj, current_tax);
        debug!(
            %current_tax,
            freeze = %relief.freeze,
            anchor = %relief.anchor,
            stay_nj = %relief.stay_nj,
            total = %relief.total,
            "relief calculated"
        );
        relief
    }

    fn senior_freeze_eligible(
        &self,
        profile: &TaxpayerProfile,
        age: u32,
        income: Decimal,
    ) -> bool {
        let rule = &self.programs.senior_freeze;
        profile.is_homeowner()
            && age >= rule.age_min
            && profile.years_in_home >= rule.years_in_home_min
            && income <= rule.income_limit
    }

    /// Reimburses the increase over the base year. A zero base year means
    /// the taxpayer has not enrolled yet.
    fn senior_freeze(
        &self,
        profile: &TaxpayerProfile,
        age: u32,
        income: Decimal,
        current_tax: Decimal,
    ) -> Decimal {
        if !self.senior_freeze_eligible(profile, age, income) {
            return Decimal::ZERO;
        }

        let base = profile.base_year_tax;
        if base > Decimal::ZERO && current_tax > base {
            round_half_up(current_tax - base)
        } else {
            Decimal::ZERO
        }
    }

    /// Tier amount plus age bonus. The bonus is only paid on top of a
    /// non-zero tier amount.
    fn anchor(
        &self,
        profile: &TaxpayerProfile,
        age: u32,
        income: Decimal,
    ) -> Decimal {
        let (base, bonus_age, bonus_amount) = if profile.is_homeowner() {
            let rule = &self.programs.anchor.homeowner;
            let base = if income <= rule.tier1.limit {
                rule.tier1.base
            } else if income <= rule.tier2.limit {
                rule.tier2.base
            } else {
                Decimal::ZERO
            };
            (base, rule.bonus_age, rule.bonus_amount)
        } else {
            let rule = &self.programs.anchor.renter;
            let base = if income <= rule.tier1.limit {
                rule.tier1.base
            } else {
                Decimal::ZERO
            };
            (base, rule.bonus_age, rule.bonus_amount)
        };

        if base > Decimal::ZERO && age >= bonus_age {
            base + bonus_amount
        } else {
            base
        }
    }

    fn stay_nj_eligible(
        &self,
        profile: &TaxpayerProfile,
        age: u32,
        income: Decimal,
    ) -> bool {
        let rule = &self.programs.stay_nj;
        let years_ok = rule
            .years_in_home_min
            .is_none_or(|min| profile.years_in_home >= min);

        profile.is_homeowner() && age >= rule.age_min && years_ok && income < rule.income_limit
    }

    /// Share of current tax the program aims to cover, capped in dollars.
    fn stay_nj_target(
        &self,
        current_tax: Decimal,
    ) -> Decimal {
        let rule = &self.programs.stay_nj;
        round_half_up(current_tax * rule.benefit_percent).min(rule.benefit_cap)
    }

    /// Pays the gap between the target and what Senior Freeze and ANCHOR
    /// already cover, then applies the combined ANCHOR + Stay NJ cap.
    fn stay_nj(
        &self,
        profile: &TaxpayerProfile,
        age: u32,
        income: Decimal,
        current_tax: Decimal,
        freeze: Decimal,
        anchor: Decimal,
    ) -> Decimal {
        if !self.stay_nj_eligible(profile, age, income) {
            return Decimal::ZERO;
        }

        let target = self.stay_nj_target(current_tax);
        let potential = non_negative(target - (freeze + anchor));

        match self.programs.stay_nj.total_relief_cap {
            Some(cap) if anchor + potential > cap => non_negative(cap - anchor),
            _ => potential,
        }
    }

    /// Takes any amount over `current_tax` back from Stay NJ, then ANCHOR,
    /// then Senior Freeze.
    fn clamp_to_tax(
        &self,
        freeze: Decimal,
        anchor: Decimal,
        stay_nj: Decimal,
        current_tax: Decimal,
    ) -> ReliefResult {
        let mut excess = freeze + anchor + stay_nj - current_tax;
        if excess <= Decimal::ZERO {
            return ReliefResult::from_components(anchor, freeze, stay_nj);
        }

        debug!(%excess, %current_tax, "relief exceeds tax; reducing benefits");
        let mut absorb = |amount: Decimal| {
            let taken = amount.min(excess);
            excess -= taken;
            amount - taken
        };
        let stay_nj = absorb(stay_nj);
        let anchor = absorb(anchor);
        let freeze = absorb(freeze);

        ReliefResult::from_components(anchor, freeze, stay_nj)
    }
}
