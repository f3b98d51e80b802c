//! Recursive projection engine for a single model point
//!
//! Every quantity is a pure function of the projection month `t` (plus a
//! timing stage for the in-force count), defined by the recurrences below
//! and evaluated on demand. A quantity may depend on itself at `t-1`; the
//! base case at `t=0` bounds the recursion. Each (quantity, argument) pair
//! is computed at most once per engine instance through the memo cells in
//! [`super::memo`].

use std::str::FromStr;

use crate::assumptions::Assumptions;
use crate::error::{ProjectionError, Result};
use crate::policy::{ModelPoint, Sex};

use super::memo::{CellStats, MemoCell, ScalarCell};
use super::results::{CashflowRow, DecrementRow, ProjectionResult, PvSummary};

/// Relative tolerance for the present-value reconciliation check
const PV_CHECK_REL_TOL: f64 = 1e-6;

/// In-force timing stage within a month.
///
/// Each month the in-force count passes three sub-stages in a fixed
/// order: before maturity, before new business, before lapse and death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timing {
    /// Before maturity, after the prior month's lapses and deaths
    BefMat,
    /// Before new business, after maturity
    BefNb,
    /// Before lapse and death, after new business
    BefDecr,
}

impl Timing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timing::BefMat => "BEF_MAT",
            Timing::BefNb => "BEF_NB",
            Timing::BefDecr => "BEF_DECR",
        }
    }
}

impl FromStr for Timing {
    type Err = ProjectionError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "BEF_MAT" => Ok(Timing::BefMat),
            "BEF_NB" => Ok(Timing::BefNb),
            "BEF_DECR" => Ok(Timing::BefDecr),
            other => Err(ProjectionError::InvalidTiming {
                token: other.to_string(),
            }),
        }
    }
}

/// Basis for the claim amount per policy
#[derive(Debug, Clone, Copy)]
pub enum ClaimBasis {
    /// Claim per policy equals the full sum assured
    FullSumAssured,
    /// Fixed claim amount per policy
    PerPolicy(f64),
}

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Acquisition expense per new business policy
    pub expense_acq: f64,

    /// Annual maintenance expense per in-force policy
    pub expense_maint: f64,

    /// Annual expense inflation rate
    pub inflation_rate: f64,

    /// Claim amount basis
    pub claim_basis: ClaimBasis,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            expense_acq: 300.0,
            expense_maint: 60.0,
            inflation_rate: 0.01,
            claim_basis: ClaimBasis::FullSumAssured,
        }
    }
}

/// One memo cell per recurrence quantity
struct CellBank {
    duration_mth: MemoCell<u32, i32>,
    mort_rate: MemoCell<u32, f64>,
    mort_rate_mth: MemoCell<u32, f64>,
    lapse_rate: MemoCell<u32, f64>,
    inflation_factor: MemoCell<u32, f64>,
    pols_if_at: MemoCell<(u32, Timing), f64>,
    pols_maturity: MemoCell<u32, f64>,
    pols_new_biz: MemoCell<u32, f64>,
    pols_death: MemoCell<u32, f64>,
    pols_lapse: MemoCell<u32, f64>,
    premiums: MemoCell<u32, f64>,
    claims: MemoCell<u32, f64>,
    commissions: MemoCell<u32, f64>,
    expenses: MemoCell<u32, f64>,
    net_cf: MemoCell<u32, f64>,
    disc_rate_mth: MemoCell<u32, f64>,
    disc_factor: MemoCell<u32, f64>,
    premium_pp: ScalarCell<f64>,
    pv_premiums: ScalarCell<f64>,
    pv_claims: ScalarCell<f64>,
    pv_expenses: ScalarCell<f64>,
    pv_commissions: ScalarCell<f64>,
    pv_net_cf: ScalarCell<f64>,
    pv_pols_if: ScalarCell<f64>,
    net_premium_pp: ScalarCell<f64>,
}

impl CellBank {
    fn new() -> Self {
        Self {
            duration_mth: MemoCell::new(),
            mort_rate: MemoCell::new(),
            mort_rate_mth: MemoCell::new(),
            lapse_rate: MemoCell::new(),
            inflation_factor: MemoCell::new(),
            pols_if_at: MemoCell::new(),
            pols_maturity: MemoCell::new(),
            pols_new_biz: MemoCell::new(),
            pols_death: MemoCell::new(),
            pols_lapse: MemoCell::new(),
            premiums: MemoCell::new(),
            claims: MemoCell::new(),
            commissions: MemoCell::new(),
            expenses: MemoCell::new(),
            net_cf: MemoCell::new(),
            disc_rate_mth: MemoCell::new(),
            disc_factor: MemoCell::new(),
            premium_pp: ScalarCell::new(),
            pv_premiums: ScalarCell::new(),
            pv_claims: ScalarCell::new(),
            pv_expenses: ScalarCell::new(),
            pv_commissions: ScalarCell::new(),
            pv_net_cf: ScalarCell::new(),
            pv_pols_if: ScalarCell::new(),
            net_premium_pp: ScalarCell::new(),
        }
    }
}

/// Projection engine instance for one model point.
///
/// Owns the model point, a clone of the assumptions and its own memo
/// cells; instances for different model points share nothing mutable, so
/// a portfolio can be projected with one instance per point in parallel.
pub struct Projection {
    point: ModelPoint,
    assumptions: Assumptions,
    config: ProjectionConfig,
    cells: CellBank,
}

impl Projection {
    pub fn new(point: ModelPoint, assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self {
            point,
            assumptions,
            config,
            cells: CellBank::new(),
        }
    }

    /// The model point this instance projects
    pub fn point(&self) -> &ModelPoint {
        &self.point
    }

    /// Projection length in months; valid months are `0..horizon`
    pub fn horizon(&self) -> u32 {
        self.point.horizon()
    }

    pub fn age_at_entry(&self) -> u32 {
        self.point.age_at_entry
    }

    pub fn sex(&self) -> Sex {
        self.point.sex
    }

    pub fn policy_term(&self) -> u32 {
        self.point.policy_term
    }

    pub fn sum_assured(&self) -> f64 {
        self.point.sum_assured
    }

    // ---- Duration and age ----------------------------------------------

    /// Duration of the cohort at `t` in months.
    ///
    /// Base case `duration_mth(0)` from the model point; increments by one
    /// as `t` increments. Negative values mean the cohort has not been
    /// issued yet.
    pub fn duration_mth(&self, t: u32) -> i32 {
        self.cells.duration_mth.get_or_compute(t, || {
            if t == 0 {
                self.point.duration_mth
            } else {
                self.duration_mth(t - 1) + 1
            }
        })
    }

    /// Duration at `t` in whole years, rounded toward minus infinity
    pub fn duration(&self, t: u32) -> i32 {
        self.duration_mth(t).div_euclid(12)
    }

    /// Attained age at `t`
    pub fn age(&self, t: u32) -> i64 {
        self.point.age_at_entry as i64 + self.duration(t) as i64
    }

    // ---- Decrement rates -----------------------------------------------

    /// Annual mortality rate applied at `t`, looked up by attained age
    /// and duration band (duration clamped to bands 0..=5)
    pub fn mort_rate(&self, t: u32) -> Result<f64> {
        self.cells.mort_rate.get_or_try_compute(t, || {
            let band = self.duration(t).clamp(0, 5) as usize;
            self.assumptions.mortality.annual_rate(self.age(t), band)
        })
    }

    /// Monthly mortality rate: `1 - (1 - mort_rate(t))^(1/12)`
    pub fn mort_rate_mth(&self, t: u32) -> Result<f64> {
        self.cells
            .mort_rate_mth
            .get_or_try_compute(t, || Ok(1.0 - (1.0 - self.mort_rate(t)?).powf(1.0 / 12.0)))
    }

    /// Annual lapse rate applied at `t`
    pub fn lapse_rate(&self, t: u32) -> Result<f64> {
        self.cells
            .lapse_rate
            .get_or_try_compute(t, || self.assumptions.lapse.annual_rate(self.duration(t) as i64))
    }

    // ---- In-force roll-forward -----------------------------------------

    /// Number of policies in force at time 0, before maturity.
    ///
    /// Zero for cohorts not yet issued at time 0.
    pub fn pols_if_init(&self) -> f64 {
        if self.duration_mth(0) > 0 {
            self.point.policy_count
        } else {
            0.0
        }
    }

    /// Number of policies in force at `t` at the given timing stage.
    ///
    /// `BEF_MAT` at `t=0` is [`pols_if_init`](Self::pols_if_init); for
    /// `t>0` it is the prior month's `BEF_DECR` count less that month's
    /// lapses and deaths. `BEF_NB` removes the maturities occurring at
    /// `t`; `BEF_DECR` adds the new business entering at `t`.
    pub fn pols_if_at(&self, t: u32, timing: Timing) -> Result<f64> {
        self.cells
            .pols_if_at
            .get_or_try_compute((t, timing), || match timing {
                Timing::BefMat => {
                    if t == 0 {
                        Ok(self.pols_if_init())
                    } else {
                        Ok(self.pols_if_at(t - 1, Timing::BefDecr)?
                            - self.pols_lapse(t - 1)?
                            - self.pols_death(t - 1)?)
                    }
                }
                Timing::BefNb => Ok(self.pols_if_at(t, Timing::BefMat)? - self.pols_maturity(t)?),
                Timing::BefDecr => {
                    Ok(self.pols_if_at(t, Timing::BefNb)? + self.pols_new_biz(t))
                }
            })
    }

    /// Alias for `pols_if_at(t, BEF_MAT)`
    pub fn pols_if(&self, t: u32) -> Result<f64> {
        self.pols_if_at(t, Timing::BefMat)
    }

    /// Number of policies maturing at `t`.
    ///
    /// Maturity is all-or-nothing: when the duration in months reaches
    /// exactly `12 * policy_term`, the full remaining in-force count
    /// matures.
    pub fn pols_maturity(&self, t: u32) -> Result<f64> {
        self.cells.pols_maturity.get_or_try_compute(t, || {
            if self.duration_mth(t) == 12 * self.point.policy_term as i32 {
                self.pols_if_at(t, Timing::BefMat)
            } else {
                Ok(0.0)
            }
        })
    }

    /// Number of new business policies entering at `t`.
    ///
    /// The full cohort count enters in the single month where the duration
    /// crosses zero.
    pub fn pols_new_biz(&self, t: u32) -> f64 {
        self.cells.pols_new_biz.get_or_compute(t, || {
            if self.duration_mth(t) == 0 {
                self.point.policy_count
            } else {
                0.0
            }
        })
    }

    /// Number of deaths occurring at `t`
    pub fn pols_death(&self, t: u32) -> Result<f64> {
        self.cells.pols_death.get_or_try_compute(t, || {
            Ok(self.pols_if_at(t, Timing::BefDecr)? * self.mort_rate_mth(t)?)
        })
    }

    /// Number of lapses occurring at `t`
    pub fn pols_lapse(&self, t: u32) -> Result<f64> {
        self.cells.pols_lapse.get_or_try_compute(t, || {
            let monthly = 1.0 - (1.0 - self.lapse_rate(t)?).powf(1.0 / 12.0);
            Ok(self.pols_if_at(t, Timing::BefDecr)? * monthly)
        })
    }

    // ---- Cashflows -----------------------------------------------------

    /// Monthly premium per policy, rounded to cents once and reused every
    /// month: `round(sum_assured * premium_rate(entry age, term), 2)`
    pub fn premium_pp(&self) -> Result<f64> {
        self.cells.premium_pp.get_or_try_compute(|| {
            let rate = self
                .assumptions
                .premium
                .monthly_rate(self.point.age_at_entry, self.point.policy_term)?;
            Ok(round_cents(self.point.sum_assured * rate))
        })
    }

    /// Premium income for the month from `t` to `t+1`
    pub fn premiums(&self, t: u32) -> Result<f64> {
        self.cells.premiums.get_or_try_compute(t, || {
            Ok(self.premium_pp()? * self.pols_if_at(t, Timing::BefDecr)?)
        })
    }

    /// Claim amount per policy
    pub fn claim_pp(&self, _t: u32) -> f64 {
        match self.config.claim_basis {
            ClaimBasis::FullSumAssured => self.point.sum_assured,
            ClaimBasis::PerPolicy(amount) => amount,
        }
    }

    /// Death claims for the month from `t` to `t+1`
    pub fn claims(&self, t: u32) -> Result<f64> {
        self.cells
            .claims
            .get_or_try_compute(t, || Ok(self.claim_pp(t) * self.pols_death(t)?))
    }

    /// Commissions: 100% of premium during the first policy year, zero
    /// afterwards
    pub fn commissions(&self, t: u32) -> Result<f64> {
        self.cells.commissions.get_or_try_compute(t, || {
            if self.duration(t) == 0 {
                self.premiums(t)
            } else {
                Ok(0.0)
            }
        })
    }

    /// Expense inflation factor at `t`: `(1 + inflation_rate)^(t / 12)`
    pub fn inflation_factor(&self, t: u32) -> f64 {
        self.cells.inflation_factor.get_or_compute(t, || {
            (1.0 + self.config.inflation_rate).powi((t / 12) as i32)
        })
    }

    /// Expenses for the month: acquisition per new business policy plus
    /// inflated monthly maintenance per in-force policy
    pub fn expenses(&self, t: u32) -> Result<f64> {
        self.cells.expenses.get_or_try_compute(t, || {
            Ok(self.config.expense_acq * self.pols_new_biz(t)
                + self.pols_if_at(t, Timing::BefDecr)? * self.config.expense_maint / 12.0
                    * self.inflation_factor(t))
        })
    }

    /// Net cashflow: `premiums - claims - expenses - commissions`
    pub fn net_cf(&self, t: u32) -> Result<f64> {
        self.cells.net_cf.get_or_try_compute(t, || {
            Ok(self.premiums(t)? - self.claims(t)? - self.expenses(t)? - self.commissions(t)?)
        })
    }

    // ---- Discounting and present values --------------------------------

    /// Monthly discount rate: `(1 + annual_rate(t / 12))^(1/12) - 1`
    pub fn disc_rate_mth(&self, t: u32) -> Result<f64> {
        self.cells.disc_rate_mth.get_or_try_compute(t, || {
            let annual = self.assumptions.discount.annual_rate(t / 12)?;
            Ok((1.0 + annual).powf(1.0 / 12.0) - 1.0)
        })
    }

    /// Discount factor from month `t` back to time 0
    pub fn disc_factor(&self, t: u32) -> Result<f64> {
        self.cells.disc_factor.get_or_try_compute(t, || {
            Ok((1.0 + self.disc_rate_mth(t)?).powi(-(t as i32)))
        })
    }

    fn pv_of(&self, series: impl Fn(u32) -> Result<f64>) -> Result<f64> {
        let mut total = 0.0;
        for t in 0..self.horizon() {
            total += series(t)? * self.disc_factor(t)?;
        }
        Ok(total)
    }

    pub fn pv_premiums(&self) -> Result<f64> {
        self.cells
            .pv_premiums
            .get_or_try_compute(|| self.pv_of(|t| self.premiums(t)))
    }

    pub fn pv_claims(&self) -> Result<f64> {
        self.cells
            .pv_claims
            .get_or_try_compute(|| self.pv_of(|t| self.claims(t)))
    }

    pub fn pv_expenses(&self) -> Result<f64> {
        self.cells
            .pv_expenses
            .get_or_try_compute(|| self.pv_of(|t| self.expenses(t)))
    }

    pub fn pv_commissions(&self) -> Result<f64> {
        self.cells
            .pv_commissions
            .get_or_try_compute(|| self.pv_of(|t| self.commissions(t)))
    }

    /// Present value of net cashflows, defined as the difference of the
    /// per-series present values
    pub fn pv_net_cf(&self) -> Result<f64> {
        self.cells.pv_net_cf.get_or_try_compute(|| {
            Ok(self.pv_premiums()? - self.pv_claims()? - self.pv_expenses()?
                - self.pv_commissions()?)
        })
    }

    /// Discounted sum of the in-force count, the annuity factor used for
    /// the net premium
    pub fn pv_pols_if(&self) -> Result<f64> {
        self.cells
            .pv_pols_if
            .get_or_try_compute(|| self.pv_of(|t| self.pols_if(t)))
    }

    /// Net premium per policy: `pv_claims / pv_pols_if`.
    ///
    /// Only meaningful while some business is in force; with an empty
    /// projection the quotient is not finite.
    pub fn net_premium_pp(&self) -> Result<f64> {
        self.cells
            .net_premium_pp
            .get_or_try_compute(|| Ok(self.pv_claims()? / self.pv_pols_if()?))
    }

    /// Check that discounting the net cashflow series directly agrees
    /// with [`pv_net_cf`](Self::pv_net_cf) within tolerance
    pub fn check_pv_net_cf(&self) -> Result<bool> {
        let direct = self.pv_of(|t| self.net_cf(t))?;
        Ok(is_close(direct, self.pv_net_cf()?, PV_CHECK_REL_TOL))
    }

    // ---- Reporting -----------------------------------------------------

    /// Run the full projection and assemble the result tables
    pub fn project(&self) -> Result<ProjectionResult> {
        let horizon = self.horizon();
        let mut cashflow = Vec::with_capacity(horizon as usize);
        let mut decrements = Vec::with_capacity(horizon as usize);

        for t in 0..horizon {
            cashflow.push(CashflowRow {
                month: t,
                premiums: self.premiums(t)?,
                claims: self.claims(t)?,
                expenses: self.expenses(t)?,
                commissions: self.commissions(t)?,
                net_cf: self.net_cf(t)?,
            });
            decrements.push(DecrementRow {
                month: t,
                pols_if: self.pols_if(t)?,
                pols_maturity: self.pols_maturity(t)?,
                pols_new_biz: self.pols_new_biz(t),
                pols_death: self.pols_death(t)?,
                pols_lapse: self.pols_lapse(t)?,
            });
        }

        Ok(ProjectionResult {
            point_id: self.point.point_id,
            cashflow,
            decrements,
            present_value: PvSummary {
                premiums: self.pv_premiums()?,
                claims: self.pv_claims()?,
                expenses: self.pv_expenses()?,
                commissions: self.pv_commissions()?,
                net_cf: self.pv_net_cf()?,
            },
            pv_consistent: self.check_pv_net_cf()?,
        })
    }

    // ---- Generic accessor ----------------------------------------------

    /// Look up any recurrence quantity by name with string arguments.
    ///
    /// Month arguments must parse as non-negative integers inside
    /// `[0, horizon)`; `pols_if_at` additionally takes a timing token
    /// (`BEF_MAT`, `BEF_NB` or `BEF_DECR`).
    pub fn get(&self, name: &str, args: &[&str]) -> Result<f64> {
        match name {
            "proj_len" => {
                self.expect_arity(name, args, 0)?;
                Ok(self.horizon() as f64)
            }
            "premium_pp" => {
                self.expect_arity(name, args, 0)?;
                self.premium_pp()
            }
            "net_premium_pp" => {
                self.expect_arity(name, args, 0)?;
                self.net_premium_pp()
            }
            "pv_premiums" => {
                self.expect_arity(name, args, 0)?;
                self.pv_premiums()
            }
            "pv_claims" => {
                self.expect_arity(name, args, 0)?;
                self.pv_claims()
            }
            "pv_expenses" => {
                self.expect_arity(name, args, 0)?;
                self.pv_expenses()
            }
            "pv_commissions" => {
                self.expect_arity(name, args, 0)?;
                self.pv_commissions()
            }
            "pv_net_cf" => {
                self.expect_arity(name, args, 0)?;
                self.pv_net_cf()
            }
            "pv_pols_if" => {
                self.expect_arity(name, args, 0)?;
                self.pv_pols_if()
            }
            "duration_mth" => Ok(self.duration_mth(self.month_arg(name, args)?) as f64),
            "duration" => Ok(self.duration(self.month_arg(name, args)?) as f64),
            "age" => Ok(self.age(self.month_arg(name, args)?) as f64),
            "mort_rate" => self.mort_rate(self.month_arg(name, args)?),
            "mort_rate_mth" => self.mort_rate_mth(self.month_arg(name, args)?),
            "lapse_rate" => self.lapse_rate(self.month_arg(name, args)?),
            "inflation_factor" => Ok(self.inflation_factor(self.month_arg(name, args)?)),
            "pols_if" => self.pols_if(self.month_arg(name, args)?),
            "pols_if_at" => {
                self.expect_arity(name, args, 2)?;
                let t = self.parse_month(name, args[0])?;
                let timing = args[1].parse::<Timing>()?;
                self.pols_if_at(t, timing)
            }
            "pols_maturity" => self.pols_maturity(self.month_arg(name, args)?),
            "pols_new_biz" => Ok(self.pols_new_biz(self.month_arg(name, args)?)),
            "pols_death" => self.pols_death(self.month_arg(name, args)?),
            "pols_lapse" => self.pols_lapse(self.month_arg(name, args)?),
            "premiums" => self.premiums(self.month_arg(name, args)?),
            "claim_pp" => Ok(self.claim_pp(self.month_arg(name, args)?)),
            "claims" => self.claims(self.month_arg(name, args)?),
            "commissions" => self.commissions(self.month_arg(name, args)?),
            "expenses" => self.expenses(self.month_arg(name, args)?),
            "net_cf" => self.net_cf(self.month_arg(name, args)?),
            "disc_rate_mth" => self.disc_rate_mth(self.month_arg(name, args)?),
            "disc_factor" => self.disc_factor(self.month_arg(name, args)?),
            other => Err(ProjectionError::UnknownQuantity {
                name: other.to_string(),
            }),
        }
    }

    fn expect_arity(&self, name: &str, args: &[&str], expected: usize) -> Result<()> {
        if args.len() != expected {
            return Err(ProjectionError::BadArity {
                name: name.to_string(),
                expected,
                got: args.len(),
            });
        }
        Ok(())
    }

    fn month_arg(&self, name: &str, args: &[&str]) -> Result<u32> {
        self.expect_arity(name, args, 1)?;
        self.parse_month(name, args[0])
    }

    fn parse_month(&self, name: &str, raw: &str) -> Result<u32> {
        let t: u32 = raw
            .trim()
            .parse()
            .map_err(|_| ProjectionError::BadArgument {
                name: name.to_string(),
                value: raw.to_string(),
                reason: "expected a non-negative month index".to_string(),
            })?;
        if t >= self.horizon() {
            return Err(ProjectionError::MonthOutOfRange {
                t,
                horizon: self.horizon(),
            });
        }
        Ok(t)
    }

    /// Cache statistics per quantity, for diagnostics and tests
    pub fn cell_stats(&self) -> Vec<CellStats> {
        vec![
            self.cells.duration_mth.stats("duration_mth"),
            self.cells.mort_rate.stats("mort_rate"),
            self.cells.mort_rate_mth.stats("mort_rate_mth"),
            self.cells.lapse_rate.stats("lapse_rate"),
            self.cells.inflation_factor.stats("inflation_factor"),
            self.cells.pols_if_at.stats("pols_if_at"),
            self.cells.pols_maturity.stats("pols_maturity"),
            self.cells.pols_new_biz.stats("pols_new_biz"),
            self.cells.pols_death.stats("pols_death"),
            self.cells.pols_lapse.stats("pols_lapse"),
            self.cells.premiums.stats("premiums"),
            self.cells.claims.stats("claims"),
            self.cells.commissions.stats("commissions"),
            self.cells.expenses.stats("expenses"),
            self.cells.net_cf.stats("net_cf"),
            self.cells.disc_rate_mth.stats("disc_rate_mth"),
            self.cells.disc_factor.stats("disc_factor"),
            self.cells.premium_pp.stats("premium_pp"),
            self.cells.pv_premiums.stats("pv_premiums"),
            self.cells.pv_claims.stats("pv_claims"),
            self.cells.pv_expenses.stats("pv_expenses"),
            self.cells.pv_commissions.stats("pv_commissions"),
            self.cells.pv_net_cf.stats("pv_net_cf"),
            self.cells.pv_pols_if.stats("pv_pols_if"),
            self.cells.net_premium_pp.stats("net_premium_pp"),
        ]
    }

    /// Cache statistics for a single quantity
    pub fn stats_for(&self, quantity: &str) -> Option<CellStats> {
        self.cell_stats().into_iter().find(|s| s.quantity == quantity)
    }
}

/// Round to cents, half away from zero
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}
