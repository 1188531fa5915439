//! Stat weights: the DPS change from nudging one attribute up and down, measured by paired
//! re-simulation against a shared baseline.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::character::{Character, Perturbation};
use crate::combat::samples::Z_95;
use crate::combat::{add_standard_deviations, simulate_parallel, DamageSamples, SimulationConfig};
use crate::error::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Agility,
    Strength,
    CriticalStrike,
    Hit,
    AttackPower,
    Haste,
    WeaponSkill,
}

impl Stat {
    /// Stats reported when none are requested explicitly.
    pub const DEFAULT_SET: [Stat; 4] = [
        Stat::Agility,
        Stat::Strength,
        Stat::CriticalStrike,
        Stat::Hit,
    ];

    pub const ALL: [Stat; 7] = [
        Stat::Agility,
        Stat::Strength,
        Stat::CriticalStrike,
        Stat::Hit,
        Stat::AttackPower,
        Stat::Haste,
        Stat::WeaponSkill,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Agility => "agility",
            Self::Strength => "strength",
            Self::CriticalStrike => "critical_strike",
            Self::Hit => "hit",
            Self::AttackPower => "attack_power",
            Self::Haste => "haste",
            Self::WeaponSkill => "weapon_skill",
        }
    }

    /// Perturbation size: 10 points for primary stats and attack power, 1 for percentages and skill.
    /// Weapon skill is an integer rating, so its amounts must be whole numbers.
    pub const fn default_amount(self) -> f64 {
        match self {
            Self::Agility | Self::Strength | Self::AttackPower => 10.0,
            Self::CriticalStrike | Self::Hit | Self::Haste | Self::WeaponSkill => 1.0,
        }
    }

    /// The perturbation field this stat writes to.
    pub fn field_mut(self, perturbation: &mut Perturbation) -> &mut f64 {
        match self {
            Self::Agility => &mut perturbation.stats.agility,
            Self::Strength => &mut perturbation.stats.strength,
            Self::CriticalStrike => &mut perturbation.special_stats.critical_strike,
            Self::Hit => &mut perturbation.special_stats.hit,
            Self::AttackPower => &mut perturbation.special_stats.attack_power,
            Self::Haste => &mut perturbation.haste_percent,
            Self::WeaponSkill => &mut perturbation.weapon_skill,
        }
    }

    fn apply(self, character: &mut Character, delta: f64) {
        *self.field_mut(character.perturbation_mut()) += delta;
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "agility" | "agi" => Ok(Self::Agility),
            "strength" | "str" => Ok(Self::Strength),
            "critical_strike" | "crit" => Ok(Self::CriticalStrike),
            "hit" => Ok(Self::Hit),
            "attack_power" | "ap" => Ok(Self::AttackPower),
            "haste" => Ok(Self::Haste),
            "weapon_skill" | "skill" => Ok(Self::WeaponSkill),
            _ => Err(format!("unknown stat '{s}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatWeight {
    pub stat: String,
    pub amount: f64,
    pub baseline_dps: f64,
    /// Mean DPS change with the stat raised by `amount`.
    pub dps_plus: f64,
    /// Mean DPS change with the stat lowered by `amount`. Usually negative.
    pub dps_minus: f64,
    pub std_dps_plus: f64,
    pub std_dps_minus: f64,
}

impl StatWeight {
    /// Central-difference DPS per single point of the stat.
    pub fn per_unit(&self) -> f64 {
        if self.amount == 0.0 {
            return 0.0;
        }
        (self.dps_plus - self.dps_minus) / (2.0 * self.amount)
    }
}

impl fmt::Display for StatWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stat weights: (+{amount}: {:.3} +- {:.3}, -{amount}: {:.3} +- {:.3}), {:.4} dps per point",
            self.stat,
            self.dps_plus,
            Z_95 * self.std_dps_plus,
            self.dps_minus,
            Z_95 * self.std_dps_minus,
            self.per_unit(),
            amount = self.amount,
        )
    }
}

/// Weight of a single stat, running its own baseline.
pub fn compute_weight(
    character: &Character,
    stat: Stat,
    amount: f64,
    config: &SimulationConfig,
) -> Result<StatWeight, SimulationError> {
    if stat == Stat::WeaponSkill && amount.fract() != 0.0 {
        return Err(SimulationError::FractionalWeaponSkill(amount));
    }
    compute_weight_with(character, stat.name(), amount, config, |c, delta| {
        stat.apply(c, delta)
    })
}

/// Weight of an arbitrary perturbation: `apply(character, delta)` must shift one attribute by
/// `delta`. The baseline and both perturbed runs share the run seed.
pub fn compute_weight_with<F>(
    character: &Character,
    label: &str,
    amount: f64,
    config: &SimulationConfig,
    apply: F,
) -> Result<StatWeight, SimulationError>
where
    F: Fn(&mut Character, f64) + Sync,
{
    let baseline = simulate_parallel(&character.snapshot()?, config)?;
    weight_against_baseline(character, label, amount, config, &baseline, &apply)
}

/// Weights for several stats at their default amounts, sharing one baseline run.
pub fn compute_stat_weights(
    character: &Character,
    stats: &[Stat],
    config: &SimulationConfig,
) -> Result<Vec<StatWeight>, SimulationError> {
    let baseline = simulate_parallel(&character.snapshot()?, config)?;
    stats
        .par_iter()
        .map(|stat| {
            weight_against_baseline(
                character,
                stat.name(),
                stat.default_amount(),
                config,
                &baseline,
                &|c: &mut Character, delta: f64| stat.apply(c, delta),
            )
        })
        .collect()
}

fn weight_against_baseline<F>(
    character: &Character,
    label: &str,
    amount: f64,
    config: &SimulationConfig,
    baseline: &DamageSamples,
    apply: &F,
) -> Result<StatWeight, SimulationError>
where
    F: Fn(&mut Character, f64) + Sync,
{
    let (plus, minus) = rayon::join(
        || run_perturbed(character, amount, config, apply),
        || run_perturbed(character, -amount, config, apply),
    );
    let (plus, minus) = (plus?, minus?);

    let baseline_dps = baseline.mean();
    let baseline_error = baseline.standard_error();
    let weight = StatWeight {
        stat: label.to_string(),
        amount,
        baseline_dps,
        dps_plus: plus.mean() - baseline_dps,
        dps_minus: minus.mean() - baseline_dps,
        std_dps_plus: add_standard_deviations(plus.standard_error(), baseline_error),
        std_dps_minus: add_standard_deviations(minus.standard_error(), baseline_error),
    };
    tracing::info!(
        stat = label,
        amount,
        dps_plus = weight.dps_plus,
        dps_minus = weight.dps_minus,
        "stat weight computed"
    );
    Ok(weight)
}

fn run_perturbed<F>(
    character: &Character,
    delta: f64,
    config: &SimulationConfig,
    apply: &F,
) -> Result<DamageSamples, SimulationError>
where
    F: Fn(&mut Character, f64) + Sync,
{
    let mut perturbed = character.clone();
    apply(&mut perturbed, delta);
    simulate_parallel(&perturbed.snapshot()?, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_names_parse_back() {
        for stat in Stat::ALL {
            assert_eq!(stat.name().parse::<Stat>(), Ok(stat));
        }
        assert_eq!("Crit".parse::<Stat>(), Ok(Stat::CriticalStrike));
        assert_eq!("attack-power".parse::<Stat>(), Ok(Stat::AttackPower));
        assert!("stamina".parse::<Stat>().is_err());
    }

    #[test]
    fn each_stat_writes_its_own_field() {
        for stat in Stat::ALL {
            let mut perturbation = Perturbation::default();
            *stat.field_mut(&mut perturbation) += 3.0;
            let touched = [
                perturbation.stats.agility,
                perturbation.stats.strength,
                perturbation.special_stats.critical_strike,
                perturbation.special_stats.hit,
                perturbation.special_stats.attack_power,
                perturbation.haste_percent,
                perturbation.weapon_skill,
            ];
            assert_eq!(touched.iter().filter(|v| **v == 3.0).count(), 1, "{stat}");
        }
    }

    #[test]
    fn per_unit_is_central_difference() {
        let weight = StatWeight {
            stat: "strength".to_string(),
            amount: 10.0,
            baseline_dps: 800.0,
            dps_plus: 6.0,
            dps_minus: -4.0,
            std_dps_plus: 0.5,
            std_dps_minus: 0.5,
        };
        assert!((weight.per_unit() - 0.5).abs() < 1e-12);
        assert!(weight.to_string().starts_with("strength stat weights"));
    }
}
