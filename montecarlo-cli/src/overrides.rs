use anyhow::{Context, Result, bail};
use montecarlo::{DiceSpec, DieSpec, ExperimentConfig, WeightValue};

/// A `face=weight` token, optionally scoped to one die as `die:face=weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightFlag {
    pub die: Option<usize>,
    pub face: String,
    pub weight: WeightValue,
}

impl WeightFlag {
    /// Parse a shared `face=weight` token.
    pub fn parse_shared(token: &str) -> Result<Self> {
        let (face, weight) = split_assignment(token)?;
        Ok(Self {
            die: None,
            face,
            weight,
        })
    }

    /// Parse a per-die `die:face=weight` token.
    pub fn parse_scoped(token: &str) -> Result<Self> {
        let Some((die, rest)) = token.split_once(':') else {
            bail!("Expected DIE:FACE=WEIGHT, got {token}");
        };
        let die = die
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Die index must be a non-negative integer in {token}"))?;
        let (face, weight) = split_assignment(rest)?;
        Ok(Self {
            die: Some(die),
            face,
            weight,
        })
    }
}

fn split_assignment(token: &str) -> Result<(String, WeightValue)> {
    let Some((face, weight)) = token.split_once('=') else {
        bail!("Expected FACE=WEIGHT, got {token}");
    };
    let face = face.trim();
    if face.is_empty() {
        bail!("Missing face in weight override {token}");
    }
    // validated when the game is built
    Ok((face.to_string(), WeightValue::Text(weight.trim().to_string())))
}

/// Fold command-line weight overrides into the experiment configuration.
///
/// Scoped overrides expand a plain dice count into per-die entries.
pub fn apply_weight_flags(config: &mut ExperimentConfig, flags: &[WeightFlag]) -> Result<()> {
    for flag in flags {
        match flag.die {
            None => {
                config
                    .weights
                    .insert(flag.face.clone(), flag.weight.clone());
            }
            Some(die) => {
                let specs = per_die_specs(&mut config.dice);
                let available = specs.len();
                let Some(spec) = specs.get_mut(die) else {
                    bail!("Weight override targets die {die} but the game has {available} dice");
                };
                spec.weights.insert(flag.face.clone(), flag.weight.clone());
            }
        }
    }
    Ok(())
}

fn per_die_specs(dice: &mut DiceSpec) -> &mut Vec<DieSpec> {
    if let DiceSpec::Count(count) = *dice {
        *dice = DiceSpec::PerDie(vec![DieSpec::default(); count]);
    }
    match dice {
        DiceSpec::PerDie(specs) => specs,
        DiceSpec::Count(_) => unreachable!("dice spec expanded above"),
    }
}
