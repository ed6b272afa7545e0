//! Builds the ordered list of change-statistics a run estimates or
//! simulates, from the declarative `structParams`/`attrParams` vocabulary
//! described in §6. Order here is authoritative: the θ vector the
//! estimation crate carries is indexed positionally against this registry.

use indexmap::IndexMap;

use super::{
    AltKStarsEffect, AltKTrianglesEffect, AltKTrianglesUndirectedEffect, AltKTwoPathsEffect, ArcEffect,
    BipartiteAltK4CyclesAEffect, BipartiteAltKCyclesEffect, BipartiteCycleMode, DiffEffect,
    DiffReciprocityEffect, Effect, EffectContext, FourCyclesEffect, InteractionEffect,
    JaccardSimilarityEffect, MatchingEffect, MatchingReciprocityEffect, MismatchingEffect,
    PowerFourCyclesEffect, ReceiverEffect, ReciprocityEffect, SenderEffect, StarKind, TriangleVariant,
    TwoPathKind,
};
use crate::attributes::AttributeStore;
use crate::decay::DecayTable;
use crate::error::{EeError, Result};
use crate::types::{NodeId, Weight};

/// A single requested effect, as read off a config file: a `kind` naming
/// the statistic (e.g. `"AltInStars"`, `"Sender"`), an optional attribute
/// name for the attribute-effect family, and an optional decay parameter
/// for the alternating family. `None` lambda falls back to `default_lambda`.
#[derive(Debug, Clone)]
pub struct EffectSpec {
    pub kind: String,
    pub attribute: Option<String>,
    pub lambda: Option<f64>,
}

impl EffectSpec {
    pub fn structural(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attribute: None,
            lambda: None,
        }
    }

    pub fn structural_with_lambda(kind: impl Into<String>, lambda: f64) -> Self {
        Self {
            kind: kind.into(),
            attribute: None,
            lambda: Some(lambda),
        }
    }

    pub fn attribute(kind: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attribute: Some(attribute.into()),
            lambda: None,
        }
    }
}

/// The alternating-statistic lookup-table bound shared across every
/// `DecayTable` built by the registry (matches the `DecayTable::new` bound
/// used by `decay::tests` and by the estimation crate's default config).
const DEFAULT_DECAY_BOUND: usize = 64;

pub struct EffectRegistry {
    effects: Vec<Box<dyn Effect>>,
    names: IndexMap<String, usize>,
}

impl EffectRegistry {
    /// Builds a registry from config-style specs, in the order given.
    /// `default_lambda` fills in any spec that doesn't carry its own decay
    /// parameter. `experimental` gates `BipartiteAltK4CyclesA`: requesting
    /// it without the flag is a config error, per §9's Open Question about
    /// the statistic's unverified correctness. `attributes` is the already
    /// loaded attribute store; every `attrParams` entry is checked against
    /// it so a misspelled or un-loaded attribute name is a config error at
    /// build time instead of a silently-zero effect at sampling time.
    pub fn build(specs: &[EffectSpec], default_lambda: f64, experimental: bool, attributes: &AttributeStore) -> Result<Self> {
        let mut effects: Vec<Box<dyn Effect>> = Vec::with_capacity(specs.len());
        let mut names = IndexMap::with_capacity(specs.len());

        for spec in specs {
            let lambda = spec.lambda.unwrap_or(default_lambda);
            let decay = || DecayTable::new(lambda, DEFAULT_DECAY_BOUND);
            let effect: Box<dyn Effect> = match spec.kind.as_str() {
                "Arc" => Box::new(ArcEffect),
                "Reciprocity" => Box::new(ReciprocityEffect),
                "AltInStars" => Box::new(AltKStarsEffect::new("AltInStars", StarKind::In, decay())),
                "AltOutStars" => Box::new(AltKStarsEffect::new("AltOutStars", StarKind::Out, decay())),
                "AltStars" => Box::new(AltKStarsEffect::new("AltStars", StarKind::Undirected, decay())),
                "AltKTrianglesT" => Box::new(AltKTrianglesEffect::new("AltKTrianglesT", TriangleVariant::T, decay())),
                "AltKTrianglesC" => Box::new(AltKTrianglesEffect::new("AltKTrianglesC", TriangleVariant::C, decay())),
                "AltKTrianglesD" => Box::new(AltKTrianglesEffect::new("AltKTrianglesD", TriangleVariant::D, decay())),
                "AltKTrianglesU" => Box::new(AltKTrianglesEffect::new("AltKTrianglesU", TriangleVariant::U, decay())),
                "AltKTriangles" => Box::new(AltKTrianglesUndirectedEffect::new(decay())),
                "AltTwoPathsMix" => Box::new(AltKTwoPathsEffect::new("AltTwoPathsMix", TwoPathKind::Mix, decay())),
                "AltTwoPathsIn" => Box::new(AltKTwoPathsEffect::new("AltTwoPathsIn", TwoPathKind::In, decay())),
                "AltTwoPathsOut" => Box::new(AltKTwoPathsEffect::new("AltTwoPathsOut", TwoPathKind::Out, decay())),
                "AltTwoPaths" => Box::new(AltKTwoPathsEffect::new("AltTwoPaths", TwoPathKind::Undirected, decay())),
                "FourCycles" => Box::new(FourCyclesEffect),
                "BipartiteAltKCyclesA" => Box::new(BipartiteAltKCyclesEffect::new(
                    "BipartiteAltKCyclesA",
                    BipartiteCycleMode::A,
                    decay(),
                )),
                "BipartiteAltKCyclesB" => Box::new(BipartiteAltKCyclesEffect::new(
                    "BipartiteAltKCyclesB",
                    BipartiteCycleMode::B,
                    decay(),
                )),
                "PowerFourCycles" => Box::new(PowerFourCyclesEffect::new(lambda)),
                "BipartiteAltK4CyclesA" => {
                    if !experimental {
                        return Err(EeError::Config(
                            "BipartiteAltK4CyclesA requires the experimental flag (§9: correctness unverified)"
                                .to_string(),
                        ));
                    }
                    Box::new(BipartiteAltK4CyclesAEffect::new(decay()))
                }
                "Sender" => Box::new(SenderEffect::new(require_binary_attribute(spec, attributes)?)),
                "Receiver" => Box::new(ReceiverEffect::new(require_binary_attribute(spec, attributes)?)),
                "Interaction" => Box::new(InteractionEffect::new(require_binary_attribute(spec, attributes)?)),
                "Matching" => Box::new(MatchingEffect::new(require_categorical_attribute(spec, attributes)?)),
                "MatchingReciprocity" => {
                    Box::new(MatchingReciprocityEffect::new(require_categorical_attribute(spec, attributes)?))
                }
                "Mismatching" => Box::new(MismatchingEffect::new(require_categorical_attribute(spec, attributes)?)),
                "Diff" => Box::new(DiffEffect::new(require_continuous_attribute(spec, attributes)?)),
                "DiffReciprocity" => {
                    Box::new(DiffReciprocityEffect::new(require_continuous_attribute(spec, attributes)?))
                }
                "JaccardSimilarity" => {
                    Box::new(JaccardSimilarityEffect::new(require_set_valued_attribute(spec, attributes)?))
                }
                other => {
                    return Err(EeError::Config(format!("unrecognised effect kind '{other}'")));
                }
            };

            let name = effect.name().to_string();
            if names.contains_key(&name) {
                return Err(EeError::Config(format!("effect '{name}' declared more than once")));
            }
            names.insert(name, effects.len());
            effects.push(effect);
        }

        Ok(Self { effects, names })
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Δz for every effect, in registry order, for the candidate toggle
    /// `(i, j)`. This is the hot-path call every sampler proposal makes.
    pub fn delta_vector(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Vec<Weight> {
        self.effects.iter().map(|e| e.delta(ctx, i, j)).collect()
    }

    /// zₖ(G) for every effect, in registry order, recomputed from scratch.
    /// Used for initial-state seeding and the correctness-identity tests,
    /// never on the sampler hot path.
    pub fn direct_vector(&self, ctx: &EffectContext) -> Vec<Weight> {
        self.effects.iter().map(|e| e.direct(ctx)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Effect> {
        self.effects.iter().map(|e| e.as_ref())
    }
}

fn require_attribute(spec: &EffectSpec) -> Result<String> {
    spec.attribute
        .clone()
        .ok_or_else(|| EeError::Config(format!("effect '{}' requires an attribute name", spec.kind)))
}

fn require_binary_attribute(spec: &EffectSpec, attributes: &AttributeStore) -> Result<String> {
    let name = require_attribute(spec)?;
    if !attributes.has_binary(&name) {
        return Err(EeError::Config(format!(
            "effect '{}' references binary attribute '{name}', which was not loaded",
            spec.kind
        )));
    }
    Ok(name)
}

fn require_categorical_attribute(spec: &EffectSpec, attributes: &AttributeStore) -> Result<String> {
    let name = require_attribute(spec)?;
    if !attributes.has_categorical(&name) {
        return Err(EeError::Config(format!(
            "effect '{}' references categorical attribute '{name}', which was not loaded",
            spec.kind
        )));
    }
    Ok(name)
}

fn require_continuous_attribute(spec: &EffectSpec, attributes: &AttributeStore) -> Result<String> {
    let name = require_attribute(spec)?;
    if !attributes.has_continuous(&name) {
        return Err(EeError::Config(format!(
            "effect '{}' references continuous attribute '{name}', which was not loaded",
            spec.kind
        )));
    }
    Ok(name)
}

fn require_set_valued_attribute(spec: &EffectSpec, attributes: &AttributeStore) -> Result<String> {
    let name = require_attribute(spec)?;
    if !attributes.has_set_valued(&name) {
        return Err(EeError::Config(format!(
            "effect '{}' references set-valued attribute '{name}', which was not loaded",
            spec.kind
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_attribute_effect_on_a_misspelled_attribute_name() {
        let mut attributes = AttributeStore::new();
        attributes.add_binary("sex", vec![Some(true), Some(false)], 2).unwrap();

        let specs = vec![EffectSpec::attribute("Sender", "sx")];
        let result = EffectRegistry::build(&specs, 2.0, false, &attributes);
        assert!(result.is_err());
    }

    #[test]
    fn accepts_attribute_effect_on_a_loaded_attribute_of_the_right_kind() {
        let mut attributes = AttributeStore::new();
        attributes.add_binary("sex", vec![Some(true), Some(false)], 2).unwrap();

        let specs = vec![EffectSpec::attribute("Sender", "sex")];
        let registry = EffectRegistry::build(&specs, 2.0, false, &attributes).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_attribute_effect_bound_to_the_wrong_attribute_kind() {
        let mut attributes = AttributeStore::new();
        attributes.add_continuous("age", vec![Some(30.0), Some(40.0)], 2).unwrap();

        // "age" exists as a continuous attribute but Matching requires a
        // categorical one.
        let specs = vec![EffectSpec::attribute("Matching", "age")];
        let result = EffectRegistry::build(&specs, 2.0, false, &attributes);
        assert!(result.is_err());
    }
}
