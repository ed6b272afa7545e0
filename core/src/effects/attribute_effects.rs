use super::{signed, Effect, EffectContext};
use crate::attributes::jaccard_similarity;
use crate::types::{NodeId, Weight};

fn toggle_sign(ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
    if ctx.graph.has_edge(i, j) {
        -1.0
    } else {
        1.0
    }
}

/// `z = Σ_{arcs i->j, attr(i) = true} 1`: a binary covariate on the sender.
#[derive(Debug, Clone)]
pub struct SenderEffect {
    name: String,
    attribute: String,
}

impl SenderEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("Sender_{attribute}"),
            attribute,
        }
    }
}

impl Effect for SenderEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        if ctx.attributes.binary(&self.attribute, i) == Some(true) {
            toggle_sign(ctx, i, j)
        } else {
            0.0
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(i, _)| ctx.attributes.binary(&self.attribute, i) == Some(true))
            .count() as Weight
    }
}

/// `z = Σ_{arcs i->j, attr(j) = true} 1`: a binary covariate on the receiver.
#[derive(Debug, Clone)]
pub struct ReceiverEffect {
    name: String,
    attribute: String,
}

impl ReceiverEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("Receiver_{attribute}"),
            attribute,
        }
    }
}

impl Effect for ReceiverEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        if ctx.attributes.binary(&self.attribute, j) == Some(true) {
            toggle_sign(ctx, i, j)
        } else {
            0.0
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(_, j)| ctx.attributes.binary(&self.attribute, j) == Some(true))
            .count() as Weight
    }
}

/// `z = Σ_{arcs i->j, attr(i) = attr(j) = true} 1`: both endpoints carry the
/// binary attribute.
#[derive(Debug, Clone)]
pub struct InteractionEffect {
    name: String,
    attribute: String,
}

impl InteractionEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("Interaction_{attribute}"),
            attribute,
        }
    }
}

impl Effect for InteractionEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        let both = ctx.attributes.binary(&self.attribute, i) == Some(true)
            && ctx.attributes.binary(&self.attribute, j) == Some(true);
        if both {
            toggle_sign(ctx, i, j)
        } else {
            0.0
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(i, j)| {
                ctx.attributes.binary(&self.attribute, i) == Some(true)
                    && ctx.attributes.binary(&self.attribute, j) == Some(true)
            })
            .count() as Weight
    }
}

fn categories_match(ctx: &EffectContext, attribute: &str, i: NodeId, j: NodeId) -> Option<bool> {
    let ci = ctx.attributes.categorical(attribute, i)?;
    let cj = ctx.attributes.categorical(attribute, j)?;
    Some(ci == cj)
}

/// `z = Σ_{edges i-j, cat(i) = cat(j)} 1`: same categorical value on both
/// endpoints (undirected homophily).
#[derive(Debug, Clone)]
pub struct MatchingEffect {
    name: String,
    attribute: String,
}

impl MatchingEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("Matching_{attribute}"),
            attribute,
        }
    }
}

impl Effect for MatchingEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        match categories_match(ctx, &self.attribute, i, j) {
            Some(true) => toggle_sign(ctx, i, j),
            _ => 0.0,
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(i, j)| categories_match(ctx, &self.attribute, i, j) == Some(true))
            .count() as Weight
    }
}

/// `z = Σ_{arcs i->j, cat(i) = cat(j), j->i exists} 1`: matching restricted
/// to reciprocated dyads, following the same gating shape as `Reciprocity`.
#[derive(Debug, Clone)]
pub struct MatchingReciprocityEffect {
    name: String,
    attribute: String,
}

impl MatchingReciprocityEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("MatchingReciprocity_{attribute}"),
            attribute,
        }
    }
}

impl Effect for MatchingReciprocityEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        if categories_match(ctx, &self.attribute, i, j) != Some(true) {
            return 0.0;
        }
        if !ctx.graph.has_edge(j, i) {
            return 0.0;
        }
        toggle_sign(ctx, i, j)
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(i, j)| {
                i < j && ctx.graph.has_edge(j, i) && categories_match(ctx, &self.attribute, i, j) == Some(true)
            })
            .count() as Weight
    }
}

/// `z = Σ_{edges i-j, cat(i) != cat(j)} 1`: heterophily on a categorical
/// attribute.
#[derive(Debug, Clone)]
pub struct MismatchingEffect {
    name: String,
    attribute: String,
}

impl MismatchingEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("Mismatching_{attribute}"),
            attribute,
        }
    }
}

impl Effect for MismatchingEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        match categories_match(ctx, &self.attribute, i, j) {
            Some(false) => toggle_sign(ctx, i, j),
            _ => 0.0,
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(i, j)| categories_match(ctx, &self.attribute, i, j) == Some(false))
            .count() as Weight
    }
}

fn abs_diff(ctx: &EffectContext, attribute: &str, i: NodeId, j: NodeId) -> Option<Weight> {
    let vi = ctx.attributes.continuous(attribute, i)?;
    let vj = ctx.attributes.continuous(attribute, j)?;
    Some((vi - vj).abs())
}

/// `z = Σ_{arcs i->j} |cont(i) - cont(j)|`: continuous-covariate distance.
#[derive(Debug, Clone)]
pub struct DiffEffect {
    name: String,
    attribute: String,
}

impl DiffEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("Diff_{attribute}"),
            attribute,
        }
    }
}

impl Effect for DiffEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        match abs_diff(ctx, &self.attribute, i, j) {
            Some(d) => signed(!ctx.graph.has_edge(i, j), d),
            None => 0.0,
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter_map(|(i, j)| abs_diff(ctx, &self.attribute, i, j))
            .sum()
    }
}

/// `z = Σ_{arcs i->j, j->i exists} |cont(i) - cont(j)|`: continuous distance
/// restricted to reciprocated dyads.
#[derive(Debug, Clone)]
pub struct DiffReciprocityEffect {
    name: String,
    attribute: String,
}

impl DiffReciprocityEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("DiffReciprocity_{attribute}"),
            attribute,
        }
    }
}

impl Effect for DiffReciprocityEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        if !ctx.graph.has_edge(j, i) {
            return 0.0;
        }
        match abs_diff(ctx, &self.attribute, i, j) {
            Some(d) => signed(!ctx.graph.has_edge(i, j), d),
            None => 0.0,
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(i, j)| i < j && ctx.graph.has_edge(j, i))
            .filter_map(|(i, j)| abs_diff(ctx, &self.attribute, i, j))
            .sum()
    }
}

/// `z = Σ_{arcs i->j} jaccard(set(i), set(j))`: set-valued-attribute
/// similarity.
#[derive(Debug, Clone)]
pub struct JaccardSimilarityEffect {
    name: String,
    attribute: String,
}

impl JaccardSimilarityEffect {
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            name: format!("JaccardSimilarity_{attribute}"),
            attribute,
        }
    }

    fn jaccard(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        jaccard_similarity(
            ctx.attributes.set_valued(&self.attribute, i),
            ctx.attributes.set_valued(&self.attribute, j),
        )
    }
}

impl Effect for JaccardSimilarityEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        signed(!ctx.graph.has_edge(i, j), self.jaccard(ctx, i, j))
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph.iter_edges().map(|(i, j)| self.jaccard(ctx, i, j)).sum()
    }
}
