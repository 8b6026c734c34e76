//! Evolution chain walking.

use serde::{Deserialize, Serialize};

/// One species in an evolution tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub species: String,
    pub evolves_to: Vec<EvolutionNode>,
}

impl EvolutionNode {
    pub fn leaf(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            evolves_to: Vec::new(),
        }
    }

    pub fn with_next(mut self, next: EvolutionNode) -> Self {
        self.evolves_to.push(next);
        self
    }
}

/// Species names from the base form along `evolves_to[0]` at every step.
/// Alternate branches are dropped.
pub fn first_branch(root: &EvolutionNode) -> Vec<String> {
    let mut names = vec![root.species.clone()];
    let mut node = root;
    while let Some(next) = node.evolves_to.first() {
        names.push(next.species.clone());
        node = next;
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_linear_chain() {
        let chain = EvolutionNode::leaf("bulbasaur").with_next(
            EvolutionNode::leaf("ivysaur").with_next(EvolutionNode::leaf("venusaur")),
        );
        assert_eq!(first_branch(&chain), vec!["bulbasaur", "ivysaur", "venusaur"]);
    }

    #[test]
    fn test_branching_chain_keeps_first_branch() {
        let chain = EvolutionNode::leaf("eevee")
            .with_next(EvolutionNode::leaf("vaporeon"))
            .with_next(EvolutionNode::leaf("jolteon"))
            .with_next(EvolutionNode::leaf("flareon"));
        assert_eq!(first_branch(&chain), vec!["eevee", "vaporeon"]);
    }

    #[test]
    fn test_branch_below_root() {
        let chain = EvolutionNode::leaf("oddish").with_next(
            EvolutionNode::leaf("gloom")
                .with_next(EvolutionNode::leaf("vileplume"))
                .with_next(EvolutionNode::leaf("bellossom")),
        );
        assert_eq!(first_branch(&chain), vec!["oddish", "gloom", "vileplume"]);
    }

    #[test]
    fn test_single_stage() {
        assert_eq!(first_branch(&EvolutionNode::leaf("tauros")), vec!["tauros"]);
    }
}
