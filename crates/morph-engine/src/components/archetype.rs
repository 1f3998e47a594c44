use serde::{Deserialize, Serialize};

/// Kind of decorative object in a particle group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticleArchetype {
    /// Directional pieces (hearts) that face outward once the tree forms.
    Needle,
    /// Baubles that keep drifting and spinning in both states.
    Ornament,
    /// Stars and rings; behave like ornaments.
    Special,
}

/// What a particle does while the scene is tree-shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeBehavior {
    /// No hover; position locks to the tree pose and rotation eases to the tree orientation.
    Lock,
    /// Keep hovering and spinning.
    Drift,
}

/// How the tree-pose rotation is chosen at layout time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOrientation {
    /// Tilted up and turned to face away from the trunk.
    OutwardUp,
    /// Random per-axis rotation.
    Random,
}

/// Behavior policy attached to an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypePolicy {
    pub tree_behavior: TreeBehavior,
    pub tree_orientation: TreeOrientation,
}

const POLICIES: [ArchetypePolicy; 3] = [
    // Needle
    ArchetypePolicy {
        tree_behavior: TreeBehavior::Lock,
        tree_orientation: TreeOrientation::OutwardUp,
    },
    // Ornament
    ArchetypePolicy {
        tree_behavior: TreeBehavior::Drift,
        tree_orientation: TreeOrientation::Random,
    },
    // Special
    ArchetypePolicy {
        tree_behavior: TreeBehavior::Drift,
        tree_orientation: TreeOrientation::Random,
    },
];

impl ParticleArchetype {
    pub const ALL: [ParticleArchetype; 3] = [
        ParticleArchetype::Needle,
        ParticleArchetype::Ornament,
        ParticleArchetype::Special,
    ];

    pub const fn policy(self) -> ArchetypePolicy {
        POLICIES[self as usize]
    }

    /// Whether particles of this archetype lock in place for the given state.
    pub fn locks_in(self, tree: bool) -> bool {
        tree && self.policy().tree_behavior == TreeBehavior::Lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_needles_lock() {
        assert!(ParticleArchetype::Needle.locks_in(true));
        assert!(!ParticleArchetype::Needle.locks_in(false));
        assert!(!ParticleArchetype::Ornament.locks_in(true));
        assert!(!ParticleArchetype::Special.locks_in(true));
    }

    #[test]
    fn table_matches_variants() {
        for a in ParticleArchetype::ALL {
            let p = a.policy();
            let directional = a == ParticleArchetype::Needle;
            assert_eq!(p.tree_orientation == TreeOrientation::OutwardUp, directional);
        }
    }

    #[test]
    fn preset_names() {
        let a: ParticleArchetype = serde_json::from_str("\"NEEDLE\"").unwrap();
        assert_eq!(a, ParticleArchetype::Needle);
        assert_eq!(serde_json::to_string(&ParticleArchetype::Special).unwrap(), "\"SPECIAL\"");
    }
}
