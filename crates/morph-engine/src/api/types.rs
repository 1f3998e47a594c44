use serde::{Deserialize, Serialize};

/// Which target layout the particles are heading for.
/// Owned by the UI layer; the animators only read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MorphState {
    /// Random volumetric cloud.
    #[default]
    Scattered,
    /// Cone resembling a tree.
    TreeShape,
}

impl MorphState {
    pub fn is_tree(self) -> bool {
        matches!(self, MorphState::TreeShape)
    }

    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            MorphState::Scattered => MorphState::TreeShape,
            MorphState::TreeShape => MorphState::Scattered,
        }
    }

    /// Wire value written into the frame header (0 = scattered, 1 = tree).
    pub fn as_u32(self) -> u32 {
        match self {
            MorphState::Scattered => 0,
            MorphState::TreeShape => 1,
        }
    }

    /// Decode a wire value. Anything non-zero means tree shape.
    pub fn from_u32(value: u32) -> Self {
        if value == 0 {
            MorphState::Scattered
        } else {
            MorphState::TreeShape
        }
    }
}

/// Index of an instance batch inside a scene (groups first, spiral last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trip() {
        let s = MorphState::Scattered;
        assert_eq!(s.toggled(), MorphState::TreeShape);
        assert_eq!(s.toggled().toggled(), s);
    }

    #[test]
    fn wire_values() {
        assert_eq!(MorphState::from_u32(MorphState::TreeShape.as_u32()), MorphState::TreeShape);
        assert_eq!(MorphState::from_u32(0), MorphState::Scattered);
        assert_eq!(MorphState::from_u32(7), MorphState::TreeShape);
    }

    #[test]
    fn serializes_like_the_ui() {
        let json = serde_json::to_string(&MorphState::TreeShape).unwrap();
        assert_eq!(json, "\"TREE_SHAPE\"");
    }
}
