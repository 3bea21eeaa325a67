use serde::{Deserialize, Serialize};

use crate::pitch::AccidentalPreference;
use crate::scale::ScaleFamily;

/// Switches for a single analysis run. Filled from config by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub modal_enhancement: bool,
    pub chromatic_annotation: bool,
    /// Families searched by the matcher, in preference order.
    pub scale_families: Vec<ScaleFamily>,
    pub accidentals: AccidentalPreference,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            modal_enhancement: true,
            chromatic_annotation: true,
            scale_families: ScaleFamily::ALL.to_vec(),
            accidentals: AccidentalPreference::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_searches_every_family() {
        let opts = AnalysisOptions::default();
        assert_eq!(opts.scale_families, ScaleFamily::ALL.to_vec());
        assert!(opts.modal_enhancement);
        assert!(opts.chromatic_annotation);
        assert_eq!(opts.accidentals, AccidentalPreference::Auto);
    }
}
