//! Pitch-class profiles: key estimation, mode fit, cadence strength and
//! region classification against a global key.

use serde::{Deserialize, Serialize};

use modus_types::{DiatonicMode, KeyCenter, PitchClass};

/// Krumhansl–Schmuckler probe-tone ratings, tonic first.
pub const KS_MAJOR: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];
pub const KS_MINOR: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

const SILENCE: f64 = 1e-6;

/// Twelve non-negative weights, one per pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchClassProfile([f64; 12]);

impl PitchClassProfile {
    /// Negative and non-finite weights are treated as zero.
    pub fn from_weights(weights: [f64; 12]) -> Self {
        Self(weights.map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 }))
    }

    /// One unit of weight per sounding note.
    pub fn from_midi(notes: &[u8]) -> Self {
        let mut weights = [0.0; 12];
        for &n in notes {
            weights[PitchClass::from_midi(n).get() as usize] += 1.0;
        }
        Self(weights)
    }

    pub fn weights(&self) -> &[f64; 12] {
        &self.0
    }

    pub fn weight(&self, pc: PitchClass) -> f64 {
        self.0[pc.get() as usize]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_silent(&self) -> bool {
        self.0.iter().map(|w| w * w).sum::<f64>().sqrt() < SILENCE
    }

    /// The `n` heaviest pitch classes. Equal weights favour the higher pitch class.
    pub fn top(&self, n: usize) -> Vec<PitchClass> {
        let mut order: Vec<PitchClass> = PitchClass::ALL.to_vec();
        order.sort_by(|a, b| {
            self.weight(*b)
                .total_cmp(&self.weight(*a))
                .then(b.get().cmp(&a.get()))
        });
        order.truncate(n);
        order
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Pearson correlation; `None` when either side has no variance.
fn pearson(a: &[f64; 12], b: &[f64; 12]) -> Option<f64> {
    let mean_a = a.iter().sum::<f64>() / 12.0;
    let mean_b = b.iter().sum::<f64>() / 12.0;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for i in 0..12 {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denom = (var_a * var_b).sqrt();
    if denom < f64::EPSILON {
        return None;
    }
    Some(cov / denom)
}

/// Template rotated so index `i` holds the rating of pitch class `i` in the key on `tonic`.
fn rotated(template: &[f64; 12], tonic: PitchClass) -> [f64; 12] {
    std::array::from_fn(|i| template[PitchClass::new(i as i32 - tonic.get() as i32).get() as usize])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    pub key: KeyCenter,
    pub correlation: f64,
    /// `(correlation + 1) / 2`, four decimals.
    pub confidence: f64,
}

/// All 24 major and minor keys, best correlation first. Empty for a silent or
/// flat profile.
pub fn rank_keys(profile: &PitchClassProfile) -> Vec<KeyEstimate> {
    if profile.is_silent() {
        return Vec::new();
    }
    let mut ranked = Vec::with_capacity(24);
    for tonic in PitchClass::ALL {
        for (key, template) in [
            (KeyCenter::major(tonic), &KS_MAJOR),
            (KeyCenter::minor(tonic), &KS_MINOR),
        ] {
            if let Some(r) = pearson(profile.weights(), &rotated(template, tonic)) {
                ranked.push(KeyEstimate {
                    key,
                    correlation: r,
                    confidence: round_to((r + 1.0) / 2.0, 4),
                });
            }
        }
    }
    ranked.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    ranked
}

pub fn estimate_key(profile: &PitchClassProfile) -> Option<KeyEstimate> {
    let best = rank_keys(profile).into_iter().next();
    if let Some(est) = &best {
        log::debug!(
            target: "analysis",
            "profile estimate {} (r = {:.3})",
            est.key,
            est.correlation
        );
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeScore {
    pub mode: DiatonicMode,
    /// Share of the profile's weight inside the mode's scale.
    pub share: f64,
}

/// Fit of each diatonic mode on `tonic`, in mode order.
pub fn mode_scores(profile: &PitchClassProfile, tonic: PitchClass) -> Vec<ModeScore> {
    let total = profile.total();
    DiatonicMode::ALL
        .iter()
        .map(|&mode| {
            let inside: f64 = KeyCenter::new(tonic, mode)
                .scale()
                .iter()
                .map(|pc| profile.weight(pc))
                .sum();
            let share = if total > 0.0 { inside / total } else { 0.0 };
            ModeScore { mode, share }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cadence {
    pub detected: bool,
    pub strength: f64,
}

/// Tonic and dominant both among the three heaviest pitch classes.
pub fn detect_cadence(profile: &PitchClassProfile, key: &KeyCenter) -> Cadence {
    if profile.is_silent() {
        return Cadence::default();
    }
    let tonic = key.tonic;
    let dominant = tonic.transpose(7);
    let top = profile.top(3);
    if !(top.contains(&tonic) && top.contains(&dominant)) {
        return Cadence::default();
    }
    let share = (profile.weight(tonic) + profile.weight(dominant)) / profile.total();
    Cadence {
        detected: true,
        strength: f64::min(round_to(share * 2.5, 2), 1.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Stable,
    Modulation,
    ModalShift,
}

impl RegionKind {
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Stable => "stable",
            RegionKind::Modulation => "modulation",
            RegionKind::ModalShift => "modal shift",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionClassification {
    pub kind: RegionKind,
    pub confidence: f64,
    /// Local scale tones missing from the global scale.
    pub borrowed: Vec<PitchClass>,
}

const MODULATION_KEY_CONFIDENCE: f64 = 0.80;
const MODULATION_CADENCE_STRENGTH: f64 = 0.60;

/// Classify a local region against the piece's global key.
pub fn classify_region(
    global: &KeyCenter,
    local: &KeyCenter,
    local_confidence: f64,
    cadence: &Cadence,
) -> RegionClassification {
    if global == local {
        return RegionClassification {
            kind: RegionKind::Stable,
            confidence: 0.95,
            borrowed: Vec::new(),
        };
    }

    let borrowed: Vec<PitchClass> = local.scale().difference(global.scale()).iter().collect();

    if local_confidence > MODULATION_KEY_CONFIDENCE
        && cadence.detected
        && cadence.strength > MODULATION_CADENCE_STRENGTH
    {
        return RegionClassification {
            kind: RegionKind::Modulation,
            confidence: round_to(local_confidence * 0.5 + cadence.strength * 0.5, 2),
            borrowed,
        };
    }

    let confidence = f64::max(0.5, 1.0 - borrowed.len() as f64 * 0.15);
    RegionClassification {
        kind: RegionKind::ModalShift,
        confidence: round_to(confidence, 2),
        borrowed,
    }
}
