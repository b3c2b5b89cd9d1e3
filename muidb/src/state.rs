//! Translation workflow states and the conversion between vocabularies.
//!
//! Three closed vocabularies are in use:
//!
//! - [`MuiDbState`]: the four states stored in a MuiDB document.
//! - [`Xliff12State`]: the finer XLIFF 1.2 `state` attribute values, plus
//!   user-defined states that start with [`USER_STATE_PREFIX`].
//! - [`Xliff20State`]: the four XLIFF 2.0 segment states.
//!
//! [`to_muidb`], [`to_xliff12`] and [`to_xliff20`] accept a label from any of
//! them and map it onto the target vocabulary. Members of the target pass
//! through unchanged; finer states collapse onto coarser ones.
//!
//! ```rust
//! use muidb::state::{self, MuiDbState, Xliff12State, Xliff20State};
//!
//! assert_eq!(state::to_muidb("needs-review-l10n")?, MuiDbState::Translated);
//! assert_eq!(state::to_xliff12("reviewed")?, Xliff12State::SignedOff);
//! assert_eq!(state::to_xliff20("x-custom")?, Xliff20State::Initial);
//! # Ok::<(), muidb::Error>(())
//! ```

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Prefix that marks a user-defined XLIFF 1.2 state.
pub const USER_STATE_PREFIX: &str = "x-";

/// Position of a label in the translation workflow, shared by all vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Initial,
    Translated,
    Reviewed,
    Final,
}

// `needs-review-adaptation` still needs work on the non-textual parts, so it
// sits with the initial states.
static WORKFLOW_STAGES: &[(&str, Stage)] = &[
    ("new", Stage::Initial),
    ("initial", Stage::Initial),
    ("needs-adaptation", Stage::Initial),
    ("needs-l10n", Stage::Initial),
    ("needs-review-adaptation", Stage::Initial),
    ("needs-translation", Stage::Initial),
    ("translated", Stage::Translated),
    ("needs-review-l10n", Stage::Translated),
    ("needs-review-translation", Stage::Translated),
    ("reviewed", Stage::Reviewed),
    ("signed-off", Stage::Reviewed),
    ("final", Stage::Final),
];

fn stage_of(label: &str) -> Option<Stage> {
    WORKFLOW_STAGES
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, stage)| *stage)
}

fn is_user_state(label: &str) -> bool {
    label.starts_with(USER_STATE_PREFIX)
}

fn check_not_blank(state: &str) -> Result<(), Error> {
    if state.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "state must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// The workflow state of a text stored in a MuiDB document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MuiDbState {
    #[default]
    New,
    Translated,
    Reviewed,
    Final,
}

impl MuiDbState {
    const ALL: [MuiDbState; 4] = [
        MuiDbState::New,
        MuiDbState::Translated,
        MuiDbState::Reviewed,
        MuiDbState::Final,
    ];

    /// All members, in workflow order.
    pub fn enumerate() -> impl Iterator<Item = MuiDbState> {
        Self::ALL.into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MuiDbState::New => "new",
            MuiDbState::Translated => "translated",
            MuiDbState::Reviewed => "reviewed",
            MuiDbState::Final => "final",
        }
    }

    fn from_stage(stage: Stage) -> Self {
        match stage {
            Stage::Initial => MuiDbState::New,
            Stage::Translated => MuiDbState::Translated,
            Stage::Reviewed => MuiDbState::Reviewed,
            Stage::Final => MuiDbState::Final,
        }
    }
}

impl Display for MuiDbState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an exact member label. Use [`to_muidb`] to convert foreign labels.
impl FromStr for MuiDbState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::enumerate()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::UnrecognizedState {
                state: s.to_string(),
                target: MUIDB,
            })
    }
}

/// An XLIFF 1.2 `state` attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Xliff12State {
    /// The terminating state.
    Final,
    /// Only non-textual information needs adaptation.
    NeedsAdaptation,
    /// Both text and non-textual information need adaptation.
    NeedsL10n,
    /// Only non-textual information needs review.
    NeedsReviewAdaptation,
    /// Both text and non-textual information need review.
    NeedsReviewL10n,
    /// Only the text needs review.
    NeedsReviewTranslation,
    NeedsTranslation,
    /// The unit was not in a previous version of the document.
    New,
    /// Changes are reviewed and approved.
    SignedOff,
    Translated,
    /// A user-defined state; always starts with [`USER_STATE_PREFIX`].
    User(String),
}

impl Xliff12State {
    const KNOWN: [&'static str; 10] = [
        "final",
        "needs-adaptation",
        "needs-l10n",
        "needs-review-adaptation",
        "needs-review-l10n",
        "needs-review-translation",
        "needs-translation",
        "new",
        "signed-off",
        "translated",
    ];

    /// All predefined members. User-defined states are open-ended and not listed.
    pub fn enumerate() -> impl Iterator<Item = Xliff12State> {
        Self::KNOWN.into_iter().filter_map(Self::known)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Xliff12State::Final => "final",
            Xliff12State::NeedsAdaptation => "needs-adaptation",
            Xliff12State::NeedsL10n => "needs-l10n",
            Xliff12State::NeedsReviewAdaptation => "needs-review-adaptation",
            Xliff12State::NeedsReviewL10n => "needs-review-l10n",
            Xliff12State::NeedsReviewTranslation => "needs-review-translation",
            Xliff12State::NeedsTranslation => "needs-translation",
            Xliff12State::New => "new",
            Xliff12State::SignedOff => "signed-off",
            Xliff12State::Translated => "translated",
            Xliff12State::User(label) => label,
        }
    }

    pub fn is_user_defined(&self) -> bool {
        matches!(self, Xliff12State::User(_))
    }

    fn known(label: &str) -> Option<Self> {
        let state = match label {
            "final" => Xliff12State::Final,
            "needs-adaptation" => Xliff12State::NeedsAdaptation,
            "needs-l10n" => Xliff12State::NeedsL10n,
            "needs-review-adaptation" => Xliff12State::NeedsReviewAdaptation,
            "needs-review-l10n" => Xliff12State::NeedsReviewL10n,
            "needs-review-translation" => Xliff12State::NeedsReviewTranslation,
            "needs-translation" => Xliff12State::NeedsTranslation,
            "new" => Xliff12State::New,
            "signed-off" => Xliff12State::SignedOff,
            "translated" => Xliff12State::Translated,
            _ => return None,
        };
        Some(state)
    }

    fn from_stage(stage: Stage) -> Self {
        match stage {
            Stage::Initial => Xliff12State::New,
            Stage::Translated => Xliff12State::Translated,
            Stage::Reviewed => Xliff12State::SignedOff,
            Stage::Final => Xliff12State::Final,
        }
    }
}

impl Display for Xliff12State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a predefined member or a user-defined (`x-`) state.
impl FromStr for Xliff12State {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(state) = Self::known(s) {
            return Ok(state);
        }
        if is_user_state(s) {
            return Ok(Xliff12State::User(s.to_string()));
        }
        Err(Error::UnrecognizedState {
            state: s.to_string(),
            target: XLIFF12,
        })
    }
}

/// An XLIFF 2.0 segment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Xliff20State {
    Initial,
    Translated,
    Reviewed,
    /// The segment is finalized and ready to be used.
    Final,
}

impl Xliff20State {
    const ALL: [Xliff20State; 4] = [
        Xliff20State::Initial,
        Xliff20State::Translated,
        Xliff20State::Reviewed,
        Xliff20State::Final,
    ];

    pub fn enumerate() -> impl Iterator<Item = Xliff20State> {
        Self::ALL.into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Xliff20State::Initial => "initial",
            Xliff20State::Translated => "translated",
            Xliff20State::Reviewed => "reviewed",
            Xliff20State::Final => "final",
        }
    }

    fn from_stage(stage: Stage) -> Self {
        match stage {
            Stage::Initial => Xliff20State::Initial,
            Stage::Translated => Xliff20State::Translated,
            Stage::Reviewed => Xliff20State::Reviewed,
            Stage::Final => Xliff20State::Final,
        }
    }
}

impl Display for Xliff20State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Xliff20State {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::enumerate()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::UnrecognizedState {
                state: s.to_string(),
                target: XLIFF20,
            })
    }
}

const MUIDB: &str = "MuiDB";
const XLIFF12: &str = "XLIFF v1.2";
const XLIFF20: &str = "XLIFF v2.0";

/// Converts a state label from any vocabulary into a MuiDB state.
///
/// User-defined XLIFF 1.2 states become [`MuiDbState::New`].
///
/// # Errors
///
/// [`Error::InvalidArgument`] for blank input, [`Error::UnrecognizedState`]
/// for a label no vocabulary knows.
pub fn to_muidb(state: &str) -> Result<MuiDbState, Error> {
    check_not_blank(state)?;

    if let Some(stage) = stage_of(state) {
        return Ok(MuiDbState::from_stage(stage));
    }
    if is_user_state(state) {
        return Ok(MuiDbState::New);
    }

    Err(Error::UnrecognizedState {
        state: state.to_string(),
        target: MUIDB,
    })
}

/// Converts a state label from any vocabulary into an XLIFF 1.2 state.
///
/// User-defined states pass through unchanged.
pub fn to_xliff12(state: &str) -> Result<Xliff12State, Error> {
    check_not_blank(state)?;

    if let Some(known) = Xliff12State::known(state) {
        return Ok(known);
    }
    if let Some(stage) = stage_of(state) {
        return Ok(Xliff12State::from_stage(stage));
    }
    if is_user_state(state) {
        return Ok(Xliff12State::User(state.to_string()));
    }

    Err(Error::UnrecognizedState {
        state: state.to_string(),
        target: XLIFF12,
    })
}

/// Converts a state label from any vocabulary into an XLIFF 2.0 state.
///
/// User-defined XLIFF 1.2 states become [`Xliff20State::Initial`].
pub fn to_xliff20(state: &str) -> Result<Xliff20State, Error> {
    check_not_blank(state)?;

    if let Some(stage) = stage_of(state) {
        return Ok(Xliff20State::from_stage(stage));
    }
    if is_user_state(state) {
        return Ok(Xliff20State::Initial);
    }

    Err(Error::UnrecognizedState {
        state: state.to_string(),
        target: XLIFF20,
    })
}

/// The three state vocabularies, for callers that pick the target at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    MuiDb,
    Xliff12,
    Xliff20,
}

impl Vocabulary {
    /// Converts `state` into this vocabulary and returns the resulting label.
    pub fn convert(&self, state: &str) -> Result<String, Error> {
        Ok(match self {
            Vocabulary::MuiDb => to_muidb(state)?.to_string(),
            Vocabulary::Xliff12 => to_xliff12(state)?.to_string(),
            Vocabulary::Xliff20 => to_xliff20(state)?.to_string(),
        })
    }

    /// The fixed labels of this vocabulary.
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            Vocabulary::MuiDb => MuiDbState::enumerate().map(|s| s.as_str()).collect(),
            Vocabulary::Xliff12 => Xliff12State::KNOWN.to_vec(),
            Vocabulary::Xliff20 => Xliff20State::enumerate().map(|s| s.as_str()).collect(),
        }
    }
}
