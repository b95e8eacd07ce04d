//! Mark resolution: the starting targets of a modifier chain.

use serde::{Deserialize, Serialize};

use crate::error::ResolutionError;
use crate::hats::{HatColor, HatShape, HatStyle, HatTokenMap};
use crate::primitives::Range;

use super::Target;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mark {
    /// The current selection(s).
    Cursor,
    /// The token wearing the given hat.
    Hat { color: HatColor, shape: HatShape },
    /// A range handed in directly by the host.
    Explicit(Range),
    /// The previous command's targets.
    That,
}

pub fn resolve(
    mark: Mark,
    selections: &[Range],
    hat_map: &HatTokenMap,
    previous: &[Target],
) -> Result<Vec<Target>, ResolutionError> {
    match mark {
        Mark::Cursor => Ok(selections.iter().map(|&s| Target::from_range(s)).collect()),
        Mark::Hat { color, shape } => {
            let token = hat_map.token(HatStyle::new(color, shape))?;
            let mut target = Target::from_range(token.range);
            target.insertion_delimiter = " ".to_string();
            Ok(vec![target])
        }
        Mark::Explicit(range) => Ok(vec![Target::from_range(range)]),
        Mark::That => {
            if previous.is_empty() {
                return Err(ResolutionError::NoPreviousTargets);
            }
            Ok(previous
                .iter()
                .enumerate()
                .map(|(index, target)| Target {
                    that_target: Some(index),
                    ..target.clone()
                })
                .collect())
        }
    }
}
