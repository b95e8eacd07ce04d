//! Mark + modifier chains resolved into concrete targets.
//!
//! A request is a mark (where to start) and a modifier list (how to move).
//! Marks can produce several starting targets; every modifier then maps
//! each current target to zero-or-more successors, so resolution is a left
//! fold with fan-out. Any failure aborts the whole request.

pub mod marks;
pub mod modifiers;
pub mod target;

use serde::{Deserialize, Serialize};

pub use marks::Mark;
pub use modifiers::{LineEdge, Modifier, Placement, RangeEdge};
pub use target::Target;

use crate::document::Document;
use crate::error::ResolutionError;
use crate::hats::HatTokenMap;
use crate::primitives::Range;
use crate::scopes::ScopeContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRequest {
    pub mark: Mark,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

pub fn resolve(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    request: &TargetRequest,
    selections: &[Range],
    hat_map: &HatTokenMap,
    previous: &[Target],
) -> Result<Vec<Target>, ResolutionError> {
    let mut targets = marks::resolve(request.mark, selections, hat_map, previous)?;
    for &modifier in &request.modifiers {
        let mut next = Vec::new();
        for target in &targets {
            next.extend(modifiers::apply(ctx, document, modifier, target)?);
        }
        targets = next;
    }
    Ok(targets)
}
