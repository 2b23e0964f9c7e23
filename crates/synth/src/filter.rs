//! Member eligibility

use crate::model::{Member, StorageKind};

/// Whether a member may appear in a description tree
///
/// Members carrying any attribute marker are excluded: a marker can change
/// how the member is stored, so it cannot be treated as a plain stored
/// property. Computed members are excluded as well. A member without
/// comments is still eligible.
pub fn is_eligible(member: &Member) -> bool {
    member.attribute_markers.is_empty() && member.storage == StorageKind::Stored
}
