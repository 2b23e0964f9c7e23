//! Alias resolution

use crate::model::AliasTable;
use tracing::trace;

/// External name for a member
///
/// The table need not be exhaustive: a name without an entry, a missing
/// table, or disabled alias resolution all yield the declared name.
pub fn resolve(member_name: &str, table: Option<&AliasTable>, use_aliases: bool) -> String {
    if !use_aliases {
        return member_name.to_string();
    }

    match table.and_then(|table| table.get(member_name)) {
        Some(external) => {
            trace!("Resolved alias {} -> {}", member_name, external);
            external.to_string()
        }
        None => member_name.to_string(),
    }
}
