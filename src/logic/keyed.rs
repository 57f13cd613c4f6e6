use crate::model::DeltaAction;

/// Apply keyed Add/Delete/Change deltas to an existing list, in place.
///
/// Ordering invariant: every Delete is applied before every Add, and every
/// Add before every Change. Deletes remove each existing entry whose key
/// matches a Delete-tagged delta; Adds append a freshly built entry; Changes
/// hand the matched entry to `on_change`. An unmatched Change matches
/// nothing and is dropped.
///
/// The choice → location → location-attribute merge is this same shape at
/// every level, so each level supplies only its key extraction and (for
/// locations) a recursive `on_change`.
pub fn apply_keyed_deltas<T, D, K>(
    existing: &mut Vec<T>,
    deltas: &[D],
    key_of: impl Fn(&T) -> K,
    delta_key_of: impl Fn(&D) -> K,
    action_of: impl Fn(&D) -> DeltaAction,
    build: impl Fn(&D) -> T,
    mut on_change: impl FnMut(&mut T, &D),
) where
    K: PartialEq,
{
    for delta in deltas.iter().filter(|d| action_of(d) == DeltaAction::Delete) {
        let key = delta_key_of(delta);
        existing.retain(|entry| key_of(entry) != key);
    }

    for delta in deltas.iter().filter(|d| action_of(d) == DeltaAction::Add) {
        existing.push(build(delta));
    }

    for delta in deltas.iter().filter(|d| action_of(d) == DeltaAction::Change) {
        let key = delta_key_of(delta);
        if let Some(entry) = existing.iter_mut().find(|entry| key_of(entry) == key) {
            on_change(entry, delta);
        }
    }
}
