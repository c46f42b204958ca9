//! Entity post-processing.

use serde_json::Value;

use archlint_model::{ELEMENTS_SECTION, EntityEntry, EntityIndex};

use crate::CoreError;

/// Derives the entity index from a merged manifest.
///
/// Runs exactly once per session, after resolution and before any rule
/// evaluation. Pure function of the merged tree: the id-to-location map
/// and the reverse-reference map come entirely from the `elements`
/// section. A manifest without that section yields an empty index (the
/// resolver already recorded the advisory diagnostic); a section that is
/// present but structurally unusable is fatal for the run, because rule
/// evaluation has no meaningful fallback without these structures.
pub fn build_entity_index(merged: &Value) -> Result<EntityIndex, CoreError> {
    let mut index = EntityIndex::default();

    let Some(section) = merged.get(ELEMENTS_SECTION) else {
        return Ok(index);
    };
    let Some(elements) = section.as_object() else {
        return Err(CoreError::post_process(format!(
            "'{}' section is not a mapping",
            ELEMENTS_SECTION
        )));
    };

    for (id, definition) in elements {
        // A branch nulled out by a failed import is tolerated; anything
        // else non-mapping means the manifest shape is unusable.
        if definition.is_null() {
            continue;
        }
        let Some(def) = definition.as_object() else {
            return Err(CoreError::post_process(format!(
                "element '{}' is not a mapping",
                id
            )));
        };

        index.entities.insert(
            id.clone(),
            EntityEntry {
                kind: def.get("kind").and_then(Value::as_str).map(str::to_string),
                location: format!("{}.{}", ELEMENTS_SECTION, id),
            },
        );

        if let Some(relations) = def.get("relations").and_then(Value::as_array) {
            for relation in relations {
                if let Some(target) = relation.get("ref").and_then(Value::as_str) {
                    index
                        .reverse_refs
                        .entry(target.to_string())
                        .or_default()
                        .push(id.clone());
                }
            }
        }
    }

    for sources in index.reverse_refs.values_mut() {
        sources.sort();
        sources.dedup();
    }

    Ok(index)
}
