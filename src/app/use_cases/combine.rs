//! Use-Case: Zusammenfassen und Aufteilen selektierter Features.

use crate::core::{DeleteMode, Feature, FeatureId, FeatureStore, Geometry};
use serde_json::Value;

/// GeoJSON der erzeugten und entfernten Features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombineOutcome {
    pub created: Vec<Value>,
    pub deleted: Vec<Value>,
}

/// Fasst alle selektierten Features zu einem Multi-Feature zusammen.
///
/// Alle Grundtypen werden vor jeder Änderung geprüft. Bei weniger als zwei
/// selektierten Features oder gemischten Grundtypen bleibt der Store unverändert
/// und es wird `None` zurückgegeben. Das neue Feature übernimmt die Properties
/// des ersten selektierten Features und ist danach allein selektiert.
pub fn combine_selected(store: &mut FeatureStore) -> Option<CombineOutcome> {
    let selected: Vec<Feature> = store.selected_features().into_iter().cloned().collect();
    if selected.len() < 2 {
        return None;
    }

    let Some(geometry) = Geometry::combine(selected.iter().map(|f| &f.geometry)) else {
        log::debug!("Combine abgelehnt: gemischte Geometrietypen");
        return None;
    };

    let combined = Feature::new(FeatureId::generate(), geometry)
        .with_properties(selected[0].properties.clone());
    let outcome = CombineOutcome {
        created: vec![combined.to_geojson()],
        deleted: selected.iter().map(Feature::to_geojson).collect(),
    };

    let old_ids: Vec<FeatureId> = selected.iter().map(|f| f.id.clone()).collect();
    let new_id = store.add(combined);
    store.delete(&old_ids, DeleteMode::Silent);
    store.set_selected(&[new_id]);

    log::info!("{} Features zusammengefasst", old_ids.len());
    Some(outcome)
}

/// Teilt alle selektierten Multi-Features in Einzel-Features auf.
///
/// Die Teile werden selektiert, die Multi-Features still gelöscht.
/// Nicht-Multi-Features bleiben unverändert.
pub fn uncombine_selected(store: &mut FeatureStore) -> CombineOutcome {
    let selected: Vec<Feature> = store.selected_features().into_iter().cloned().collect();
    let mut outcome = CombineOutcome::default();

    for feature in selected
        .iter()
        .filter(|f| f.geometry_type().is_multi())
    {
        for part in feature.split() {
            outcome.created.push(part.to_geojson());
            let id = store.add(part);
            store.select(&[id]);
        }
        store.delete(&[feature.id.clone()], DeleteMode::Silent);
        outcome.deleted.push(feature.to_geojson());
    }

    if !outcome.deleted.is_empty() {
        log::info!(
            "{} Multi-Features in {} Teile aufgeteilt",
            outcome.deleted.len(),
            outcome.created.len()
        );
    }
    outcome
}
