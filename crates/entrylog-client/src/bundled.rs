//! Bundled fallback building list.
//!
//! Used when the remote store is unreachable and no cached snapshot exists
//! yet, so a fresh install can still render and queue visits offline.

use entrylog_shared::types::Building;

/// The campus building list shipped with the application.
pub fn fallback_buildings() -> Vec<Building> {
    [
        ("ENG-01", "Engineering Building A", Some(3)),
        ("ENG-02", "Engineering Building B", Some(4)),
        ("LIB-01", "Main Library", Some(2)),
        ("STU-01", "Student Center", Some(5)),
        ("SCI-01", "Science Building", Some(5)),
        ("ADM-01", "Administration Building", Some(2)),
        ("GYM-01", "Recreation Center", Some(3)),
        ("ART-01", "Arts & Humanities Hall", Some(5)),
    ]
    .into_iter()
    .map(|(id, name, entrances_max)| Building {
        id: id.to_string(),
        name: name.to_string(),
        entrances_max,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_ids_are_unique() {
        let buildings = fallback_buildings();
        let mut ids: Vec<&str> = buildings.iter().map(|b| b.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), buildings.len());
    }
}
