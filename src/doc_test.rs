#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn scene() -> Scene {
    Scene::new().with_seed(7)
}

fn make_element(kind: ElementKind, z: i64) -> Element {
    Element {
        id: Uuid::new_v4(),
        kind,
        position: Point::new(10.0, 10.0),
        size: kind.defaults().size,
        z_index: z,
        rotation: 0.0,
        content: String::new(),
        color: "#FFFFFF".into(),
        metadata: json!({}),
    }
}

fn z_indices(scene: &Scene) -> Vec<i64> {
    scene.elements().iter().map(|e| e.z_index).collect()
}

// =============================================================
// ElementKind
// =============================================================

#[test]
fn every_kind_has_positive_default_size() {
    for kind in ElementKind::ALL {
        let d = kind.defaults();
        assert!(d.size.width > 0.0 && d.size.height > 0.0, "{kind:?}");
        assert!(d.color.starts_with('#'), "{kind:?}");
    }
}

#[test]
fn note_defaults_match_sticky_note() {
    let d = ElementKind::Note.defaults();
    assert_eq!(d.size, Size::new(200.0, 150.0));
    assert_eq!(d.color, "#FEF3C7");
    assert_eq!(d.content, "New sticky note");
}

#[test]
fn only_portfolio_kinds_are_cards() {
    assert!(ElementKind::ProjectCard.is_card());
    assert!(ElementKind::AchievementCard.is_card());
    assert!(!ElementKind::Note.is_card());
    assert!(!ElementKind::Connector.is_card());
}

#[test]
fn kind_serializes_kebab_case() {
    assert_eq!(serde_json::to_value(ElementKind::ProjectCard).unwrap(), json!("project-card"));
    let kind: ElementKind = serde_json::from_value(json!("skill-card")).unwrap();
    assert_eq!(kind, ElementKind::SkillCard);
}

// =============================================================
// add
// =============================================================

#[test]
fn first_element_gets_z_index_one() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    assert_eq!(e.z_index, 1);
    assert_eq!(s.len(), 1);
}

#[test]
fn add_uses_kind_defaults() {
    let mut s = scene();
    let e = s.add(ElementKind::Text);
    assert_eq!(e.size, Size::new(300.0, 100.0));
    assert_eq!(e.content, "Click to edit text");
    assert_eq!(e.color, "#FFFFFF");
    assert_eq!(e.rotation, 0.0);
}

#[test]
fn card_gets_description_metadata() {
    let mut s = scene();
    let e = s.add(ElementKind::ProjectCard);
    assert_eq!(e.metadata["description"], json!("Add your project details here..."));
}

#[test]
fn add_places_element_inside_spawn_region() {
    let mut s = Scene::new().with_seed(99).with_spawn(Point::new(50.0, 50.0), 200.0);
    for _ in 0..50 {
        let e = s.add(ElementKind::Shape);
        assert!((50.0..250.0).contains(&e.position.x), "x = {}", e.position.x);
        assert!((50.0..250.0).contains(&e.position.y), "y = {}", e.position.y);
    }
}

#[test]
fn zero_spawn_extent_places_at_origin() {
    let mut s = Scene::new().with_spawn(Point::new(30.0, 40.0), 0.0);
    let e = s.add(ElementKind::Note);
    assert_eq!(e.position, Point::new(30.0, 40.0));
}

#[test]
fn same_seed_gives_same_positions() {
    let mut a = Scene::new().with_seed(1234);
    let mut b = Scene::new().with_seed(1234);
    assert_eq!(a.add(ElementKind::Note).position, b.add(ElementKind::Note).position);
}

#[test]
fn successive_adds_stack_upwards() {
    let mut s = scene();
    s.add(ElementKind::Note);
    s.add(ElementKind::Shape);
    let top = s.add(ElementKind::Image);
    assert_eq!(z_indices(&s), vec![1, 2, 3]);
    assert_eq!(s.max_z_index(), top.z_index);
}

#[test]
fn add_after_removing_top_reuses_next_above_max() {
    let mut s = scene();
    s.add(ElementKind::Note);
    let top = s.add(ElementKind::Note);
    s.remove(&top.id);
    let e = s.add(ElementKind::Note);
    assert_eq!(e.z_index, 2);
}

// =============================================================
// remove
// =============================================================

#[test]
fn remove_selected_clears_selection() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    assert!(s.select(Some(e.id)));
    s.remove(&e.id);
    assert!(s.selected_id().is_none());
    assert!(s.is_empty());
}

#[test]
fn remove_other_element_keeps_selection() {
    let mut s = scene();
    let a = s.add(ElementKind::Note);
    let b = s.add(ElementKind::Note);
    s.select(Some(a.id));
    s.remove(&b.id);
    assert_eq!(s.selected_id(), Some(a.id));
}

#[test]
fn remove_unknown_id_is_noop() {
    let mut s = scene();
    s.add(ElementKind::Note);
    assert!(s.remove(&Uuid::new_v4()).is_none());
    assert_eq!(s.len(), 1);
}

#[test]
fn remove_twice_is_idempotent() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    assert!(s.remove(&e.id).is_some());
    assert!(s.remove(&e.id).is_none());
}

// =============================================================
// duplicate
// =============================================================

#[test]
fn duplicate_copies_payload_under_new_id_on_top() {
    let mut s = scene();
    let original = s.add(ElementKind::Note);
    s.add(ElementKind::Shape);
    let copy = s.duplicate(&original.id).unwrap();
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.z_index, 3);
    assert_eq!(copy.position, original.position);
    assert_eq!(copy.size, original.size);
    assert_eq!(copy.content, original.content);
    assert_eq!(s.len(), 3);
}

#[test]
fn duplicate_unknown_is_none() {
    let mut s = scene();
    assert!(s.duplicate(&Uuid::new_v4()).is_none());
}

// =============================================================
// bring_to_front
// =============================================================

#[test]
fn bring_to_front_takes_max_plus_one() {
    let mut s = scene();
    let a = s.add(ElementKind::Note);
    s.add(ElementKind::Shape);
    s.add(ElementKind::Text);
    assert_eq!(s.bring_to_front(&a.id), Some(4));
    assert_eq!(s.elements().last().map(|e| e.id), Some(a.id));
    assert!(s.check_invariants().is_ok());
}

#[test]
fn bring_to_front_of_top_element_keeps_index() {
    let mut s = scene();
    s.add(ElementKind::Note);
    let top = s.add(ElementKind::Shape);
    assert_eq!(s.bring_to_front(&top.id), Some(2));
    assert_eq!(s.max_z_index(), 2);
}

#[test]
fn bring_to_front_unknown_is_none() {
    let mut s = scene();
    s.add(ElementKind::Note);
    assert!(s.bring_to_front(&Uuid::new_v4()).is_none());
}

// =============================================================
// mutate
// =============================================================

#[test]
fn mutate_merges_present_fields_only() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    let patch = ElementPatch { color: Some("#FCA5A5".into()), rotation: Some(15.0), ..Default::default() };
    assert!(s.mutate(&e.id, &patch));
    let after = s.get(&e.id).unwrap();
    assert_eq!(after.color, "#FCA5A5");
    assert_eq!(after.rotation, 15.0);
    assert_eq!(after.content, e.content);
    assert_eq!(after.position, e.position);
    assert_eq!(after.z_index, e.z_index);
}

#[test]
fn mutate_unknown_id_returns_false() {
    let mut s = scene();
    assert!(!s.mutate(&Uuid::new_v4(), &ElementPatch::content("x")));
}

#[test]
fn mutate_clamps_negative_and_nan_positions() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    s.mutate(&e.id, &ElementPatch::position(Point::new(-20.0, f64::NAN)));
    assert_eq!(s.get(&e.id).unwrap().position, Point::new(0.0, 0.0));
}

#[test]
fn mutate_metadata_merges_and_null_deletes() {
    let mut s = scene();
    let e = s.add(ElementKind::ProjectCard);
    let patch = ElementPatch { metadata: Some(json!({"description": null, "link": "https://example.com"})), ..Default::default() };
    s.mutate(&e.id, &patch);
    let meta = &s.get(&e.id).unwrap().metadata;
    assert!(meta.get("description").is_none());
    assert_eq!(meta["link"], json!("https://example.com"));
}

#[test]
fn mutate_ignores_non_finite_rotation() {
    let mut s = scene();
    let e = s.add(ElementKind::Shape);
    s.mutate(&e.id, &ElementPatch { rotation: Some(f64::INFINITY), ..Default::default() });
    assert_eq!(s.get(&e.id).unwrap().rotation, 0.0);
}

#[test]
fn patch_json_skips_absent_fields() {
    let v = serde_json::to_value(ElementPatch::color("#000000")).unwrap();
    assert_eq!(v, json!({"color": "#000000"}));
}

// =============================================================
// select
// =============================================================

#[test]
fn select_reports_change() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    assert!(s.select(Some(e.id)));
    assert!(!s.select(Some(e.id)));
    assert!(s.select(None));
    assert!(!s.select(None));
}

#[test]
fn select_unknown_id_leaves_selection() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    s.select(Some(e.id));
    assert!(!s.select(Some(Uuid::new_v4())));
    assert_eq!(s.selected_id(), Some(e.id));
}

#[test]
fn selected_returns_element() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    assert!(s.selected().is_none());
    s.select(Some(e.id));
    assert_eq!(s.selected().map(|el| el.id), Some(e.id));
}

// =============================================================
// Invariants
// =============================================================

#[test]
fn z_indices_stay_unique_over_mixed_sequences() {
    let mut s = scene();
    let mut ids: Vec<ElementId> = Vec::new();
    // Deterministic pseudo-random op stream (LCG) over add / remove / duplicate.
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..400 {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let pick = (state >> 33) as usize;
        match pick % 3 {
            0 => {
                let e = s.add(ElementKind::ALL[pick % ElementKind::ALL.len()]);
                assert_eq!(e.z_index, s.max_z_index());
                ids.push(e.id);
            }
            1 if !ids.is_empty() => {
                let id = ids.swap_remove(pick % ids.len());
                s.remove(&id);
            }
            2 if !ids.is_empty() => {
                let source = ids[pick % ids.len()];
                let copy = s.duplicate(&source).unwrap();
                assert_eq!(copy.z_index, s.max_z_index());
                ids.push(copy.id);
            }
            _ => {}
        }
        assert!(s.check_invariants().is_ok());
        let z = z_indices(&s);
        let mut dedup = z.clone();
        dedup.dedup();
        assert_eq!(z, dedup);
    }
}

#[test]
fn load_snapshot_sorts_by_z_index() {
    let mut s = scene();
    let a = make_element(ElementKind::Note, 5);
    let b = make_element(ElementKind::Shape, 2);
    s.load_snapshot(vec![a.clone(), b.clone()]);
    let ids: Vec<_> = s.elements().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
    assert_eq!(z_indices(&s), vec![2, 5]);
}

#[test]
fn load_snapshot_heals_duplicate_z_indices() {
    let mut s = scene();
    let a = make_element(ElementKind::Note, 3);
    let b = make_element(ElementKind::Shape, 3);
    let c = make_element(ElementKind::Text, 1);
    s.load_snapshot(vec![a.clone(), b.clone(), c.clone()]);
    assert_eq!(z_indices(&s), vec![1, 2, 3]);
    let ids: Vec<_> = s.elements().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
    assert!(s.check_invariants().is_ok());
}

#[test]
fn load_snapshot_heals_invalid_geometry() {
    let mut s = scene();
    let mut e = make_element(ElementKind::SkillCard, 1);
    e.size = Size::new(-5.0, f64::NAN);
    e.position = Point::new(-12.0, 40.0);
    s.load_snapshot(vec![e.clone()]);
    let healed = s.get(&e.id).unwrap();
    assert_eq!(healed.size, ElementKind::SkillCard.defaults().size);
    assert_eq!(healed.position, Point::new(0.0, 40.0));
}

#[test]
fn add_after_maximal_z_index_renumbers() {
    let mut s = scene();
    let top = make_element(ElementKind::Note, i64::MAX);
    s.load_snapshot(vec![top.clone()]);
    let added = s.add(ElementKind::Note);
    assert_eq!(s.get(&top.id).map(|e| e.z_index), Some(1));
    assert_eq!(added.z_index, 2);
    assert_eq!(z_indices(&s), vec![1, 2]);
    assert!(s.check_invariants().is_ok());
}

#[test]
fn duplicate_and_raise_after_maximal_z_index_renumber() {
    let mut s = scene();
    let low = make_element(ElementKind::Shape, 4);
    let top = make_element(ElementKind::Note, i64::MAX);
    s.load_snapshot(vec![low.clone(), top.clone()]);

    assert_eq!(s.bring_to_front(&low.id), Some(3));
    assert_eq!(z_indices(&s), vec![2, 3]);

    let mut s = scene();
    s.load_snapshot(vec![low.clone(), top.clone()]);
    let copy = s.duplicate(&top.id).unwrap();
    assert_eq!(copy.z_index, 3);
    assert!(s.check_invariants().is_ok());
}

#[test]
fn load_snapshot_reissues_repeated_ids() {
    let mut s = scene();
    let first = make_element(ElementKind::Note, 1);
    let mut twin = make_element(ElementKind::Shape, 2);
    twin.id = first.id;
    s.load_snapshot(vec![first.clone(), twin]);

    assert!(s.check_invariants().is_ok());
    assert_eq!(s.len(), 2);
    let ids: Vec<_> = s.elements().iter().map(|e| e.id).collect();
    assert_eq!(ids[0], first.id);
    assert_ne!(ids[1], first.id);

    s.remove(&first.id);
    assert_eq!(s.len(), 1);
    assert!(s.get(&first.id).is_none());
}

#[test]
fn check_invariants_reports_duplicate_id() {
    let mut s = scene();
    let a = make_element(ElementKind::Note, 1);
    let mut b = make_element(ElementKind::Note, 2);
    b.id = a.id;
    s.elements = vec![a.clone(), b];
    assert_eq!(s.check_invariants(), Err(InvariantViolation::DuplicateId(a.id)));
}

#[test]
fn check_invariants_reports_duplicate_z_index() {
    let mut s = scene();
    s.elements = vec![make_element(ElementKind::Note, 1), make_element(ElementKind::Note, 1)];
    assert!(matches!(s.check_invariants(), Err(InvariantViolation::DuplicateZIndex { z_index: 1, .. })));
}

#[test]
fn check_invariants_reports_dangling_selection() {
    let mut s = scene();
    let ghost = Uuid::new_v4();
    s.selected_id = Some(ghost);
    assert_eq!(s.check_invariants(), Err(InvariantViolation::DanglingSelection(ghost)));
    s.heal();
    assert!(s.selected_id().is_none());
}

#[test]
fn violation_messages_name_the_problem() {
    let id = Uuid::nil();
    let msg = InvariantViolation::InvalidSize { id, width: -1.0, height: 2.0 }.to_string();
    assert!(msg.contains("invalid size"));
}

// =============================================================
// Serialisation
// =============================================================

#[test]
fn to_json_is_ordered_array() {
    let mut s = scene();
    let a = s.add(ElementKind::Note);
    let b = s.add(ElementKind::Shape);
    let v: serde_json::Value = serde_json::from_str(&s.to_json().unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["id"], json!(a.id.to_string()));
    assert_eq!(arr[1]["id"], json!(b.id.to_string()));
    assert_eq!(arr[1]["z_index"], json!(2));
}

#[test]
fn element_round_trips_through_json() {
    let mut s = Scene::new().with_spawn(Point::new(120.0, 80.0), 0.0);
    let e = s.add(ElementKind::StoryCard);
    let back: Element = serde_json::from_str(&serde_json::to_string(&e).unwrap()).unwrap();
    assert_eq!(back, e);
}

#[test]
fn clear_empties_scene_and_selection() {
    let mut s = scene();
    let e = s.add(ElementKind::Note);
    s.select(Some(e.id));
    s.clear();
    assert!(s.is_empty());
    assert!(s.selected_id().is_none());
}
