use super::*;

#[test]
fn reset_removes_meshes_and_their_materials() {
    let mut scene = Scene::base();
    let report = reset_scene(&mut scene);
    assert_eq!(
        report,
        ResetReport {
            meshes_removed: 1,
            materials_purged: 1,
        }
    );
    assert_eq!(scene.count_of(ObjectKind::Mesh), 0);
    assert_eq!(scene.material_count(), 0);
    assert_eq!(scene.count_of(ObjectKind::Camera), 1);
    assert_eq!(scene.count_of(ObjectKind::Light), 1);
}

#[test]
fn reset_is_idempotent() {
    let mut once = Scene::base();
    reset_scene(&mut once);

    let mut twice = Scene::base();
    reset_scene(&mut twice);
    let rev = twice.revision();
    assert_eq!(reset_scene(&mut twice), ResetReport::default());
    assert_eq!(twice.revision(), rev);

    assert_eq!(once.objects(), twice.objects());
    assert_eq!(once.material_count(), twice.material_count());
}

#[test]
fn reset_on_empty_scene_is_a_no_op() {
    let mut scene = Scene::empty();
    assert_eq!(reset_scene(&mut scene), ResetReport::default());
    assert_eq!(scene.revision(), 0);
}
