use std::sync::Arc;

use autowire::{AutoWiredCache, Blueprint, CacheConfig, Dependency, Registration};

struct Image {
    file: String,
}

struct Palette;

#[derive(Blueprint)]
struct Unit;

#[derive(Blueprint)]
struct Renderer {
    #[blueprint(name = "source")]
    image: Arc<Image>,
    palette: std::sync::Arc<Palette>,
    #[blueprint(default)]
    frames: u64,
    #[blueprint(default)]
    label: String,
}

#[derive(Blueprint)]
struct Raw {
    r#type: Arc<Palette>,
}

#[test]
fn unit_struct_has_no_dependencies() {
    assert!(Unit::dependencies().is_empty());

    let mut cache = AutoWiredCache::default();
    cache.add_blueprint::<Unit>().unwrap();
    let first = cache.get::<Unit>().unwrap();
    assert!(Arc::ptr_eq(&first, &cache.get::<Unit>().unwrap()));
}

#[test]
fn fields_are_declared_in_order() {
    assert_eq!(
        Renderer::dependencies(),
        vec![
            Dependency::new::<Image>("source"),
            Dependency::new::<Palette>("palette"),
        ]
    );
    assert_eq!(Raw::dependencies(), vec![Dependency::new::<Palette>("type")]);
}

#[test]
fn derived_blueprint_is_constructed() {
    let mut cache = AutoWiredCache::new(CacheConfig::lazy());
    cache
        .insert(Registration::instance(Image {
            file: "image.png".into(),
        }))
        .unwrap()
        .insert(Registration::instance(Palette))
        .unwrap()
        .add_blueprint::<Renderer>()
        .unwrap()
        .add_blueprint::<Raw>()
        .unwrap();

    let renderer = cache.get::<Renderer>().unwrap();
    assert_eq!(renderer.image.file, "image.png");
    assert_eq!(renderer.frames, 0);
    assert!(renderer.label.is_empty());

    let raw = cache.get::<Raw>().unwrap();
    assert!(Arc::ptr_eq(&raw.r#type, &renderer.palette));
}
