//! Lifecycle of the process-wide registries.
//!
//! Every test here touches shared global state, so they run one at a time behind `SERIAL`.

use std::sync::{Arc, Mutex};

use autowire::{
    global::{self, lock},
    Blueprint, CacheConfig, Registration,
};

static SERIAL: Mutex<()> = Mutex::new(());

#[derive(Debug)]
struct Image {
    file: String,
}

#[derive(Blueprint)]
struct ImageProcessor {
    image: Arc<Image>,
}

#[test]
fn get_instance_returns_the_same_registry_until_flushed() {
    let _serial = lock(&SERIAL);
    global::flush();

    fn register() {
        let cache = global::get_instance(CacheConfig::default());
        lock(&cache)
            .insert(Registration::instance(Image {
                file: "image.png".into(),
            }))
            .unwrap();
    }

    register();

    let cache = global::get_instance(CacheConfig::default());
    assert!(Arc::ptr_eq(&cache, &global::get_instance(CacheConfig::default())));
    assert_eq!(lock(&cache).get::<Image>().unwrap().file, "image.png");

    global::flush();
    let fresh = global::get_instance(CacheConfig::default());
    assert!(!Arc::ptr_eq(&cache, &fresh));
    assert!(lock(&fresh).is_empty());
    assert!(lock(&fresh).get::<Image>().unwrap_err().is_not_found());
}

#[test]
fn config_applies_only_when_the_registry_is_created() {
    let _serial = lock(&SERIAL);
    global::flush();

    let cache = global::get_instance(CacheConfig::lazy());
    assert!(lock(&cache).is_lazy());
    assert!(lock(&global::get_instance(CacheConfig::eager())).is_lazy());

    // Lazy mode defers the missing `Image` until lookup.
    lock(&cache).add_blueprint::<ImageProcessor>().unwrap();
    assert!(lock(&cache).get::<ImageProcessor>().is_err());

    global::flush();
    assert!(!lock(&global::get_instance(CacheConfig::eager())).is_lazy());
    global::flush();
}

#[test]
fn provider_instance_lifecycle() {
    let _serial = lock(&SERIAL);
    global::flush_providers();

    let providers = global::provider_instance();
    lock(&providers)
        .assign(Arc::new(Image {
            file: "image.png".into(),
        }))
        .unwrap();
    assert!(Arc::ptr_eq(&providers, &global::provider_instance()));
    assert_eq!(
        lock(&global::provider_instance())
            .get::<Image>()
            .unwrap()
            .file,
        "image.png"
    );

    global::flush_providers();
    let fresh = global::provider_instance();
    assert!(!Arc::ptr_eq(&providers, &fresh));
    assert!(lock(&fresh).is_empty());
}
