use std::sync::Arc;

use autowire::{error::RegistryError, Instance, ProviderCache, Substitute, TypeKey};

#[derive(Debug)]
struct Image {
    file: String,
}

impl Image {
    fn new(file: &str) -> Self {
        Image { file: file.into() }
    }
}

trait Picture: Send + Sync {
    fn file(&self) -> &str;
}

impl Picture for Image {
    fn file(&self) -> &str {
        &self.file
    }
}

struct RgbImage(Image);

impl Picture for RgbImage {
    fn file(&self) -> &str {
        &self.0.file
    }
}

#[test]
fn add_dependency_by_insert() {
    let mut providers = ProviderCache::new();
    providers.insert(Instance::new(Image::new("image.png"))).unwrap();

    assert!(providers.contains::<Image>());
    assert_eq!(providers.get::<Image>().unwrap().file, "image.png");
}

#[test]
fn add_dependency_by_assign() {
    let mut providers = ProviderCache::new();
    let image = Arc::new(Image::new("image.png"));
    providers.assign(image.clone()).unwrap();

    assert!(Arc::ptr_eq(&providers.get::<Image>().unwrap(), &image));
}

#[test]
fn assign_with_wrong_type() {
    let mut providers = ProviderCache::new();
    let err = providers
        .assign_erased(TypeKey::of::<Image>(), Instance::new(1i32))
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "value of type `i32` cannot be set under type `{}`",
            std::any::type_name::<Image>()
        )
    );
}

#[test]
fn add_dependency_under_parent_trait() {
    let mut providers = ProviderCache::new();
    providers
        .assign::<dyn Picture>(Arc::new(RgbImage(Image::new("image.png"))))
        .unwrap();

    assert_eq!(providers.get::<dyn Picture>().unwrap().file(), "image.png");
    assert!(matches!(
        providers.get::<Image>().unwrap_err(),
        RegistryError::NotFound { .. }
    ));
}

#[test]
fn overwrite_added_dependency() {
    let mut providers = ProviderCache::new();
    providers.assign(Arc::new(Image::new("image.png"))).unwrap();
    providers.assign(Arc::new(Image::new("image2.png"))).unwrap();

    assert_eq!(providers.get::<Image>().unwrap().file, "image2.png");
}

#[test]
fn substitute_replaces_instance() {
    let mut providers = ProviderCache::new();
    providers.assign(Arc::new(Image::new("image.png"))).unwrap();
    providers
        .insert(Substitute::of::<Image, _>(String::from("mock")))
        .unwrap();

    let erased = providers.get_erased(TypeKey::of::<Image>()).unwrap();
    assert_eq!(*erased.downcast::<String>().unwrap(), "mock");
    assert!(matches!(
        providers.get::<Image>().unwrap_err(),
        RegistryError::TypeMismatch { .. }
    ));
}

#[test]
fn remove_dependency() {
    let mut providers = ProviderCache::new();
    providers.assign(Arc::new(Image::new("image.png"))).unwrap();
    providers.remove::<Image>().unwrap();

    assert!(providers.get::<Image>().unwrap_err().is_not_found());
    assert!(providers.is_empty());
}
