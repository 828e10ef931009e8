use std::sync::Arc;

use autowire::{global, Blueprint, CacheConfig, Registration, Substitute};
use tracing::info;
use tracing_subscriber::EnvFilter;

trait Storage: Send + Sync {
    fn load(&self, file: &str) -> Vec<u8>;
}

struct DiskStorage;

impl Storage for DiskStorage {
    fn load(&self, file: &str) -> Vec<u8> {
        file.bytes().collect()
    }
}

struct InMemoryStorage;

impl Storage for InMemoryStorage {
    fn load(&self, _file: &str) -> Vec<u8> {
        vec![0; 4]
    }
}

struct Image {
    file: String,
}

#[derive(Blueprint)]
struct ImageProcessor {
    image: Arc<Image>,
    storage: Arc<dyn Storage>,
}

impl ImageProcessor {
    fn process(&self) -> usize {
        self.storage.load(&self.image.file).len()
    }
}

#[derive(Blueprint)]
struct ImageDriver {
    proc: Arc<ImageProcessor>,
    image: Arc<Image>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("debug".parse::<EnvFilter>()?)
        .without_time()
        .with_target(false)
        .init();

    let config = CacheConfig::from_env();
    let cache = global::get_instance(config);
    {
        let mut cache = global::lock(&cache);
        cache
            .insert(Registration::instance(Image {
                file: "image.png".into(),
            }))?
            .assign::<dyn Storage>(Arc::new(DiskStorage))?
            .add_blueprint::<ImageProcessor>()?
            .add_blueprint::<ImageDriver>()?;

        let driver = cache.get::<ImageDriver>()?;
        info!(file = %driver.image.file, bytes = driver.proc.process(), "processed from disk");
    }

    // Start over with the storage swapped for an in-memory double.
    global::flush();
    let cache = global::get_instance(config);
    let mut cache = global::lock(&cache);
    cache
        .insert(Substitute::new::<dyn Storage>(Arc::new(InMemoryStorage)))?
        .insert(Registration::instance(Image {
            file: "image.png".into(),
        }))?
        .add_blueprint::<ImageProcessor>()?
        .add_blueprint::<ImageDriver>()?;

    let driver = cache.get::<ImageDriver>()?;
    info!(file = %driver.image.file, bytes = driver.proc.process(), "processed from memory");

    Ok(())
}
