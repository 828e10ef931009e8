mod derive_blueprint;

use derive_blueprint::DeriveBlueprint;
use proc_macro::TokenStream;
use quote::ToTokens;
use syn::parse_macro_input;

/// Derive macro implementing the [Blueprint](https://docs.rs/autowire/latest/autowire/blueprint/trait.Blueprint.html) trait from a struct's fields.
///
/// Every field of type `Arc<T>` becomes a constructor parameter resolved from the registry entry
/// for `T`, named after the field. Fields are declared in order, so the dependency list matches
/// the struct definition.
///
/// The `#[blueprint(name = "...")]` attribute changes the parameter name of a field.
///
/// The `#[blueprint(default)]` attribute excludes a field from the dependencies and initializes it
/// with [`Default::default`]. Fields that are not `Arc<T>` must be marked this way.
///
/// Unit structs have no dependencies. Tuple structs, enums and unions are rejected.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use autowire::Blueprint;
///
/// #[derive(Blueprint)]
/// struct ImageDriver {
///     proc: Arc<ImageProcessor>,
///     #[blueprint(name = "source")]
///     image: Arc<Image>,
///     #[blueprint(default)]
///     frames: u64,
/// }
/// ```
///
/// <details>
/// <summary>See expanded code</summary>
///
/// ```ignore
/// impl ::autowire::Blueprint for ImageDriver {
///     fn dependencies() -> Vec<::autowire::Dependency> {
///         vec![
///             ::autowire::Dependency::new::<ImageProcessor>("proc"),
///             ::autowire::Dependency::new::<Image>("source"),
///         ]
///     }
///
///     fn construct(args: &mut ::autowire::Arguments) -> ::autowire::error::Result<Self> {
///         Ok(Self {
///             proc: args.take::<ImageProcessor>("proc")?,
///             image: args.take::<Image>("source")?,
///             frames: Default::default(),
///         })
///     }
/// }
/// ```
/// </details>
#[proc_macro_derive(Blueprint, attributes(blueprint))]
pub fn derive_blueprint(input: TokenStream) -> TokenStream {
    let derive_blueprint = parse_macro_input!(input as DeriveBlueprint);
    TokenStream::from(derive_blueprint.into_token_stream())
}
