use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    spanned::Spanned,
    Data, DeriveInput, Fields, GenericArgument, Generics, Ident, LitStr, PathArguments, Type,
};

pub struct DeriveBlueprint {
    ident: Ident,
    generics: Generics,
    shape: Shape,
}

enum Shape {
    Unit,
    Named(Vec<BlueprintField>),
}

struct BlueprintField {
    ident: Ident,
    kind: FieldKind,
}

enum FieldKind {
    Dependency { name: LitStr, inner: Type },
    Default,
}

impl ToTokens for DeriveBlueprint {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        let Self {
            ident,
            generics,
            shape,
        } = self;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let (dependencies, construct) = match shape {
            Shape::Unit => (Vec::new(), quote! { Self }),
            Shape::Named(fields) => {
                let dependencies: Vec<_> = fields
                    .iter()
                    .filter_map(|field| match &field.kind {
                        FieldKind::Dependency { name, inner } => Some(quote! {
                            ::autowire::Dependency::new::<#inner>(#name)
                        }),
                        FieldKind::Default => None,
                    })
                    .collect();
                let inits = fields.iter().map(|field| {
                    let field_ident = &field.ident;
                    match &field.kind {
                        FieldKind::Dependency { name, inner } => quote! {
                            #field_ident: args.take::<#inner>(#name)?
                        },
                        FieldKind::Default => quote! {
                            #field_ident: ::std::default::Default::default()
                        },
                    }
                });
                (dependencies, quote! { Self { #( #inits ),* } })
            }
        };

        tokens.extend(quote! {
            #[automatically_derived]
            impl #impl_generics ::autowire::Blueprint for #ident #ty_generics #where_clause {
                fn dependencies() -> ::std::vec::Vec<::autowire::Dependency> {
                    ::std::vec![ #( #dependencies ),* ]
                }

                #[allow(unused_variables)]
                fn construct(
                    args: &mut ::autowire::Arguments,
                ) -> ::autowire::error::Result<Self> {
                    ::std::result::Result::Ok(#construct)
                }
            }
        });
    }
}

impl Parse for DeriveBlueprint {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let input: DeriveInput = input.parse()?;
        let ident = input.ident;
        let generics = input.generics;

        let shape = match input.data {
            Data::Struct(data) => match data.fields {
                Fields::Unit => Shape::Unit,
                Fields::Named(fields) => Shape::Named(
                    fields
                        .named
                        .into_iter()
                        .map(BlueprintField::from_field)
                        .collect::<syn::Result<_>>()?,
                ),
                Fields::Unnamed(fields) => {
                    return Err(syn::Error::new(
                        fields.span(),
                        "Blueprint can only be derived for structs with named fields",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "Blueprint can only be derived for structs",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "Blueprint can only be derived for structs",
                ));
            }
        };

        Ok(DeriveBlueprint {
            ident,
            generics,
            shape,
        })
    }
}

impl BlueprintField {
    fn from_field(field: syn::Field) -> syn::Result<Self> {
        let span = field.span();
        let ident = field
            .ident
            .ok_or_else(|| syn::Error::new(span, "expected a named field"))?;

        let mut name = None;
        let mut default = false;
        for attr in &field.attrs {
            if !attr.path().is_ident("blueprint") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    if default {
                        return Err(meta.error("default already set"));
                    }
                    default = true;
                    Ok(())
                } else if meta.path.is_ident("name") {
                    if name.is_some() {
                        return Err(meta.error("name already set"));
                    }
                    name = Some(meta.value()?.parse::<LitStr>()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `default` or `name = \"...\"`"))
                }
            })?;
        }

        if default {
            if let Some(name) = name {
                return Err(syn::Error::new(
                    name.span(),
                    "a defaulted field is not a dependency and cannot be named",
                ));
            }
            return Ok(BlueprintField {
                ident,
                kind: FieldKind::Default,
            });
        }

        let inner = arc_inner(&field.ty).ok_or_else(|| {
            syn::Error::new(
                field.ty.span(),
                "dependency fields must be `Arc<T>`; use #[blueprint(default)] for other fields",
            )
        })?;
        let name = name.unwrap_or_else(|| {
            let unraw = ident.to_string();
            LitStr::new(unraw.trim_start_matches("r#"), ident.span())
        });

        Ok(BlueprintField {
            ident,
            kind: FieldKind::Dependency { name, inner },
        })
    }
}

fn arc_inner(ty: &Type) -> Option<Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    let inner = types.next()?;
    if types.next().is_some() {
        return None;
    }

    Some(inner.clone())
}
