use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type};

pub fn derive_versionable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let (custom_type_name, id_field_name) = parse_struct_attrs(&input);
    let type_name = custom_type_name.unwrap_or_else(|| name.to_string());
    let id_field = format_ident!("{}", id_field_name);

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Versionable derive only supports structs with named fields"),
        },
        _ => panic!("Versionable derive only supports structs"),
    };

    let mut has_id = false;
    let mut properties = Vec::new();
    for field in fields {
        let ident = field.ident.as_ref().unwrap();

        if *ident == id_field {
            has_id = true;
            continue;
        }

        if has_skip(&field.attrs) {
            continue;
        }

        properties.push((ident.clone(), attribute_kind(&field.ty)));
    }

    if !has_id {
        panic!(
            "Versionable derive: no identity field named `{}` (use #[versionable(id = \"...\")])",
            id_field_name
        );
    }

    let property_defs: Vec<_> = properties
        .iter()
        .map(|(ident, kind)| {
            let attr = ident.to_string();
            quote! { versioned_rust::Property::new(#attr, versioned_rust::AttributeKind::#kind) }
        })
        .collect();

    let read_arms: Vec<_> = properties
        .iter()
        .map(|(ident, _)| {
            let attr = ident.to_string();
            quote! { #attr => versioned_rust::encode_attribute(&self.#ident), }
        })
        .collect();

    let write_arms: Vec<_> = properties
        .iter()
        .map(|(ident, _)| {
            let attr = ident.to_string();
            quote! {
                #attr => {
                    self.#ident = versioned_rust::decode_attribute(#attr, value)?;
                    Ok(())
                }
            }
        })
        .collect();

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics versioned_rust::Versionable for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn id(&self) -> String {
                self.#id_field.to_string()
            }

            fn properties() -> &'static [versioned_rust::Property] {
                const PROPERTIES: &[versioned_rust::Property] = &[#(#property_defs),*];
                PROPERTIES
            }

            fn read_attribute(&self, name: &str) -> Option<versioned_rust::Value> {
                match name {
                    #(#read_arms)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn write_attribute(
                &mut self,
                name: &str,
                value: versioned_rust::Value,
            ) -> Result<(), versioned_rust::AttributeError> {
                match name {
                    #(#write_arms)*
                    _ => Err(versioned_rust::AttributeError::Unknown {
                        entity_type: #type_name.to_string(),
                        attribute: name.to_string(),
                    }),
                }
            }
        }
    };

    TokenStream::from(expanded)
}

fn parse_struct_attrs(input: &DeriveInput) -> (Option<String>, String) {
    let mut type_name: Option<String> = None;
    let mut id_field = "id".to_string();

    for attr in &input.attrs {
        if !attr.path().is_ident("versionable") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("type_name") {
                let value: LitStr = meta.value()?.parse()?;
                type_name = Some(value.value());
            } else if meta.path.is_ident("id") {
                let value: LitStr = meta.value()?.parse()?;
                id_field = value.value();
            }
            Ok(())
        });
    }

    (type_name, id_field)
}

fn has_skip(attrs: &[syn::Attribute]) -> bool {
    for attr in attrs {
        if !attr.path().is_ident("versionable") && !attr.path().is_ident("serde") {
            continue;
        }

        let mut found_skip = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                found_skip = true;
            }
            Ok(())
        });

        if found_skip {
            return true;
        }
    }
    false
}

/// Map a field type onto an `AttributeKind` variant name.
fn attribute_kind(ty: &Type) -> Ident {
    let kind = match ty {
        Type::Reference(reference) => return attribute_kind(&reference.elem),
        Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => match segment.ident.to_string().as_str() {
                "String" | "str" | "char" => "String",
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
                | "u64" | "u128" | "usize" => "Integer",
                "f32" | "f64" => "Float",
                "bool" => "Boolean",
                "Option" => {
                    if let PathArguments::AngleBracketed(args) = &segment.arguments {
                        if let Some(GenericArgument::Type(inner)) = args.args.first() {
                            return attribute_kind(inner);
                        }
                    }
                    "Json"
                }
                _ => "Json",
            },
            None => "Json",
        },
        _ => "Json",
    };
    format_ident!("{}", kind)
}
