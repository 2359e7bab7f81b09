use darling::{FromDeriveInput, FromField, ast};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Generics, Ident};

#[derive(FromDeriveInput)]
#[darling(supports(struct_named, struct_unit))]
pub struct TaggedInput {
    ident: Ident,
    generics: Generics,
    data: ast::Data<(), TaggedField>,
}

#[derive(FromField)]
#[darling(attributes(tag))]
struct TaggedField {
    ident: Option<Ident>,
    #[darling(default)]
    dep: Option<String>,
}

/// A field paired with the dependency it receives.
struct Injection<'a> {
    ident: &'a Ident,
    field: String,
    dependency: &'a str,
}

impl TaggedInput {
    pub fn expand(self) -> darling::Result<TokenStream> {
        let fields = self
            .data
            .as_ref()
            .take_struct()
            .ok_or_else(|| darling::Error::unsupported_shape("enum"))?;

        let injections: Vec<Injection<'_>> = fields
            .iter()
            .filter_map(|field| {
                let ident = field.ident.as_ref()?;
                let dependency = field.dep.as_deref()?;
                Some(Injection {
                    ident,
                    field: ident.unraw().to_string(),
                    dependency,
                })
            })
            .collect();

        let directives = injections.iter().map(|Injection { field, dependency, .. }| {
            quote! {
                ::sanduq::Directive { field: #field, dependency: #dependency }
            }
        });

        let arms = injections.iter().map(|Injection { ident, field, .. }| {
            quote! {
                #field => {
                    self.#ident = ::sanduq::FromValue::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            }
        });

        let ident = &self.ident;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        // Generic types have no single TypeId to submit.
        let submission = self.generics.params.is_empty().then(|| {
            quote! {
                ::sanduq::__private::inventory::submit! {
                    ::sanduq::TagTable::of::<#ident>()
                }
            }
        });

        Ok(quote! {
            #[automatically_derived]
            impl #impl_generics ::sanduq::Tagged for #ident #ty_generics #where_clause {
                const DIRECTIVES: &'static [::sanduq::Directive] = &[#(#directives),*];

                #[allow(unused_variables)]
                fn assign(
                    &mut self,
                    field: &str,
                    value: ::sanduq::Value,
                ) -> ::sanduq::Result<()> {
                    match field {
                        #(#arms)*
                        other => ::core::result::Result::Err(::sanduq::ContainerError::UnknownField {
                            target: ::core::any::type_name::<Self>(),
                            field: ::std::borrow::ToOwned::to_owned(other),
                        }),
                    }
                }
            }

            #submission
        })
    }
}
