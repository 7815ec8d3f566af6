//! Code generation for the Model trait

use crate::parsing::RecordInfo;
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub fn generate_model_impl(input: &DeriveInput, info: &RecordInfo) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // parse_record guarantees both
    let (Some(id), Some(timestamps)) = (&info.id_field, &info.timestamps_field) else {
        return quote! {};
    };

    let required_checks = info.required_fields.iter().map(|field| {
        let label = field.to_string();
        quote! { validation.required(#label, &self.#field); }
    });

    let custom_validation = info.validate_with.as_ref().map(|path| {
        quote! { #path(self, validation); }
    });

    let custom_model_name = info.name.as_ref().map(|model_name| {
        quote! {
            fn custom_model_name() -> ::core::option::Option<&'static str>
            where
                Self: Sized,
            {
                ::core::option::Option::Some(#model_name)
            }
        }
    });

    let before_save_hook = (info.before_save || info.generate_id).then(|| {
        quote! {
            fn before_save_hook(&mut self) -> ::core::option::Option<&mut dyn ::activehaus::record_object::BeforeSave> {
                ::core::option::Option::Some(self)
            }
        }
    });

    let after_save_hook = info.after_save.then(|| {
        quote! {
            fn after_save_hook(&mut self) -> ::core::option::Option<&mut dyn ::activehaus::record_object::AfterSave> {
                ::core::option::Option::Some(self)
            }
        }
    });

    let generate_id_impl = info.generate_id.then(|| {
        quote! {
            impl #impl_generics ::activehaus::record_object::BeforeSave for #name #ty_generics #where_clause {
                fn before_save(&mut self) -> ::activehaus::record_object::anyhow::Result<()> {
                    if self.#id.is_empty() && self.#timestamps.created_at.is_none() {
                        self.#id = ::activehaus::record_object::new_id();
                    }
                    ::core::result::Result::Ok(())
                }
            }
        }
    });

    quote! {
        impl #impl_generics ::activehaus::record_object::Model for #name #ty_generics #where_clause {
            fn id(&self) -> &str {
                &self.#id
            }

            fn set_id(&mut self, id: ::std::string::String) {
                self.#id = id;
            }

            fn timestamps(&self) -> &::activehaus::record_object::Timestamps {
                &self.#timestamps
            }

            fn timestamps_mut(&mut self) -> &mut ::activehaus::record_object::Timestamps {
                &mut self.#timestamps
            }

            #[allow(unused_variables)]
            fn validate(&self, validation: &mut ::activehaus::record_object::Validation) {
                #(#required_checks)*
                #custom_validation
            }

            #custom_model_name
            #before_save_hook
            #after_save_hook
        }

        #generate_id_impl
    }
}
