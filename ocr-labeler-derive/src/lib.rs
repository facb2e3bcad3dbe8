//! Procedural derive macros for ocr-labeler.
//!
//! This crate provides the `ConfigValidator` derive used by the engine's
//! configuration types.

use darling::{FromDeriveInput, FromField, FromMeta, ast};
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Expr, parse_macro_input};

/// Parsed arguments for `range(min = .., max = ..)`.
#[derive(Debug, FromMeta)]
struct RangeArgs {
    min: Expr,
    max: Expr,
}

/// All supported validators that can be applied to a field.
#[derive(Debug, Default, FromMeta)]
struct Validators {
    /// `#[validate(range(min = expr, max = expr))]` - value must be in [min, max]
    #[darling(default)]
    range: Option<RangeArgs>,

    /// `#[validate(max = expr)]` - value must be <= expr
    #[darling(default)]
    max: Option<Expr>,

    /// `#[validate(finite)]` - floating point value must not be NaN or infinite
    #[darling(default)]
    finite: bool,
}

/// A single field with its validation rules.
#[derive(Debug, FromField)]
#[darling(attributes(validate))]
struct ValidatedField {
    ident: Option<syn::Ident>,
    #[darling(flatten)]
    validators: Validators,
}

/// The input struct for ConfigValidator derive.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(validate), supports(struct_named))]
struct ConfigValidatorInput {
    ident: syn::Ident,
    data: ast::Data<(), ValidatedField>,
}

/// Derive macro for implementing the `ConfigValidator` trait.
///
/// Validation rules are specified using the `#[validate(...)]` attribute on fields.
/// The generated code refers to `crate::core::config`, so the macro is meant to be
/// used inside `ocr-labeler-core`.
///
/// # Supported Validators
///
/// - `#[validate(range(min = value, max = value))]` - the field value is within [min, max]
/// - `#[validate(max = value)]` - the field value is at most `value`
/// - `#[validate(finite)]` - the float field is neither NaN nor infinite
///
/// # Example
///
/// ```rust,ignore
/// use ocr_labeler_derive::ConfigValidator;
///
/// #[derive(ConfigValidator)]
/// pub struct EngineConfig {
///     #[validate(max = 10_000)]
///     pub merge_gap_tolerance: u32,
///
///     #[validate(finite, range(min = 0.0, max = 1.0))]
///     pub default_split_fraction: f32,
///
///     // Fields without #[validate] are not validated
///     pub similarity_tie_break: bool,
/// }
/// ```
#[proc_macro_derive(ConfigValidator, attributes(validate))]
pub fn derive_config_validator(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    ConfigValidatorInput::from_derive_input(&input)
        .and_then(|parsed| generate_config_validator(&parsed))
        .unwrap_or_else(|err| err.write_errors())
        .into()
}

fn generate_config_validator(
    input: &ConfigValidatorInput,
) -> darling::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = input
        .data
        .as_ref()
        .take_struct()
        .ok_or_else(|| darling::Error::custom("Only structs are supported"))?;

    let validations: Vec<_> = fields
        .iter()
        .filter_map(|field| generate_field_validation(field))
        .collect();

    Ok(quote! {
        impl crate::core::config::ConfigValidator for #name {
            fn validate(&self) -> Result<(), crate::core::config::ConfigError> {
                #(#validations)*
                Ok(())
            }
        }
    })
}

fn generate_field_validation(field: &ValidatedField) -> Option<proc_macro2::TokenStream> {
    let field_name = field.ident.as_ref()?;
    let field_name_str = field_name.to_string();
    let validators = &field.validators;

    let mut validations = Vec::new();

    // Finite check runs first so range comparisons never see NaN
    if validators.finite {
        validations.push(quote! {
            if !self.#field_name.is_finite() {
                return Err(crate::core::config::ConfigError::InvalidConfig {
                    message: format!("{} must be a finite number", #field_name_str),
                });
            }
        });
    }

    if let Some(range) = &validators.range {
        let min_expr = &range.min;
        let max_expr = &range.max;
        validations.push(quote! {
            if !(#min_expr..=#max_expr).contains(&self.#field_name) {
                return Err(crate::core::config::ConfigError::InvalidConfig {
                    message: format!(
                        "{} must be between {} and {}",
                        #field_name_str,
                        #min_expr,
                        #max_expr
                    ),
                });
            }
        });
    }

    if let Some(max_expr) = &validators.max {
        validations.push(quote! {
            if self.#field_name > #max_expr {
                return Err(crate::core::config::ConfigError::InvalidConfig {
                    message: format!("{} must be at most {}", #field_name_str, #max_expr),
                });
            }
        });
    }

    if validations.is_empty() {
        None
    } else {
        Some(quote! { #(#validations)* })
    }
}
