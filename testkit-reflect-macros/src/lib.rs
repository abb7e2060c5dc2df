//! Procedural macros for testkit-reflect
//!
//! This crate provides the `#[testkit_reflect::reflect]` attribute, which
//! records callable metadata at compile time so tests can assert on it.
//!
//! # Example
//!
//! ```rust,ignore
//! use testkit_reflect::prelude::*;
//!
//! #[testkit_reflect::reflect]
//! pub trait Store {
//!     fn get(&self, key: &str) -> Option<String>;
//!     fn contains(&self, key: &str) -> bool {
//!         self.get(key).is_some()
//!     }
//! }
//!
//! let get = StoreCallables::callable("get").unwrap();
//! should_be_abstract(&get);
//! ```

use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};
use syn::{
    ext::IdentExt,
    parse_macro_input,
    visit::{self, Visit},
    visit_mut::{self, VisitMut},
    BoundLifetimes, FnArg, GenericArgument, GenericParam, Generics, Ident, ImplItem, Item, ItemImpl,
    ItemTrait, Lifetime, Pat, PathArguments, ReturnType, Signature, TraitItem, Type, TypeImplTrait,
    Visibility,
};

/// How a member may be overridden.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Modality {
    /// Inherent method.
    Final,
    /// Trait method with a default body.
    Open,
    /// Trait method without a body.
    Abstract,
}

impl Modality {
    /// `(is_final, is_open, is_abstract)`
    fn flags(self) -> (bool, bool, bool) {
        match self {
            Modality::Final => (true, false, false),
            Modality::Open => (false, true, false),
            Modality::Abstract => (false, true, true),
        }
    }
}

/// Names a signature's types may use but the generated impl cannot.
struct Scope {
    /// Generic type parameters of the method (and of the trait).
    type_params: HashSet<String>,
    /// Every unnameable identifier: type params, const params, `Self` in traits.
    opaque: HashSet<String>,
    /// Text substituted for `Self` when rendering, inside traits.
    self_name: Option<String>,
}

impl Scope {
    fn new(outer: Option<&Generics>, sig: &Signature, self_name: Option<String>) -> Self {
        let mut type_params = HashSet::new();
        let mut opaque = HashSet::new();
        for param in outer.into_iter().chain([&sig.generics]).flat_map(|g| &g.params) {
            match param {
                GenericParam::Type(t) => {
                    type_params.insert(t.ident.to_string());
                    opaque.insert(t.ident.to_string());
                }
                GenericParam::Const(c) => {
                    opaque.insert(c.ident.to_string());
                }
                GenericParam::Lifetime(_) => {}
            }
        }
        if self_name.is_some() {
            opaque.insert("Self".to_string());
        }
        Self {
            type_params,
            opaque,
            self_name,
        }
    }

    fn is_bare_type_param(&self, ty: &Type) -> bool {
        match ty {
            Type::Path(p) if p.qself.is_none() => p
                .path
                .get_ident()
                .is_some_and(|ident| self.type_params.contains(&ident.to_string())),
            Type::Paren(p) => self.is_bare_type_param(&p.elem),
            _ => false,
        }
    }
}

/// Finds anything that cannot be spelled inside `TypeRef::of::<..>()`.
struct OpaqueFinder<'a> {
    scope: &'a Scope,
    found: bool,
}

impl<'ast> Visit<'ast> for OpaqueFinder<'_> {
    fn visit_ident(&mut self, ident: &'ast Ident) {
        if self.scope.opaque.contains(&ident.to_string()) {
            self.found = true;
        }
    }

    fn visit_type_impl_trait(&mut self, _: &'ast TypeImplTrait) {
        self.found = true;
    }

    fn visit_bound_lifetimes(&mut self, _: &'ast BoundLifetimes) {
        self.found = true;
    }

    fn visit_type(&mut self, ty: &'ast Type) {
        match ty {
            Type::Never(_) | Type::Macro(_) | Type::Verbatim(_) | Type::Infer(_) => {
                self.found = true;
            }
            _ => visit::visit_type(self, ty),
        }
    }
}

/// Replaces named lifetimes with `'_` so the type is valid in expression position.
struct EraseLifetimes;

impl VisitMut for EraseLifetimes {
    fn visit_lifetime_mut(&mut self, lifetime: &mut Lifetime) {
        if lifetime.ident != "static" {
            *lifetime = Lifetime::new("'_", lifetime.span());
        }
    }
}

/// Replaces `Self` with a concrete name before rendering.
struct RenameSelf<'a>(&'a str);

impl VisitMut for RenameSelf<'_> {
    fn visit_ident_mut(&mut self, ident: &mut Ident) {
        if ident == "Self" {
            *ident = Ident::new(self.0, ident.span());
        }
        visit_mut::visit_ident_mut(self, ident);
    }
}

/// Render tokens as compact source text: `Vec<T>`, `&mut str`, `impl Fn(u8) -> u8`.
fn render(tokens: &TokenStream2) -> String {
    fn wordy(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '\''
    }

    let raw = tokens.to_string();
    let mut out = String::with_capacity(raw.len());
    for piece in raw.split_whitespace() {
        match piece {
            "," | ";" => {
                out.push_str(piece);
                out.push(' ');
            }
            "->" | "+" | "=" => {
                out.push(' ');
                out.push_str(piece);
                out.push(' ');
            }
            _ => {
                let prev = out.chars().last();
                let next = piece.chars().next();
                if let (Some(prev), Some(next)) = (prev, next) {
                    if wordy(prev) && wordy(next) {
                        out.push(' ');
                    }
                }
                out.push_str(piece);
            }
        }
    }
    out
}

/// The `T` of `Option<T>`, `std::option::Option<T>` or `core::option::Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let segments: Vec<_> = p.path.segments.iter().collect();
    let (last, prefix) = segments.split_last()?;
    let prefix: Vec<_> = prefix.iter().map(|s| s.ident.to_string()).collect();
    let qualified = match prefix.as_slice() {
        [] => p.path.leading_colon.is_none(),
        [root, module] => (root == "std" || root == "core") && module == "option",
        _ => false,
    };
    if !qualified || last.ident != "Option" {
        return None;
    }
    match &last.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match &args.args[0] {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// Expression building the `TypeRef` for `ty`.
fn type_ref(ty: &Type, scope: &Scope) -> TokenStream2 {
    if scope.is_bare_type_param(ty) {
        return quote! { ::testkit_reflect::reflect::TypeRef::any().nullable() };
    }

    let mut finder = OpaqueFinder {
        scope,
        found: false,
    };
    finder.visit_type(ty);

    if finder.found {
        // Option<Opaque> stays nullable around the opaque inner type
        if let Some(inner) = option_inner(ty) {
            let inner = type_ref(inner, scope);
            return quote! { #inner.nullable() };
        }
        let mut named = ty.clone();
        if let Some(self_name) = &scope.self_name {
            RenameSelf(self_name).visit_type_mut(&mut named);
        }
        let text = render(&named.to_token_stream());
        quote! { ::testkit_reflect::reflect::TypeRef::named(#text) }
    } else {
        let mut erased = ty.clone();
        EraseLifetimes.visit_type_mut(&mut erased);
        quote! { ::testkit_reflect::reflect::TypeRef::of::<#erased>() }
    }
}

fn visibility_variant(vis: &Visibility) -> Ident {
    let name = match vis {
        Visibility::Public(_) => "Public",
        Visibility::Restricted(r) if r.path.is_ident("crate") => "Internal",
        Visibility::Restricted(r) if r.path.is_ident("self") => "Private",
        Visibility::Restricted(_) => "Protected",
        Visibility::Inherited => "Private",
    };
    format_ident!("{}", name)
}

fn param_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(p) => Some(p.ident.unraw().to_string()),
        _ => None,
    }
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(t) if t.elems.is_empty())
}

/// Builder expression describing one method.
fn describe(
    sig: &Signature,
    vis: &Visibility,
    modality: Modality,
    scope: &Scope,
    owner: &TokenStream2,
    receiver: &TokenStream2,
) -> TokenStream2 {
    let name = sig.ident.unraw().to_string();
    let visibility = visibility_variant(vis);
    let (is_final, is_open, is_abstract) = modality.flags();
    let is_suspend = sig.asyncness.is_some();

    let receiver = sig
        .receiver()
        .map(|_| quote! { .receiver(#receiver) });
    let parameters = sig.inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(typed) => {
            let ty = type_ref(&typed.ty, scope);
            Some(match param_name(&typed.pat) {
                Some(name) => quote! { .parameter(#name, #ty) },
                None => quote! { .unnamed_parameter(#ty) },
            })
        }
        FnArg::Receiver(_) => None,
    });
    let returns = match &sig.output {
        ReturnType::Type(_, ty) if !is_unit(ty) => {
            let ty = type_ref(ty, scope);
            Some(quote! { .returns(#ty) })
        }
        _ => None,
    };

    quote! {
        ::testkit_reflect::reflect::CallableDescriptor::builder(#name)
            .owner(#owner)
            .visibility(::testkit_reflect::reflect::Visibility::#visibility)
            .is_final(#is_final)
            .is_open(#is_open)
            .is_abstract(#is_abstract)
            .is_suspend(#is_suspend)
            #receiver
            #(#parameters)*
            #returns
            .build()
    }
}

/// Records callable metadata for tests.
///
/// # On an inherent impl block
///
/// Implements `Reflect` for the self type. Methods are final.
///
/// ```rust,ignore
/// use testkit_reflect::prelude::*;
///
/// struct Cache;
///
/// #[testkit_reflect::reflect]
/// impl Cache {
///     pub async fn load(&self, key: &str) -> Option<Vec<u8>> { None }
/// }
///
/// let load = Cache::callable("load").unwrap();
/// should_be_suspendable(&load);
/// should_accept_parameters(&load, [TypeRef::of::<&str>()]);
/// ```
///
/// # On a trait definition
///
/// Emits a unit struct `<Trait>Callables` implementing `Reflect`. Methods
/// with a default body are open, methods without one are abstract and open.
///
/// # Mapping
///
/// - `pub` is public, `pub(crate)` internal, `pub(super)` / `pub(in ..)`
///   protected, anything else private
/// - `async fn` is suspendable
/// - a receiver occupies parameter slot 0; associated functions have none
/// - a bare generic parameter accepts any type; other types that cannot be
///   named outside the signature (`impl Trait`, method generics, `Self` in
///   a trait) are recorded by their source text
///
/// A type can carry at most one `#[reflect]` impl block.
#[proc_macro_attribute]
pub fn reflect(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = TokenStream2::from(attr);
    let item = parse_macro_input!(item as Item);

    expand_reflect(attr, item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_reflect(attr: TokenStream2, item: Item) -> syn::Result<TokenStream2> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(attr, "#[reflect] takes no arguments"));
    }

    match item {
        Item::Impl(item) => expand_impl(item),
        Item::Trait(item) => expand_trait(item),
        other => Err(syn::Error::new_spanned(
            other,
            "#[reflect] applies to inherent impl blocks and trait definitions",
        )),
    }
}

fn expand_impl(item: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[reflect] cannot be applied to trait impls; annotate the inherent impl or the trait definition",
        ));
    }

    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();
    let owner = quote! { ::std::any::type_name::<Self>() };
    let receiver = quote! { ::testkit_reflect::reflect::TypeRef::of::<Self>() };

    let descriptors: Vec<_> = item
        .items
        .iter()
        .filter_map(|member| match member {
            ImplItem::Fn(method) => Some(method),
            _ => None,
        })
        .map(|method| {
            let scope = Scope::new(None, &method.sig, None);
            describe(
                &method.sig,
                &method.vis,
                Modality::Final,
                &scope,
                &owner,
                &receiver,
            )
        })
        .collect();

    Ok(quote! {
        #item

        impl #impl_generics ::testkit_reflect::reflect::Reflect for #self_ty #where_clause {
            fn callables() -> ::std::vec::Vec<::testkit_reflect::reflect::CallableDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn expand_trait(item: ItemTrait) -> syn::Result<TokenStream2> {
    let vis = &item.vis;
    let trait_name = item.ident.unraw().to_string();
    let marker = format_ident!("{}Callables", item.ident.unraw());
    let owner = quote! { ::std::concat!(::std::module_path!(), "::", #trait_name) };
    let receiver = quote! { ::testkit_reflect::reflect::TypeRef::named(#owner) };

    let descriptors: Vec<_> = item
        .items
        .iter()
        .filter_map(|member| match member {
            TraitItem::Fn(method) => Some(method),
            _ => None,
        })
        .map(|method| {
            let scope = Scope::new(Some(&item.generics), &method.sig, Some(trait_name.clone()));
            let modality = if method.default.is_some() {
                Modality::Open
            } else {
                Modality::Abstract
            };
            describe(&method.sig, vis, modality, &scope, &owner, &receiver)
        })
        .collect();

    let doc = format!("Callable descriptors of the [`{trait_name}`] trait.");

    Ok(quote! {
        #item

        #[doc = #doc]
        #vis struct #marker;

        impl ::testkit_reflect::reflect::Reflect for #marker {
            fn callables() -> ::std::vec::Vec<::testkit_reflect::reflect::CallableDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn method_scope(sig: &Signature) -> Scope {
        Scope::new(None, sig, None)
    }

    #[test]
    fn test_render_compacts_tokens() {
        let ty: Type = parse_quote!(Vec<Option<T>>);
        assert_eq!(render(&ty.to_token_stream()), "Vec<Option<T>>");

        let ty: Type = parse_quote!(&'a mut str);
        assert_eq!(render(&ty.to_token_stream()), "&'a mut str");

        let ty: Type = parse_quote!(impl Fn(u8, u16) -> bool + Send);
        assert_eq!(render(&ty.to_token_stream()), "impl Fn(u8, u16) -> bool + Send");

        let ty: Type = parse_quote!(std::collections::HashMap<K, V>);
        assert_eq!(render(&ty.to_token_stream()), "std::collections::HashMap<K, V>");
    }

    #[test]
    fn test_visibility_mapping() {
        let cases: [(Visibility, &str); 6] = [
            (parse_quote!(pub), "Public"),
            (parse_quote!(pub(crate)), "Internal"),
            (parse_quote!(pub(super)), "Protected"),
            (parse_quote!(pub(in crate::a)), "Protected"),
            (parse_quote!(pub(self)), "Private"),
            (Visibility::Inherited, "Private"),
        ];
        for (vis, expected) in cases {
            assert_eq!(visibility_variant(&vis), expected);
        }
    }

    #[test]
    fn test_param_names() {
        let sig: Signature = parse_quote!(fn f(&self, mut a: u8, r#type: u8, _: u8, (b, c): (u8, u8)));
        let names: Vec<_> = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Typed(t) => Some(param_name(&t.pat)),
                FnArg::Receiver(_) => None,
            })
            .collect();
        assert_eq!(
            names,
            vec![Some("a".to_string()), Some("type".to_string()), None, None]
        );
    }

    #[test]
    fn test_type_ref_concrete() {
        let sig: Signature = parse_quote!(fn f<'a>(x: &'a str));
        let scope = method_scope(&sig);
        let ty: Type = parse_quote!(&'a str);
        let tokens = type_ref(&ty, &scope).to_string();
        assert!(tokens.contains("TypeRef :: of"));
        assert!(tokens.contains("'_"));
        assert!(!tokens.contains("'a"));
    }

    #[test]
    fn test_type_ref_generics() {
        let sig: Signature = parse_quote!(fn f<T, const N: usize>(x: T, y: Vec<T>, z: [u8; N]));
        let scope = method_scope(&sig);

        let bare: Type = parse_quote!(T);
        assert!(type_ref(&bare, &scope).to_string().contains("any ()"));

        let wrapped: Type = parse_quote!(Vec<T>);
        assert!(type_ref(&wrapped, &scope).to_string().contains("\"Vec<T>\""));

        let array: Type = parse_quote!([u8; N]);
        assert!(type_ref(&array, &scope).to_string().contains("\"[u8; N]\""));
    }

    #[test]
    fn test_type_ref_self_in_trait() {
        let sig: Signature = parse_quote!(fn merge(&self, other: &Self));
        let scope = Scope::new(None, &sig, Some("Shape".to_string()));
        let ty: Type = parse_quote!(&Self);
        assert!(type_ref(&ty, &scope).to_string().contains("\"&Shape\""));
    }

    #[test]
    fn test_type_ref_option_of_opaque_is_nullable() {
        let sig: Signature = parse_quote!(fn wrap<T>(&self, v: Option<T>, w: Option<Vec<T>>));
        let scope = method_scope(&sig);

        let bare: Type = parse_quote!(Option<T>);
        let tokens = type_ref(&bare, &scope).to_string();
        assert!(tokens.contains("any ()"));
        assert!(tokens.ends_with(". nullable ()"));

        let wrapped: Type = parse_quote!(std::option::Option<Vec<T>>);
        let tokens = type_ref(&wrapped, &scope).to_string();
        assert!(tokens.contains("\"Vec<T>\""));
        assert!(!tokens.contains("Option"));
        assert!(tokens.ends_with(". nullable ()"));

        let concrete: Type = parse_quote!(Option<u8>);
        assert!(type_ref(&concrete, &scope).to_string().contains("TypeRef :: of"));
    }

    #[test]
    fn test_option_inner_paths() {
        let plain: Type = parse_quote!(Option<u8>);
        assert!(option_inner(&plain).is_some());
        let core: Type = parse_quote!(core::option::Option<u8>);
        assert!(option_inner(&core).is_some());
        let other: Type = parse_quote!(my::Option<u8>);
        assert!(option_inner(&other).is_none());
        let vec: Type = parse_quote!(Vec<u8>);
        assert!(option_inner(&vec).is_none());
    }

    #[test]
    fn test_type_ref_impl_trait() {
        let sig: Signature = parse_quote!(fn f(x: impl AsRef<str>));
        let scope = method_scope(&sig);
        let ty: Type = parse_quote!(impl AsRef<str>);
        assert!(type_ref(&ty, &scope)
            .to_string()
            .contains("\"impl AsRef<str>\""));
    }

    #[test]
    fn test_rejects_arguments() {
        let item: Item = parse_quote!(impl Foo {});
        let err = expand_reflect(quote!(name = "x"), item).unwrap_err();
        assert!(err.to_string().contains("takes no arguments"));
    }

    #[test]
    fn test_rejects_trait_impl() {
        let item: Item = parse_quote!(impl Display for Foo {});
        let err = expand_reflect(TokenStream2::new(), item).unwrap_err();
        assert!(err.to_string().contains("trait impls"));
    }

    #[test]
    fn test_rejects_other_items() {
        let item: Item = parse_quote!(struct Foo;);
        assert!(expand_reflect(TokenStream2::new(), item).is_err());
    }

    #[test]
    fn test_expand_impl() {
        let item: Item = parse_quote! {
            impl Foo {
                pub async fn bar(&self, x: u32) -> bool { true }
                fn new() -> Self { Foo }
            }
        };
        let out = expand_reflect(TokenStream2::new(), item).unwrap().to_string();
        assert!(out.contains("Reflect for Foo"));
        assert!(out.contains("builder (\"bar\")"));
        assert!(out.contains("is_suspend (true)"));
        assert!(out.contains("Visibility :: Private"));
        assert_eq!(out.matches("receiver (").count(), 1);
    }

    #[test]
    fn test_expand_trait() {
        let item: Item = parse_quote! {
            pub trait Shape {
                fn area(&self) -> f64;
                fn describe(&self) -> String { String::new() }
            }
        };
        let out = expand_reflect(TokenStream2::new(), item).unwrap().to_string();
        assert!(out.contains("pub struct ShapeCallables"));
        assert!(out.contains("is_abstract (true)"));
        assert!(out.contains("is_abstract (false)"));
        assert!(!out.contains("is_final (true)"));
    }
}
