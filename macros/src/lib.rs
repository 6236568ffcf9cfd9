use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, ItemFn};

/// Marks a function as an rxstream test.
///
/// Sync tests expand to a plain `#[test]`. Async tests are wrapped in a
/// synchronous `#[test]` whose body is driven to completion on the current
/// thread with `futures::executor::block_on`, so single-threaded observables
/// never cross a thread boundary.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let raw_args = proc_macro2::TokenStream::from(attr);
  if !raw_args.is_empty() {
    return TokenStream::from(
      syn::Error::new(
        raw_args.span(),
        "rxstream_macro::test takes no arguments. Use #[rxstream_macro::test] on sync or async \
         test functions.",
      )
      .to_compile_error(),
    );
  }

  if input.sig.asyncness.is_none() {
    return TokenStream::from(quote! {
      #[test]
      #input
    });
  }

  if !input.sig.inputs.is_empty() {
    return TokenStream::from(
      syn::Error::new(input.sig.inputs.span(), "async rxstream tests cannot take arguments")
        .to_compile_error(),
    );
  }

  let attrs = &input.attrs;
  let vis = &input.vis;
  let name = &input.sig.ident;
  let output = &input.sig.output;
  let body = &input.block;

  let expanded = quote! {
    #[test]
    #(#attrs)*
    #vis fn #name() #output {
      ::futures::executor::block_on(async move #body)
    }
  };

  TokenStream::from(expanded)
}
