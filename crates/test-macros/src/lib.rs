use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitInt, parse_macro_input};

/// A drop-in replacement for `#[test]` that reports elapsed time and fails
/// any test exceeding a timeout (default: 1 second).
///
/// # Usage
/// ```ignore
/// use test_macros::timed_test;
///
/// #[timed_test]
/// fn fast_test() {
///     assert!(1 + 1 == 2);
/// }
///
/// #[timed_test(60)]
/// fn slow_test() {
///     // This test gets a 60-second timeout
/// }
/// ```
#[proc_macro_attribute]
pub fn timed_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let limit_secs: u64 = if attr.is_empty() {
        1
    } else {
        let lit = parse_macro_input!(attr as LitInt);
        lit.base10_parse::<u64>()
            .expect("timed_test expects an integer timeout in seconds")
    };

    let func = parse_macro_input!(item as ItemFn);
    let name = &func.sig.ident;
    let body = &func.block;
    let attrs = &func.attrs;
    let vis = &func.vis;

    let expanded = quote! {
        #(#attrs)*
        #[test]
        #vis fn #name() {
            let __t0 = ::std::time::Instant::now();

            let __outcome = ::std::panic::catch_unwind(
                ::std::panic::AssertUnwindSafe(|| #body)
            );

            let __elapsed = __t0.elapsed();

            eprintln!(
                "[timer] {} completed in {:.3}s",
                stringify!(#name),
                __elapsed.as_secs_f64()
            );

            if __elapsed.as_secs() >= #limit_secs {
                panic!(
                    "[timer] {} exceeded {}s timeout ({:.3}s)",
                    stringify!(#name),
                    #limit_secs,
                    __elapsed.as_secs_f64()
                );
            }

            if let ::std::result::Result::Err(__panic) = __outcome {
                ::std::panic::resume_unwind(__panic);
            }
        }
    };

    expanded.into()
}
